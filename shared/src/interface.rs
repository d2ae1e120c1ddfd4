pub mod shared;
pub mod wire;

pub const PATH_PREFIX_API: &str = "/api/";
