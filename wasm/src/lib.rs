pub mod api;
pub mod async_;
pub mod js;
pub mod permissions;
pub mod session;
pub mod state;
