pub mod c2s;
pub mod s2c;
