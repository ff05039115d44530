pub mod model;
pub mod principal;
pub mod role;
