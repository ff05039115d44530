pub mod authz;
pub mod config;
pub mod context;
pub mod convert;
pub mod db;
pub mod error;
pub mod gate;
pub mod inspect;
pub mod logs;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod types;
