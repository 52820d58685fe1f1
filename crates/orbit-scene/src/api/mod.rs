pub mod config;
pub mod host;
pub mod mount;
pub mod types;
