pub mod config;
pub mod copy;
