pub mod board;
pub mod config;
pub mod types;
