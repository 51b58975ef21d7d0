pub mod account;
pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod http;
pub mod logger;
pub mod scheduler;
pub mod supervisor;
pub mod tasks;
pub mod utils;
