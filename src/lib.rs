pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod realtime;
pub mod types;

pub use client::Session;
pub use config::Config;
pub use error::CredwatchError;
