pub mod config;

pub use config::{Config, GitHubSettings, GitSettings, LogLevel};
