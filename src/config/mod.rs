//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, FeedConfig, LogFormat, LoggingConfig, ServerConfig, StorageConfig,
};
