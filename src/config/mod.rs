//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, DatabaseConfig, DirectoryConfig, LogFormat, LoggingConfig, SecurityConfig,
    ServerConfig, StorageBackend, StorageConfig,
};
