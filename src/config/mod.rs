//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, AuthConfig, ChainConfig, LogFormat, LoggingConfig, MetricsConfig, ServerConfig,
    StorageBackend, StorageConfig,
};
