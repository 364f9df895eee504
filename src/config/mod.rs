//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, DegradedAction, LogFormat, LoggingConfig, ServerConfig, StoreConfig,
};
