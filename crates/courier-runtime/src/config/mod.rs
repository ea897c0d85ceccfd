//! Configuration module for the Courier runtime.
//!
//! Provides layered configuration loading (files, environment, programmatic
//! overrides) and validation for the bot identity, dispatch and logging
//! settings.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    BotConfig, CourierConfig, DispatchConfig, LogFormat, LogLevel, LogOutput, LoggingConfig,
    PolicyKind, SpanEventConfig,
};
pub use validation::validate_config;
