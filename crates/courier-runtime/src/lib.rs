//! Courier Runtime - assembly layer for the Courier routing engine.
//!
//! This crate turns configuration into a running router:
//!
//! - Layered configuration loading (`courier.toml` / `courier.yaml`,
//!   `COURIER_*` environment variables, programmatic overrides)
//! - Configuration validation
//! - Logging setup (`tracing-subscriber` with env-filter, formats, file
//!   output, span events)
//! - Runtime assembly ([`CourierRuntime`]) wiring a handler registry into a
//!   [`courier_core::Router`] with the configured dispatch policy
//!
//! ```rust,ignore
//! use courier_core::RegistryBuilder;
//! use courier_runtime::CourierRuntime;
//!
//! let mut reg = RegistryBuilder::new();
//! reg.handle("/start", on_start)?;
//!
//! let runtime = CourierRuntime::builder()
//!     .registry(reg.build())
//!     .build()?;
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    BotConfig, ConfigError, ConfigLoader, ConfigResult, CourierConfig, DispatchConfig,
    LoggingConfig, PolicyKind,
};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{CourierRuntime, RuntimeBuilder};

// Re-export tracing for use by downstream crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// Provides the commonly used logging macros and `Level`.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
