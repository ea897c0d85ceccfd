//! Runtime assembly: configuration in, a ready [`Router`] out.
//!
//! The runtime owns the boring part of starting a bot service: load and
//! validate the configuration, initialize logging, and wire the handler
//! registry into a router with the configured dispatch policy. Transports
//! feed [`CourierRuntime::route`]; shutdown drains in-flight handlers.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use courier_core::{Context, RegistryBuilder};
//! use courier_runtime::CourierRuntime;
//!
//! let mut reg = RegistryBuilder::new();
//! reg.handle("/start", on_start)?;
//!
//! let runtime = CourierRuntime::builder()
//!     .config_file("courier.toml")
//!     .registry(reg.build())
//!     .build()?;
//!
//! while let Some(update) = updates.next().await {
//!     runtime.route(update).await;
//! }
//! runtime.shutdown().await;
//! ```

use std::sync::Arc;

use courier_core::{BotIdentity, Registry, Router, Update};
use tracing::info;

use crate::config::{ConfigLoader, CourierConfig, validate_config};
use crate::error::RuntimeResult;
use crate::logging;

/// A configured, running routing service.
pub struct CourierRuntime {
    config: CourierConfig,
    router: Arc<Router>,
}

impl CourierRuntime {
    /// Starts building a runtime.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::default()
    }

    /// Assembles a runtime from an already-loaded configuration.
    ///
    /// Validates the configuration, initializes logging from it, and builds
    /// the router around the given registry.
    pub fn from_config(config: CourierConfig, registry: Registry) -> RuntimeResult<Self> {
        validate_config(&config)?;
        logging::init_from_config(&config.logging);

        let me = BotIdentity::new(config.bot.id, config.bot.username.clone());
        let router = Router::builder(me)
            .registry(registry)
            .policy(config.dispatch.to_policy())
            .build();

        info!(
            bot = %config.bot.username,
            policy = ?config.dispatch.policy,
            "runtime assembled"
        );

        Ok(Self {
            config,
            router: Arc::new(router),
        })
    }

    /// The router, shareable with transport tasks.
    pub fn router(&self) -> Arc<Router> {
        Arc::clone(&self.router)
    }

    /// The effective configuration.
    pub fn config(&self) -> &CourierConfig {
        &self.config
    }

    /// Routes one update. See [`Router::route`].
    pub async fn route(&self, update: Update) {
        self.router.route(update).await;
    }

    /// Drains in-flight handlers and stops accepting new dispatches.
    pub async fn shutdown(&self) {
        info!("runtime shutting down, draining handlers");
        self.router.shutdown().await;
    }
}

impl std::fmt::Debug for CourierRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CourierRuntime")
            .field("bot", &self.config.bot.username)
            .field("router", &self.router)
            .finish()
    }
}

/// Builder assembling a [`CourierRuntime`] from configuration sources.
#[derive(Default)]
pub struct RuntimeBuilder {
    config_file: Option<std::path::PathBuf>,
    profile: Option<String>,
    overrides: Option<CourierConfig>,
    registry: Registry,
}

impl RuntimeBuilder {
    /// Loads configuration from a specific file instead of searching.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the configuration profile.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Merges programmatic configuration under files and environment.
    pub fn overrides(mut self, config: CourierConfig) -> Self {
        self.overrides = Some(config);
        self
    }

    /// Sets the handler registry.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Loads the configuration and assembles the runtime.
    pub fn build(self) -> RuntimeResult<CourierRuntime> {
        let mut loader = ConfigLoader::new();
        if let Some(path) = self.config_file {
            loader = loader.file(path);
        }
        if let Some(profile) = self.profile {
            loader = loader.profile(profile);
        }
        if let Some(overrides) = self.overrides {
            loader = loader.merge(overrides);
        }
        let config = loader.load()?;
        CourierRuntime::from_config(config, self.registry)
    }
}
