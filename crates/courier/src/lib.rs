//! # Courier
//!
//! An update-routing engine for message-driven bots.
//!
//! ## Overview
//!
//! Courier takes the stream of updates a messaging platform delivers —
//! messages, commands, button callbacks, membership changes, payments — and
//! routes each one to the right async handler. Handlers are registered under
//! string keys (command names, exact text, callback endpoints, category
//! constants); a fixed precedence chain picks the first match, and fallbacks
//! guarantee routing never fails.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌────────────┐     ┌────────────┐     ┌──────────┐
//! │ Transport │────▶│ Classifier │────▶│ Dispatcher │────▶│ Handlers │
//! │ (updates) │     │ (precedence│     │ (sync or   │     │ (async   │
//! └───────────┘     │   chain)   │     │  spawned)  │     │   fns)   │
//!                   └────────────┘     └────────────┘     └──────────┘
//! ```
//!
//! - **courier-core**: data model, registry, classifier, dispatcher
//! - **courier-runtime**: configuration, logging, runtime assembly
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! async fn on_start(ctx: Context) -> HandlerResult {
//!     info!(payload = ctx.payload(), "new user");
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut reg = RegistryBuilder::new();
//!     reg.handle("/start", on_start)?;
//!
//!     let runtime = CourierRuntime::builder()
//!         .registry(reg.build())
//!         .build()?;
//!
//!     while let Some(update) = transport.next().await {
//!         runtime.route(update).await;
//!     }
//!     runtime.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config` *(default)*: TOML configuration files
//! - `yaml-config`: YAML configuration files
//! - `json-log`: JSON log output

pub use courier_core as core;
pub use courier_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use courier_runtime::CourierRuntime;

    // Registration and dispatch
    pub use courier_core::{
        Context, DispatchPolicy, HandlerResult, Registry, RegistryBuilder, Router,
    };

    // Data model
    pub use courier_core::{BotIdentity, Callback, Message, Update, UpdateKind, User};

    // Category constants
    pub use courier_core::registry::{
        ON_ANY, ON_CALLBACK, ON_COMMAND, ON_EDITED, ON_MEDIA, ON_PHOTO, ON_PINNED, ON_QUERY,
        ON_TEXT, ON_USER_JOINED, ON_USER_LEFT,
    };

    // Errors
    pub use courier_core::{HandlerError, RegistryError};
    pub use courier_runtime::{RuntimeError, RuntimeResult};

    // Logging macros
    pub use courier_runtime::prelude::{Level, debug, error, info, instrument, span, trace, warn};
}
