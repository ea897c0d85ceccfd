//! Core update-routing engine for message-driven bots.
//!
//! This crate turns a stream of decoded platform updates into handler
//! invocations. It owns the data model ([`Update`], [`Message`] and friends),
//! the keyed handler [`registry`], the classification precedence chain, and
//! the dispatch machinery with its concurrency policies. It deliberately
//! knows nothing about transports: polling loops, webhooks and API clients
//! live a layer up and simply feed [`Router::route`].
//!
//! # Routing model
//!
//! Every handler is registered under a string key in one of four namespaces:
//! bare command names, verbatim text, structured-callback endpoints, and
//! sentinel-prefixed category constants ([`ON_TEXT`], [`ON_PHOTO`], …). For
//! each update the classifier walks a fixed precedence chain and the first
//! match wins; misses fall back to [`ON_ANY`] and finally to a built-in
//! no-op, so routing never fails.
//!
//! ```rust,ignore
//! let mut reg = RegistryBuilder::new();
//! reg.handle("/start", |ctx: Context| async move {
//!     tracing::info!(payload = ctx.payload(), "new user");
//!     Ok(())
//! })?;
//! reg.handle(ON_TEXT, echo)?;
//!
//! let router = Router::builder(BotIdentity::new(id, "my_bot"))
//!     .registry(reg.build())
//!     .policy(DispatchPolicy::Concurrent { max_in_flight: Some(64) })
//!     .build();
//!
//! while let Some(update) = updates.next().await {
//!     router.route(update).await;
//! }
//! router.shutdown().await;
//! ```

pub mod callback;
pub mod command;
mod classify;
mod context;
mod dispatch;
pub mod error;
pub mod message;
pub mod registry;
pub mod types;
pub mod update;

pub use context::Context;
pub use dispatch::{DispatchPolicy, ErrorSink, Router, RouterBuilder};
pub use error::{HandlerError, RegistryError};
pub use message::Message;
pub use registry::{BoxedHandler, HandlerResult, Registry, RegistryBuilder, into_handler};
pub use types::{BotIdentity, Chat, User};
pub use update::{Callback, Update, UpdateKind};
