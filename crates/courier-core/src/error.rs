//! Unified error types for the routing core.
//!
//! Routing itself never fails: an update with no matching handler is a normal
//! outcome, and parse failures in the command and callback grammars simply
//! fall through to the next precedence step. The only error values here are
//! the ones handlers *return* and the one a registry builder can hit at
//! startup.

use thiserror::Error;

/// An error returned from a handler body.
///
/// Handler errors are never propagated back to the transport that delivered
/// the update; they are routed to the process-wide error sink.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// An outbound API call made by the handler failed.
    #[error("api call failed: {0}")]
    Api(String),

    /// The update carried a payload the handler could not use.
    #[error("bad payload: {0}")]
    Payload(String),

    /// Any other handler failure.
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Creates a generic handler error from any displayable value.
    pub fn other(err: impl std::fmt::Display) -> Self {
        Self::Other(err.to_string())
    }
}

/// Errors that can occur while building a handler registry.
///
/// These surface programmer mistakes at startup; the frozen registry cannot
/// error at routing time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two handlers were registered under the same routing key.
    #[error("handler already registered for key {key:?}")]
    DuplicateKey {
        /// The normalized key that collided.
        key: String,
    },

    /// The routing key was empty after normalization.
    #[error("empty routing key")]
    EmptyKey,
}
