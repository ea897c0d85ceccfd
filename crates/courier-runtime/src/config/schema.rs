//! Configuration schema definitions.

use std::collections::HashMap;
use std::path::PathBuf;

use courier_core::DispatchPolicy;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CourierConfig {
    /// Identity of the bot account updates are routed for.
    #[serde(default)]
    pub bot: BotConfig,

    /// Dispatch scheduling settings.
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Bot identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BotConfig {
    /// Numeric user ID of the bot account.
    #[serde(default)]
    pub id: i64,

    /// Bot username, with or without the leading `@`.
    #[serde(default)]
    pub username: String,
}

/// Dispatch scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DispatchConfig {
    /// Scheduling policy for handler invocations.
    #[serde(default)]
    pub policy: PolicyKind,

    /// Cap on concurrently running handlers under the concurrent policy.
    /// Absent means unbounded; ignored under the synchronous policy.
    #[serde(default)]
    pub max_in_flight: Option<usize>,
}

impl DispatchConfig {
    /// Converts to the core dispatch policy.
    pub fn to_policy(&self) -> DispatchPolicy {
        match self.policy {
            PolicyKind::Synchronous => DispatchPolicy::Synchronous,
            PolicyKind::Concurrent => DispatchPolicy::Concurrent {
                max_in_flight: self.max_in_flight,
            },
        }
    }
}

/// Dispatch policy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Handlers run inline, one update at a time.
    Synchronous,
    /// One task per update (default).
    #[default]
    Concurrent,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error).
    #[serde(default)]
    pub level: LogLevel,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Output destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Which span lifecycle events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread IDs in log output.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file names and line numbers in log output.
    #[serde(default)]
    pub file_location: bool,

    /// Log file path, required when `output` is `file`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-module level overrides, e.g. `courier_core = "debug"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

/// Log verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// The level name as it appears in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output (default).
    #[default]
    Compact,
    /// Full single-line output.
    Full,
    /// Multi-line human-readable output.
    Pretty,
    /// Structured JSON lines.
    #[cfg(feature = "json-log")]
    Json,
}

/// Log output destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Stdout,
    Stderr,
    File,
}

/// Span lifecycle events to include in log output.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_concurrent_and_unbounded() {
        let config = CourierConfig::default();
        assert_eq!(config.dispatch.policy, PolicyKind::Concurrent);
        assert_eq!(
            config.dispatch.to_policy(),
            DispatchPolicy::Concurrent { max_in_flight: None }
        );
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn dispatch_config_maps_onto_the_core_policy() {
        let config = DispatchConfig {
            policy: PolicyKind::Concurrent,
            max_in_flight: Some(16),
        };
        assert_eq!(
            config.to_policy(),
            DispatchPolicy::Concurrent {
                max_in_flight: Some(16)
            }
        );

        let config = DispatchConfig {
            policy: PolicyKind::Synchronous,
            max_in_flight: Some(16),
        };
        assert_eq!(config.to_policy(), DispatchPolicy::Synchronous);
    }

    #[test]
    fn kebab_case_policy_names_deserialize() {
        let config: DispatchConfig =
            serde_json::from_str(r#"{"policy": "synchronous"}"#).unwrap();
        assert_eq!(config.policy, PolicyKind::Synchronous);
    }
}
