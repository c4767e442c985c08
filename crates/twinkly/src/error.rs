//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a distinct exit code per category.

use miette::Diagnostic;
use thiserror::Error;

use twinkly_config::ConfigError;
use twinkly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const CONFIG: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach device at {host}")]
    #[diagnostic(
        code(twinkly::connection_failed),
        help(
            "Check that the device is powered on and on the same network.\n\
             Cause: {reason}\n\
             Try: twinkly --host {host} status -v"
        )
    )]
    ConnectionFailed { host: String, reason: String },

    #[error("Device at {host} refused authentication")]
    #[diagnostic(
        code(twinkly::auth_rejected),
        help(
            "The device may be busy with another client (e.g. the Twinkly app).\n\
             Cause: {reason}\n\
             Wait a moment and try again."
        )
    )]
    Rejected { host: String, reason: String },

    #[error("Device at {host} is unavailable: {reason}")]
    #[diagnostic(
        code(twinkly::unavailable),
        help("Nothing was sent to the device. It will be retried on the next attempt.")
    )]
    Unavailable { host: String, reason: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("Device at {host} could not be set up")]
    #[diagnostic(
        code(twinkly::not_exposed),
        help(
            "The device did not report its identity, so it is not used.\n\
             Cause: {reason}"
        )
    )]
    NotExposed { host: String, reason: String },

    #[error("No devices configured")]
    #[diagnostic(
        code(twinkly::no_devices),
        help(
            "Pass a device with --host <ip>, or create a config with:\n\
             twinkly --host <ip> config init\n\
             Expected at: {path}"
        )
    )]
    NoDevices { path: String },

    #[error("Operation '{operation}' is not supported on a {kind}")]
    #[diagnostic(
        code(twinkly::unsupported),
        help("Configure the device with kind = \"light\" to control brightness.")
    )]
    Unsupported { operation: String, kind: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("Device API error ({code}): {message}")]
    #[diagnostic(code(twinkly::api_error))]
    ApiError { code: String, message: String },

    #[error("Internal error: {message}")]
    #[diagnostic(code(twinkly::internal))]
    Internal { message: String },

    // ── Validation / configuration ───────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(twinkly::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(
        code(twinkly::config),
        help("Check the config file. Run: twinkly config path")
    )]
    Config(#[from] ConfigError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON serialization failed: {0}")]
    #[diagnostic(code(twinkly::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    #[diagnostic(code(twinkly::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization failed: {0}")]
    #[diagnostic(code(twinkly::toml))]
    Toml(#[from] toml::ser::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Rejected { .. } | Self::Unavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::NotExposed { .. } => exit_code::NOT_FOUND,
            Self::NoDevices { .. } | Self::Validation { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Connectivity { host, reason } => Self::ConnectionFailed { host, reason },

            CoreError::AuthenticationRejected { host, reason } => Self::Rejected { host, reason },

            CoreError::NotAuthenticated { host } => Self::Rejected {
                host,
                reason: "no valid session".into(),
            },

            CoreError::IdentityUnavailable { host, reason } => Self::NotExposed { host, reason },

            CoreError::Unsupported { operation, kind } => Self::Unsupported { operation, kind },

            CoreError::Api { message, code } => Self::ApiError {
                code: code.map_or_else(|| "unknown".into(), |c| c.to_string()),
                message,
            },

            CoreError::Config { message } => Self::Validation {
                field: "device".into(),
                reason: message,
            },

            CoreError::DeviceStopped => Self::Internal {
                message: "device task stopped unexpectedly".into(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_failure_exits_not_found() {
        let err = CliError::from(CoreError::IdentityUnavailable {
            host: "10.0.0.5".into(),
            reason: "timed out".into(),
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn connectivity_exits_connection() {
        let err = CliError::from(CoreError::Connectivity {
            host: "10.0.0.5".into(),
            reason: "timed out".into(),
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn api_code_is_kept() {
        let err = CliError::from(CoreError::Api {
            message: "led/mode returned code 1104".into(),
            code: Some(1104),
        });
        assert_eq!(err.exit_code(), exit_code::GENERAL);
        assert!(err.to_string().contains("1104"));
    }
}
