// ── Core error types ──
//
// Errors surfaced by twinkly-core. Transport failures are translated into
// two recoverable kinds (unreachable / rejected) that callers turn into an
// availability downgrade; everything else is passed through as fatal.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Recoverable ──────────────────────────────────────────────────
    #[error("Cannot reach device at {host}: {reason}")]
    Connectivity { host: String, reason: String },

    #[error("Device at {host} rejected the session: {reason}")]
    AuthenticationRejected { host: String, reason: String },

    #[error("No valid session for device at {host}")]
    NotAuthenticated { host: String },

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Device at {host} did not provide an identity: {reason}")]
    IdentityUnavailable { host: String, reason: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Operation not supported: {operation} on a {kind}")]
    Unsupported { operation: String, kind: String },

    #[error("Device API error: {message}")]
    Api {
        message: String,
        /// Result code from the response envelope, when there was one.
        code: Option<u32>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Device task is no longer running")]
    DeviceStopped,
}

impl CoreError {
    /// Translate a transport error for the device at `host`.
    pub fn from_api(host: &str, err: twinkly_api::Error) -> Self {
        if err.is_connectivity() {
            return Self::Connectivity {
                host: host.to_owned(),
                reason: err.to_string(),
            };
        }

        match err {
            twinkly_api::Error::Authentication { message } => Self::AuthenticationRejected {
                host: host.to_owned(),
                reason: message,
            },
            twinkly_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid device address {host}: {e}"),
            },
            twinkly_api::Error::ClientBuild(message) => Self::Config { message },
            twinkly_api::Error::DeviceCode { endpoint, code } => Self::Api {
                message: format!("{endpoint} returned code {code}"),
                code: Some(code),
            },
            other => Self::Api {
                message: other.to_string(),
                code: None,
            },
        }
    }

    /// The availability downgrade this error maps to, or `None` when the
    /// error is not one the core recovers from on its own.
    pub fn unavailable_reason(&self) -> Option<UnavailableReason> {
        match self {
            Self::Connectivity { reason, .. } => Some(UnavailableReason::Unreachable {
                reason: reason.clone(),
            }),
            Self::AuthenticationRejected { reason, .. } => Some(UnavailableReason::Rejected {
                reason: reason.clone(),
            }),
            Self::NotAuthenticated { .. } => Some(UnavailableReason::Rejected {
                reason: "no valid session".into(),
            }),
            _ => None,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.unavailable_reason().is_some()
    }
}

/// Why a device is currently unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnavailableReason {
    /// Transport failure: timeout, refused connection, unreachable host.
    Unreachable { reason: String },
    /// The device answered but would not grant or honour a session.
    Rejected { reason: String },
    /// The exchange failed in a way the core does not retry on its own
    /// (HTTP error status, unexpected result code, malformed body).
    Fault { reason: String },
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable { reason } => write!(f, "unreachable: {reason}"),
            Self::Rejected { reason } => write!(f, "rejected: {reason}"),
            Self::Fault { reason } => write!(f, "fault: {reason}"),
        }
    }
}
