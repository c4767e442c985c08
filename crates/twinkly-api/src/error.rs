use thiserror::Error;

/// Top-level error type for the `twinkly-api` crate.
///
/// `twinkly-core` sorts these into recoverable availability downgrades
/// ([`is_connectivity`](Self::is_connectivity) /
/// [`is_rejection`](Self::is_rejection)) and everything else.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// The device is reachable but refused the login handshake or the token.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, reset, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    // ── Device API ──────────────────────────────────────────────────
    /// Non-success HTTP status outside the auth range.
    #[error("HTTP {status} from {endpoint}")]
    Http { endpoint: String, status: u16 },

    /// The response envelope carried a result code other than `1000`.
    #[error("Device returned code {code} for {endpoint}")]
    DeviceCode { endpoint: String, code: u32 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the device could not be reached at all
    /// (connect failure, timeout, dropped request or body).
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect() || e.is_request() || e.is_body(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if the device answered but denied the session.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// The device result code, if the error came from the response envelope.
    pub fn device_code(&self) -> Option<u32> {
        match self {
            Self::DeviceCode { code, .. } => Some(*code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_connectivity() {
        let err = Error::Timeout { timeout_secs: 5 };
        assert!(err.is_connectivity());
        assert!(!err.is_rejection());
    }

    #[test]
    fn authentication_is_rejection() {
        let err = Error::Authentication {
            message: "login rejected".into(),
        };
        assert!(err.is_rejection());
        assert!(!err.is_connectivity());
    }

    #[test]
    fn device_code_is_neither() {
        let err = Error::DeviceCode {
            endpoint: "led/mode".into(),
            code: 1103,
        };
        assert!(!err.is_connectivity());
        assert!(!err.is_rejection());
        assert_eq!(err.device_code(), Some(1103));
    }
}
