// Shared transport configuration for building reqwest::Client instances.
//
// Twinkly controllers only speak plain HTTP on the local network, so the
// knobs that matter are timeouts and the user agent.

use std::time::Duration;

use crate::error::Error;

const USER_AGENT: &str = concat!("twinkly-rs/", env!("CARGO_PKG_VERSION"));

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Whole-request timeout. A device that misses it is treated as unreachable.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    /// Config with the given request timeout; the connect timeout never exceeds it.
    pub fn with_timeout(timeout: Duration) -> Self {
        let defaults = Self::default();
        Self {
            timeout,
            connect_timeout: defaults.connect_timeout.min(timeout),
        }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_timeout_caps_connect_timeout() {
        let config = TransportConfig::with_timeout(Duration::from_secs(2));
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.connect_timeout, Duration::from_secs(2));
    }

    #[test]
    fn long_timeout_keeps_default_connect_timeout() {
        let config = TransportConfig::with_timeout(Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }
}
