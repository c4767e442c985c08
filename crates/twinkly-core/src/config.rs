// ── Per-device runtime configuration ──
//
// Describes *which* device to talk to and how to expose it. Built by the
// host (CLI, config loader) and handed to `Device` -- core never reads
// config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use twinkly_api::{TransportConfig, TwinklyClient};

use crate::error::CoreError;

/// How a device is presented to the host.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EntityKind {
    /// Power and brightness.
    #[default]
    Light,
    /// Power only.
    Switch,
}

impl EntityKind {
    /// Display name used when the configuration does not give one.
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Light => "Twinkly Light",
            Self::Switch => "Twinkly Switch",
        }
    }

    pub fn supports_brightness(self) -> bool {
        matches!(self, Self::Light)
    }
}

/// Configuration for a single device instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// IP address or hostname, optionally with `:port`.
    pub host: String,
    /// Display name; falls back to [`EntityKind::default_name`].
    pub name: Option<String>,
    pub kind: EntityKind,
    /// Per-request timeout. A request that exceeds it counts as a connectivity loss.
    pub timeout: Duration,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: None,
            kind: EntityKind::default(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_kind(mut self, kind: EntityKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.default_name())
    }

    /// Build the HTTP transport for this device.
    pub fn build_client(&self) -> Result<TwinklyClient, CoreError> {
        if self.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device host must not be empty".into(),
            });
        }
        let transport = TransportConfig::with_timeout(self.timeout);
        TwinklyClient::new(&self.host, &transport).map_err(|e| CoreError::from_api(&self.host, e))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn display_name_defaults_by_kind() {
        let light = DeviceConfig::new("10.0.0.5");
        assert_eq!(light.display_name(), "Twinkly Light");

        let switch = DeviceConfig::new("10.0.0.5").with_kind(EntityKind::Switch);
        assert_eq!(switch.display_name(), "Twinkly Switch");

        let named = switch.with_name("Porch");
        assert_eq!(named.display_name(), "Porch");
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!(EntityKind::from_str("Switch").unwrap(), EntityKind::Switch);
        assert_eq!(EntityKind::Light.to_string(), "light");
    }

    #[test]
    fn empty_host_is_config_error() {
        let err = DeviceConfig::new("  ").build_client().unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
