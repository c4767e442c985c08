//! Configuration for the `twinkly` CLI and other hosts.
//!
//! A TOML file listing devices plus poll and timeout settings, layered with
//! `TWINKLY_*` environment overrides, and translated into one
//! [`twinkly_core::DeviceConfig`] per device. Core never reads files; this
//! crate is the only place that does.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use twinkly_core::{DeviceConfig, EntityKind};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Seconds between polls in `watch`.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub devices: Vec<DeviceEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_timeout(),
            devices: Vec::new(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    5
}

/// One `[[devices]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DeviceEntry {
    /// IP address or hostname, optionally with `:port`. No scheme, no path.
    pub host: String,

    /// Display name; defaults by kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub kind: EntityKind,
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check values serde cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "timeout_secs".into(),
                reason: "must be at least 1".into(),
            });
        }
        for (index, device) in self.devices.iter().enumerate() {
            validate_host(&device.host).map_err(|reason| ConfigError::Validation {
                field: format!("devices[{index}].host"),
                reason,
            })?;
        }
        Ok(())
    }

    /// One `DeviceConfig` per configured device, in file order.
    pub fn to_device_configs(&self) -> Vec<DeviceConfig> {
        self.devices
            .iter()
            .map(|entry| self.device_config(entry))
            .collect()
    }

    pub fn device_config(&self, entry: &DeviceEntry) -> DeviceConfig {
        let mut config = DeviceConfig::new(entry.host.trim())
            .with_kind(entry.kind)
            .with_timeout(self.timeout());
        if let Some(ref name) = entry.name {
            config = config.with_name(name.clone());
        }
        config
    }
}

/// A device host must be a bare `host` or `host:port`.
pub fn validate_host(host: &str) -> Result<(), String> {
    let host = host.trim();
    if host.is_empty() {
        return Err("must not be empty".into());
    }
    if host.contains("://") {
        return Err(format!("'{host}' must not include a scheme"));
    }
    if host.contains('/') {
        return Err(format!("'{host}' must not include a path"));
    }
    if host.chars().any(char::is_whitespace) {
        return Err(format!("'{host}' must not contain whitespace"));
    }
    Ok(())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "twinkly", "twinkly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("twinkly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load and validate the config at `path`, then apply `TWINKLY_*`
/// environment overrides. A missing file yields the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TWINKLY_").only(&["poll_interval_secs", "timeout_secs"]));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.poll_interval_secs, 30);
        assert_eq!(config.timeout_secs, 5);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn devices_load_with_kind_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            &dir,
            r#"
poll_interval_secs = 10

[[devices]]
host = "192.168.1.50"
name = "Tree"

[[devices]]
host = "192.168.1.51:8080"
kind = "switch"
"#,
        );

        let config = load_config_from(&path).unwrap();
        let devices = config.to_device_configs();

        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].display_name(), "Tree");
        assert_eq!(devices[0].kind, EntityKind::Light);
        assert_eq!(devices[1].host, "192.168.1.51:8080");
        assert_eq!(devices[1].display_name(), "Twinkly Switch");
        assert_eq!(devices[1].timeout, Duration::from_secs(5));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[[devices]]\nhost = \"10.0.0.2\"\nkind = \"dimmer\"\n");

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Figment(_))
        ));
    }

    #[test]
    fn host_with_scheme_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "[[devices]]\nhost = \"http://10.0.0.2\"\n");

        let err = load_config_from(&path).unwrap_err();
        match err {
            ConfigError::Validation { field, .. } => assert_eq!(field, "devices[0].host"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn zero_poll_interval_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "poll_interval_secs = 0\n");

        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn validate_host_cases() {
        assert!(validate_host("twinkly.local").is_ok());
        assert!(validate_host("10.0.0.2:80").is_ok());
        assert!(validate_host("  ").is_err());
        assert!(validate_host("10.0.0.2/xled").is_err());
    }

    #[test]
    fn save_then_load_preserves_devices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = Config {
            devices: vec![DeviceEntry {
                host: "10.0.0.9".into(),
                name: None,
                kind: EntityKind::Switch,
            }],
            ..Config::default()
        };

        save_config_to(&config, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("kind = \"switch\""), "{written}");
        assert_eq!(load_config_from(&path).unwrap(), config);
    }
}
