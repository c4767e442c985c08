//! CLI configuration -- thin wrapper around `twinkly_config`.
//!
//! Adds resolution of the target devices from `GlobalOpts` overrides
//! (--host, --name, --kind, --timeout) on top of the config file.

use std::time::Duration;

use twinkly_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use twinkly_config::{Config, DeviceEntry, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Per-request timeout: flag > config file.
pub fn effective_timeout(global: &GlobalOpts, config: &Config) -> Duration {
    global
        .timeout
        .map_or_else(|| config.timeout(), Duration::from_secs)
}

/// The device entry described by --host/--name/--kind, if --host was given.
pub fn entry_from_flags(global: &GlobalOpts) -> Result<Option<DeviceEntry>, CliError> {
    let Some(ref host) = global.host else {
        return Ok(None);
    };
    twinkly_config::validate_host(host).map_err(|reason| CliError::Validation {
        field: "host".into(),
        reason,
    })?;
    Ok(Some(DeviceEntry {
        host: host.trim().to_owned(),
        name: global.name.clone(),
        kind: global.kind.map(Into::into).unwrap_or_default(),
    }))
}

/// Resolve the devices a command acts on.
///
/// `--host` selects a single device and skips the config file's device
/// list; otherwise every configured device is used.
pub fn resolve_targets(global: &GlobalOpts, config: &Config) -> Result<Vec<DeviceConfig>, CliError> {
    let timeout = effective_timeout(global, config);

    if let Some(entry) = entry_from_flags(global)? {
        return Ok(vec![config.device_config(&entry).with_timeout(timeout)]);
    }

    let targets: Vec<DeviceConfig> = config
        .to_device_configs()
        .into_iter()
        .map(|device| device.with_timeout(timeout))
        .collect();

    if targets.is_empty() {
        return Err(CliError::NoDevices {
            path: config_path().display().to_string(),
        });
    }
    Ok(targets)
}

/// Load the config file, tolerating its absence when --host is given.
pub fn load_for(global: &GlobalOpts) -> Result<Config, CliError> {
    match load_config() {
        Ok(config) => Ok(config),
        Err(err) if global.host.is_some() => {
            tracing::debug!(error = %err, "ignoring unreadable config; using --host");
            Ok(Config::default())
        }
        Err(err) => Err(err.into()),
    }
}
