//! Shared helpers for command handlers.

use tracing::warn;

use twinkly_core::{Device, DeviceConfig, TwinklyClient};

use crate::error::CliError;

/// Set up every target device.
///
/// With several targets, devices that fail setup are skipped with a warning;
/// the command only fails when none could be set up.
pub async fn connect_all(
    targets: Vec<DeviceConfig>,
) -> Result<Vec<Device<TwinklyClient>>, CliError> {
    let many = targets.len() > 1;
    let mut devices = Vec::with_capacity(targets.len());
    let mut first_error = None;

    for target in targets {
        let host = target.host.clone();
        match Device::connect(target).await {
            Ok(device) => devices.push(device),
            Err(err) => {
                if many {
                    warn!(host = %host, error = %err, "skipping device");
                }
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) if devices.is_empty() => Err(err.into()),
        _ => Ok(devices),
    }
}

/// Log out of every device.
pub async fn close_all(devices: &mut [Device<TwinklyClient>]) {
    for device in devices {
        device.close().await;
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}
