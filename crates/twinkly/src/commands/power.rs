//! `twinkly on`, `off` and `brightness`.

use tracing::{info, warn};

use twinkly_core::{Device, DeviceConfig, SyncOutcome, TwinklyClient};

use crate::cli::GlobalOpts;
use crate::commands::status::{self, StatusView};
use crate::commands::util;
use crate::error::CliError;

#[derive(Debug, Clone, Copy)]
pub enum Action {
    /// Optional brightness on the 0–255 scale.
    On(Option<u8>),
    Off,
    Brightness(u8),
}

async fn apply(device: &mut Device<TwinklyClient>, action: Action) -> Result<(), CliError> {
    let outcome = match action {
        Action::On(brightness) => device.turn_on(brightness).await?,
        Action::Off => device.turn_off().await?,
        Action::Brightness(level) => device.set_brightness(level).await?,
    };
    match outcome {
        SyncOutcome::Ok(()) => {
            info!(host = %device.host(), ?action, "command applied");
            Ok(())
        }
        SyncOutcome::Unavailable(reason) => Err(CliError::Unavailable {
            host: device.host().to_owned(),
            reason: reason.to_string(),
        }),
    }
}

/// Apply `action` to every target and print the resulting states.
pub async fn handle(
    targets: Vec<DeviceConfig>,
    action: Action,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut devices = util::connect_all(targets).await?;
    let many = devices.len() > 1;

    let mut first_error = None;
    let mut views = Vec::with_capacity(devices.len());
    for device in &mut devices {
        match apply(device, action).await {
            Ok(()) => views.push(StatusView::from(&device.snapshot())),
            Err(err) => {
                if many {
                    warn!(host = %device.host(), error = %err, "command failed");
                }
                first_error.get_or_insert(err);
            }
        }
    }
    util::close_all(&mut devices).await;

    if !views.is_empty() {
        status::print_views(&views, global)?;
    }
    first_error.map_or(Ok(()), Err)
}
