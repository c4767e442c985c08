//! `twinkly info`: device identity as registered by a host.

use serde::Serialize;
use tabled::Tabled;

use twinkly_core::{DeviceConfig, DeviceIdentity, DeviceRegistryEntry};

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct InfoView {
    name: String,
    host: String,
    identity: DeviceIdentity,
    registry: Option<DeviceRegistryEntry>,
}

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "UUID")]
    unique_id: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
    #[tabled(rename = "LEDs")]
    leds: String,
}

impl InfoView {
    fn row(&self) -> InfoRow {
        InfoRow {
            name: self.name.clone(),
            host: self.host.clone(),
            unique_id: self.identity.unique_id.clone(),
            mac: self.identity.mac.clone(),
            model: self.identity.model.clone(),
            firmware: self.identity.firmware_version.clone(),
            leds: self
                .identity
                .led_count
                .map_or_else(|| "-".into(), |n| n.to_string()),
        }
    }
}

pub async fn handle(targets: Vec<DeviceConfig>, global: &GlobalOpts) -> Result<(), CliError> {
    let mut devices = util::connect_all(targets).await?;

    let views: Vec<InfoView> = devices
        .iter()
        .filter_map(|device| {
            device.identity().map(|identity| InfoView {
                name: device.name().to_owned(),
                host: device.host().to_owned(),
                identity: identity.clone(),
                registry: device.registry_entry(),
            })
        })
        .collect();
    util::close_all(&mut devices).await;

    let out = output::render_list(&global.output, &views, InfoView::row, |v| {
        v.identity.unique_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
