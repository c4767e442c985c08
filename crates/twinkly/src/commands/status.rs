//! `twinkly status`: poll each device once and show its state.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;
use tracing::debug;

use twinkly_core::{
    DeviceConfig, DeviceSnapshot, EntityKind, LifecycleState, SyncOutcome, UnavailableReason,
};

use crate::cli::GlobalOpts;
use crate::commands::util;
use crate::error::CliError;
use crate::output;

/// Serialized form of a device snapshot, with brightness on both scales.
#[derive(Debug, Clone, Serialize)]
pub struct StatusView {
    pub name: String,
    pub host: String,
    pub kind: EntityKind,
    pub unique_id: Option<String>,
    pub available: bool,
    /// True when `power`/`brightness` are last-known values from before an outage.
    pub stale: bool,
    pub lifecycle: LifecycleState,
    pub power: Option<bool>,
    /// 0–255, unrounded.
    pub brightness: Option<f64>,
    /// 0–100, as the device reports it.
    pub brightness_native: Option<u8>,
    pub last_updated: Option<DateTime<Utc>>,
    pub unavailable_reason: Option<UnavailableReason>,
}

impl From<&DeviceSnapshot> for StatusView {
    fn from(snapshot: &DeviceSnapshot) -> Self {
        Self {
            name: snapshot.name.clone(),
            host: snapshot.host.clone(),
            kind: snapshot.kind,
            unique_id: snapshot.unique_id.clone(),
            available: snapshot.available,
            stale: snapshot.is_stale(),
            lifecycle: snapshot.lifecycle,
            power: snapshot.state.map(|s| s.power),
            brightness: snapshot.state.and_then(|s| s.brightness_external()),
            brightness_native: snapshot.state.and_then(|s| s.brightness),
            last_updated: snapshot.last_updated,
            unavailable_reason: snapshot.unavailable_reason.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct StatusRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Power")]
    power: String,
    #[tabled(rename = "Brightness")]
    brightness: String,
}

impl StatusView {
    pub fn status_label(&self) -> &'static str {
        match (self.available, self.stale) {
            (true, _) => "online",
            (false, true) => "offline (stale)",
            (false, false) => "offline",
        }
    }

    pub fn power_label(&self) -> &'static str {
        match self.power {
            Some(true) => "on",
            Some(false) => "off",
            None => "-",
        }
    }

    pub fn brightness_label(&self) -> String {
        self.brightness.map_or_else(|| "-".into(), |b| format!("{b:.1}"))
    }

    pub fn row(&self, color: bool) -> StatusRow {
        StatusRow {
            name: self.name.clone(),
            host: output::dim(&self.host, color),
            status: output::paint(self.status_label(), self.available, color),
            power: self.power_label().into(),
            brightness: self.brightness_label(),
        }
    }

    /// Tab-separated, for `--output plain`.
    pub fn line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}",
            self.name,
            self.host,
            self.status_label(),
            self.power_label(),
            self.brightness_label()
        )
    }
}

/// Render a set of views in the chosen output format and print them.
pub fn print_views(views: &[StatusView], global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);
    let out = output::render_list(&global.output, views, |v| v.row(color), StatusView::line)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn handle(targets: Vec<DeviceConfig>, global: &GlobalOpts) -> Result<(), CliError> {
    let mut devices = util::connect_all(targets).await?;

    let mut views = Vec::with_capacity(devices.len());
    for device in &mut devices {
        if let SyncOutcome::Unavailable(reason) = device.poll().await? {
            debug!(host = %device.host(), %reason, "device unavailable");
        }
        views.push(StatusView::from(&device.snapshot()));
    }
    util::close_all(&mut devices).await;

    print_views(&views, global)
}
