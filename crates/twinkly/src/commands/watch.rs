//! `twinkly watch`: one device task per device, printing state changes
//! until Ctrl-C.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use twinkly_core::{DeviceConfig, DeviceHandle, LifecycleState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::commands::status::StatusView;
use crate::commands::util;
use crate::config::Config;
use crate::error::CliError;
use crate::output;

/// The parts of a view whose change is worth a new line.
type ChangeKey = (bool, LifecycleState, Option<bool>, Option<u8>);

fn change_key(view: &StatusView) -> ChangeKey {
    (
        view.available,
        view.lifecycle,
        view.power,
        view.brightness_native,
    )
}

fn watch_line(view: &StatusView, color: bool) -> String {
    let now = chrono::Local::now().format("%H:%M:%S");
    let mut line = format!(
        "{} {} {} power={} brightness={}",
        output::dim(&now.to_string(), color),
        view.name,
        output::paint(view.status_label(), view.available, color),
        view.power_label(),
        view.brightness_label(),
    );
    if let Some(ref reason) = view.unavailable_reason {
        line.push_str(&format!(" ({reason})"));
    }
    line
}

pub async fn handle(
    targets: Vec<DeviceConfig>,
    args: WatchArgs,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let interval_secs = args.interval.unwrap_or(cfg.poll_interval_secs);
    if interval_secs == 0 {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    let interval = Duration::from_secs(interval_secs);

    let devices = util::connect_all(targets).await?;
    let cancel = CancellationToken::new();
    let color = output::should_color(&global.color);

    let mut tasks = Vec::with_capacity(devices.len() * 2);
    for device in devices {
        let (handle, task) = DeviceHandle::spawn(device, interval, cancel.child_token());
        tasks.push(task);
        tasks.push(tokio::spawn(print_updates(
            handle,
            global.output.clone(),
            color,
            global.quiet,
            cancel.clone(),
        )));
    }
    info!(devices = tasks.len() / 2, interval_secs, "watching; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    cancel.cancel();

    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "watch task ended abnormally");
        }
    }
    Ok(())
}

/// Print a line whenever the device's published state changes.
async fn print_updates(
    handle: DeviceHandle,
    format: OutputFormat,
    color: bool,
    quiet: bool,
    cancel: CancellationToken,
) {
    let mut updates = handle.subscribe();
    if let Err(e) = handle.poll().await {
        warn!(error = %e, "initial poll failed");
    }

    let mut last: Option<ChangeKey> = None;
    loop {
        let view = StatusView::from(&*updates.borrow_and_update());
        let key = change_key(&view);
        if last != Some(key) {
            last = Some(key);
            match output::render_line(&format, &view, |v| watch_line(v, color)) {
                Ok(line) => output::print_output(&line, quiet),
                Err(e) => warn!(error = %e, "failed to render update"),
            }
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
}
