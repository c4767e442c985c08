// ── Device actor ──
//
// Moves a `Device` into its own task. Commands from any number of cloned
// handles and the periodic poll are processed one at a time, and every
// processed operation publishes a fresh `DeviceSnapshot`.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::device::Device;
use crate::error::CoreError;
use crate::model::{DeviceIdentity, DeviceSnapshot, DeviceState, SyncOutcome};
use crate::transport::DeviceTransport;

const COMMAND_CHANNEL_SIZE: usize = 16;
const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

type Reply<T> = oneshot::Sender<Result<SyncOutcome<T>, CoreError>>;

enum Request {
    Poll { reply: Reply<DeviceState> },
    TurnOn { brightness: Option<u8>, reply: Reply<()> },
    TurnOff { reply: Reply<()> },
    SetBrightness { level: u8, reply: Reply<()> },
}

/// Cheaply cloneable handle to a running device task.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    requests: mpsc::Sender<Request>,
    snapshot: watch::Receiver<DeviceSnapshot>,
    identity: Option<DeviceIdentity>,
    cancel: CancellationToken,
}

impl DeviceHandle {
    /// Spawn the task that owns `device`.
    ///
    /// The device is polled every `poll_interval` (at least one second),
    /// starting one interval from now. The task stops when `cancel` fires or
    /// every handle has been dropped, logging out on the way.
    pub fn spawn<T>(
        device: Device<T>,
        poll_interval: Duration,
        cancel: CancellationToken,
    ) -> (Self, JoinHandle<()>)
    where
        T: DeviceTransport + 'static,
    {
        let (requests, rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let (snapshot_tx, snapshot) = watch::channel(device.snapshot());

        let handle = Self {
            requests,
            snapshot,
            identity: device.identity().cloned(),
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(device_task(
            device,
            rx,
            snapshot_tx,
            poll_interval.max(MIN_POLL_INTERVAL),
            cancel,
        ));
        (handle, task)
    }

    pub async fn poll(&self) -> Result<SyncOutcome<DeviceState>, CoreError> {
        self.request(|reply| Request::Poll { reply }).await
    }

    pub async fn turn_on(&self, brightness: Option<u8>) -> Result<SyncOutcome<()>, CoreError> {
        self.request(|reply| Request::TurnOn { brightness, reply })
            .await
    }

    pub async fn turn_off(&self) -> Result<SyncOutcome<()>, CoreError> {
        self.request(|reply| Request::TurnOff { reply }).await
    }

    pub async fn set_brightness(&self, level: u8) -> Result<SyncOutcome<()>, CoreError> {
        self.request(|reply| Request::SetBrightness { level, reply })
            .await
    }

    /// The most recently published snapshot.
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver that is notified after every processed operation.
    pub fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.snapshot.clone()
    }

    /// Identity fetched at setup.
    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    /// Stop the device task. Requests sent afterwards fail with
    /// [`CoreError::DeviceStopped`].
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.requests.is_closed()
    }

    async fn request<R>(
        &self,
        make: impl FnOnce(Reply<R>) -> Request,
    ) -> Result<SyncOutcome<R>, CoreError> {
        let (tx, rx) = oneshot::channel();
        self.requests
            .send(make(tx))
            .await
            .map_err(|_| CoreError::DeviceStopped)?;
        rx.await.map_err(|_| CoreError::DeviceStopped)?
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poll { .. } => f.write_str("Poll"),
            Self::TurnOn { brightness, .. } => {
                f.debug_struct("TurnOn").field("brightness", brightness).finish()
            }
            Self::TurnOff { .. } => f.write_str("TurnOff"),
            Self::SetBrightness { level, .. } => {
                f.debug_struct("SetBrightness").field("level", level).finish()
            }
        }
    }
}

// ── Background task ──────────────────────────────────────────────

async fn device_task<T: DeviceTransport>(
    mut device: Device<T>,
    mut rx: mpsc::Receiver<Request>,
    snapshot_tx: watch::Sender<DeviceSnapshot>,
    poll_interval: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(poll_interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            request = rx.recv() => {
                let Some(request) = request else { break };
                debug!(host = %device.host(), ?request, "processing request");
                process(&mut device, request, &snapshot_tx).await;
            }
            _ = interval.tick() => {
                if let Err(e) = device.poll().await {
                    debug!(host = %device.host(), error = %e, "poll failed");
                }
                snapshot_tx.send_replace(device.snapshot());
            }
        }
    }

    device.close().await;
    debug!(host = %device.host(), "device task stopped");
}

async fn process<T: DeviceTransport>(
    device: &mut Device<T>,
    request: Request,
    snapshot_tx: &watch::Sender<DeviceSnapshot>,
) {
    match request {
        Request::Poll { reply } => {
            let result = device.poll().await;
            respond(device, snapshot_tx, reply, result);
        }
        Request::TurnOn { brightness, reply } => {
            let result = device.turn_on(brightness).await;
            respond(device, snapshot_tx, reply, result);
        }
        Request::TurnOff { reply } => {
            let result = device.turn_off().await;
            respond(device, snapshot_tx, reply, result);
        }
        Request::SetBrightness { level, reply } => {
            let result = device.set_brightness(level).await;
            respond(device, snapshot_tx, reply, result);
        }
    }
}

/// Publish the snapshot before replying: once a caller has its reply, the
/// snapshot already reflects its request.
fn respond<T: DeviceTransport, R>(
    device: &Device<T>,
    snapshot_tx: &watch::Sender<DeviceSnapshot>,
    reply: Reply<R>,
    result: Result<SyncOutcome<R>, CoreError>,
) {
    snapshot_tx.send_replace(device.snapshot());
    // A dropped receiver just means the caller stopped waiting.
    let _ = reply.send(result);
}
