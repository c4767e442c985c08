// ── Device composition ──
//
// One `Device` per configured controller. It owns the session, the sync
// layer, the cached identity and the last-known state, and folds every
// recoverable failure into an availability downgrade.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use twinkly_api::TwinklyClient;

use crate::brightness;
use crate::config::{DeviceConfig, EntityKind};
use crate::error::{CoreError, UnavailableReason};
use crate::model::{
    DeviceIdentity, DeviceRegistryEntry, DeviceSnapshot, DeviceState, LifecycleState, SyncOutcome,
};
use crate::session::SessionManager;
use crate::sync::DeviceStateSync;
use crate::transport::DeviceTransport;

#[derive(Debug, Clone, Copy)]
enum Command {
    Power(bool),
    Brightness(u8),
}

/// A single Twinkly controller as seen by the host.
///
/// Availability is `session_ok && state_ok`: the last authentication and the
/// last state exchange must both have succeeded. The last-known state is kept
/// while unavailable so hosts can keep showing it.
pub struct Device<T> {
    config: DeviceConfig,
    session: SessionManager<T>,
    sync: DeviceStateSync<T>,
    identity: Option<DeviceIdentity>,
    lifecycle: LifecycleState,
    session_ok: bool,
    state_ok: bool,
    /// Availability as of the last settled operation; `None` before the first.
    reported: Option<bool>,
    state: Option<DeviceState>,
    last_updated: Option<DateTime<Utc>>,
    last_failure: Option<UnavailableReason>,
}

impl Device<TwinklyClient> {
    /// Build the HTTP transport from `config` and run [`Device::setup`].
    pub async fn connect(config: DeviceConfig) -> Result<Self, CoreError> {
        let client = config.build_client()?;
        Self::setup(config, Arc::new(client)).await
    }
}

impl<T: DeviceTransport> Device<T> {
    pub fn new(config: DeviceConfig, transport: Arc<T>) -> Self {
        let session = SessionManager::new(Arc::clone(&transport));
        let sync = DeviceStateSync::new(transport, config.kind);
        Self {
            config,
            session,
            sync,
            identity: None,
            lifecycle: LifecycleState::Unauthenticated,
            session_ok: false,
            state_ok: true,
            reported: None,
            state: None,
            last_updated: None,
            last_failure: None,
        }
    }

    /// Construct, authenticate and fetch the identity.
    ///
    /// Any failure yields [`CoreError::IdentityUnavailable`]: a device whose
    /// identity is unknown is never exposed.
    pub async fn setup(config: DeviceConfig, transport: Arc<T>) -> Result<Self, CoreError> {
        let mut device = Self::new(config, transport);

        match device.try_authenticate().await {
            Ok(SyncOutcome::Ok(())) => {}
            Ok(SyncOutcome::Unavailable(reason)) => {
                return Err(device.not_exposed(reason.to_string()));
            }
            Err(err) => return Err(device.not_exposed(err.to_string())),
        }

        let identity = match device.fetch_device_identity().await {
            Ok(identity) => identity,
            Err(err) => return Err(device.not_exposed(err.to_string())),
        };
        device.settle();

        info!(
            host = %device.host(),
            name = %device.name(),
            unique_id = %identity.unique_id,
            model = %identity.model,
            firmware = %identity.firmware_version,
            "device set up"
        );
        Ok(device)
    }

    fn not_exposed(&self, reason: String) -> CoreError {
        CoreError::IdentityUnavailable {
            host: self.host().to_owned(),
            reason,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn host(&self) -> &str {
        self.session.endpoint()
    }

    pub fn name(&self) -> &str {
        self.config.display_name()
    }

    pub fn kind(&self) -> EntityKind {
        self.config.kind
    }

    pub fn is_available(&self) -> bool {
        self.session_ok && self.state_ok
    }

    pub fn lifecycle(&self) -> LifecycleState {
        self.lifecycle
    }

    /// Last-known state. Stale when [`is_available`](Self::is_available) is false.
    pub fn state(&self) -> Option<DeviceState> {
        self.state
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn identity(&self) -> Option<&DeviceIdentity> {
        self.identity.as_ref()
    }

    pub fn unique_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.unique_id.as_str())
    }

    pub fn registry_entry(&self) -> Option<DeviceRegistryEntry> {
        self.identity
            .as_ref()
            .map(|identity| DeviceRegistryEntry::new(identity, self.name()))
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            name: self.name().to_owned(),
            host: self.host().to_owned(),
            kind: self.kind(),
            unique_id: self.unique_id().map(str::to_owned),
            lifecycle: self.lifecycle,
            available: self.is_available(),
            state: self.state,
            last_updated: self.last_updated,
            unavailable_reason: self.last_failure.clone(),
        }
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Establish or refresh the session.
    pub async fn authenticate(&mut self) -> Result<SyncOutcome<()>, CoreError> {
        let outcome = self.try_authenticate().await;
        self.settle();
        outcome
    }

    /// Read power and brightness with the current session.
    pub async fn read_state(&mut self) -> Result<SyncOutcome<DeviceState>, CoreError> {
        let outcome = self.try_read_state().await;
        self.settle();
        outcome
    }

    /// One poll tick: refresh the session, then read state.
    pub async fn poll(&mut self) -> Result<SyncOutcome<DeviceState>, CoreError> {
        let outcome = match self.try_authenticate().await {
            Ok(SyncOutcome::Ok(())) => self.try_read_state().await,
            Ok(SyncOutcome::Unavailable(reason)) => Ok(SyncOutcome::Unavailable(reason)),
            Err(err) => Err(err),
        };
        self.settle();
        outcome
    }

    /// Identity of the device, fetched on first use and cached after that.
    pub async fn fetch_device_identity(&mut self) -> Result<DeviceIdentity, CoreError> {
        if let Some(identity) = &self.identity {
            return Ok(identity.clone());
        }
        let session = self.session.require_session()?;
        let identity = self.sync.fetch_device_identity(session).await?;
        Ok(self.identity.insert(identity).clone())
    }

    pub async fn set_power(&mut self, on: bool) -> Result<SyncOutcome<()>, CoreError> {
        let outcome = self.run_commands(&[Command::Power(on)]).await;
        self.settle();
        outcome
    }

    /// Turn the LEDs on, then set brightness (0–255) when given.
    /// A switch ignores the brightness.
    pub async fn turn_on(&mut self, brightness: Option<u8>) -> Result<SyncOutcome<()>, CoreError> {
        let commands = match brightness {
            Some(level) if self.kind().supports_brightness() => {
                vec![Command::Power(true), Command::Brightness(level)]
            }
            Some(level) => {
                debug!(host = %self.host(), level, "ignoring brightness for a switch");
                vec![Command::Power(true)]
            }
            None => vec![Command::Power(true)],
        };
        let outcome = self.run_commands(&commands).await;
        self.settle();
        outcome
    }

    pub async fn turn_off(&mut self) -> Result<SyncOutcome<()>, CoreError> {
        self.set_power(false).await
    }

    /// Set brightness on the host scale (0–255).
    pub async fn set_brightness(&mut self, level: u8) -> Result<SyncOutcome<()>, CoreError> {
        if !self.kind().supports_brightness() {
            return Err(CoreError::Unsupported {
                operation: "set_brightness".into(),
                kind: self.kind().to_string(),
            });
        }
        let outcome = self.run_commands(&[Command::Brightness(level)]).await;
        self.settle();
        outcome
    }

    /// Log out. The device stays usable; the next operation logs in again.
    pub async fn close(&mut self) {
        self.session.close().await;
        self.session_ok = false;
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn try_authenticate(&mut self) -> Result<SyncOutcome<()>, CoreError> {
        match self.session.authenticate().await {
            Ok(true) => {
                self.session_ok = true;
                self.lifecycle = LifecycleState::Authenticated;
                Ok(SyncOutcome::Ok(()))
            }
            Ok(false) => Ok(self.session_failed(UnavailableReason::Rejected {
                reason: "device refused authentication".into(),
            })),
            Err(err) => match err.unavailable_reason() {
                Some(reason) => Ok(self.session_failed(reason)),
                None => {
                    self.session_down(UnavailableReason::Fault {
                        reason: err.to_string(),
                    });
                    Err(err)
                }
            },
        }
    }

    async fn try_read_state(&mut self) -> Result<SyncOutcome<DeviceState>, CoreError> {
        let result = match self.session.require_session() {
            Ok(session) => self.sync.read_state(session).await,
            Err(err) => Err(err),
        };
        match result {
            Ok(state) => {
                self.state_ok = true;
                self.state = Some(state);
                self.last_updated = Some(Utc::now());
                Ok(SyncOutcome::Ok(state))
            }
            Err(err) => self.state_failed(err),
        }
    }

    /// Authenticate, then send `commands` in order. Nothing is sent when
    /// authentication does not succeed.
    async fn run_commands(&mut self, commands: &[Command]) -> Result<SyncOutcome<()>, CoreError> {
        if let SyncOutcome::Unavailable(reason) = self.try_authenticate().await? {
            debug!(host = %self.host(), ?commands, "no session; command not sent");
            return Ok(SyncOutcome::Unavailable(reason));
        }

        for &command in commands {
            let result = match self.session.require_session() {
                Ok(session) => match command {
                    Command::Power(on) => self.sync.set_power(session, on).await,
                    Command::Brightness(level) => self.sync.set_brightness(session, level).await,
                },
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => {
                    self.state_ok = true;
                    self.apply(command);
                }
                Err(err) => return self.state_failed(err),
            }
        }
        Ok(SyncOutcome::Ok(()))
    }

    /// Update the cached state after a command the device accepted.
    fn apply(&mut self, command: Command) {
        let mut state = self.state.unwrap_or(DeviceState {
            power: false,
            brightness: None,
        });
        match command {
            Command::Power(on) => state.power = on,
            Command::Brightness(level) => state.brightness = Some(brightness::to_native(level)),
        }
        self.state = Some(state);
    }

    fn session_failed<U>(&mut self, reason: UnavailableReason) -> SyncOutcome<U> {
        self.session_down(reason.clone());
        SyncOutcome::Unavailable(reason)
    }

    fn session_down(&mut self, reason: UnavailableReason) {
        self.session_ok = false;
        self.lifecycle = LifecycleState::Unavailable;
        self.last_failure = Some(reason);
    }

    /// A failed state exchange drops the session too. Errors the core does
    /// not recover from still mark the device unavailable before propagating.
    fn state_failed<U>(&mut self, err: CoreError) -> Result<SyncOutcome<U>, CoreError> {
        let recoverable = err.unavailable_reason();
        self.state_ok = false;
        self.session_ok = false;
        self.session.invalidate();
        self.lifecycle = LifecycleState::Unavailable;
        match recoverable {
            Some(reason) => {
                self.last_failure = Some(reason.clone());
                Ok(SyncOutcome::Unavailable(reason))
            }
            None => {
                self.last_failure = Some(UnavailableReason::Fault {
                    reason: err.to_string(),
                });
                Err(err)
            }
        }
    }

    /// Log availability edges. Repeated failures stay quiet.
    fn settle(&mut self) {
        let available = self.is_available();
        let previous = self.reported.replace(available);
        if previous == Some(available) {
            return;
        }

        if available {
            self.last_failure = None;
            if previous == Some(false) {
                info!(host = %self.host(), name = %self.name(), "device is available again");
            }
        } else {
            let reason = self
                .last_failure
                .as_ref()
                .map_or_else(|| "unknown".to_owned(), ToString::to_string);
            warn!(host = %self.host(), name = %self.name(), %reason, "device became unavailable");
        }
    }
}
