// ── Device state synchronization ──
//
// Reads and writes power and brightness through a borrowed `Session`.
// Taking the session by reference means a call cannot be made without one.

use std::sync::Arc;

use tracing::debug;
use twinkly_api::LedMode;

use crate::brightness;
use crate::config::EntityKind;
use crate::error::CoreError;
use crate::model::{DeviceIdentity, DeviceState};
use crate::session::Session;
use crate::transport::DeviceTransport;

/// Reads and writes one device's state.
pub struct DeviceStateSync<T> {
    transport: Arc<T>,
    endpoint: String,
    kind: EntityKind,
}

impl<T: DeviceTransport> DeviceStateSync<T> {
    pub fn new(transport: Arc<T>, kind: EntityKind) -> Self {
        let endpoint = transport.host();
        Self {
            transport,
            endpoint,
            kind,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    fn api_error(&self, err: twinkly_api::Error) -> CoreError {
        CoreError::from_api(&self.endpoint, err)
    }

    /// Fetch uuid, MAC, model and firmware. Called once per device.
    pub async fn fetch_device_identity(&self, session: &Session) -> Result<DeviceIdentity, CoreError> {
        let token = session.token();
        let gestalt = self
            .transport
            .gestalt(token)
            .await
            .map_err(|e| self.api_error(e))?;
        let firmware = self
            .transport
            .firmware_version(token)
            .await
            .map_err(|e| self.api_error(e))?;
        Ok(DeviceIdentity::from_parts(gestalt, firmware))
    }

    /// Current power and native brightness. Switches read power only.
    pub async fn read_state(&self, session: &Session) -> Result<DeviceState, CoreError> {
        let token = session.token();
        let mode = self
            .transport
            .led_mode(token)
            .await
            .map_err(|e| self.api_error(e))?;

        let brightness = if self.kind.supports_brightness() {
            Some(
                self.transport
                    .brightness(token)
                    .await
                    .map_err(|e| self.api_error(e))?,
            )
        } else {
            None
        };

        let state = DeviceState {
            power: mode.is_on(),
            brightness,
        };
        debug!(host = %self.endpoint, ?mode, ?state, "state read");
        Ok(state)
    }

    /// Turn the LEDs on or off. Repeating a command is harmless.
    pub async fn set_power(&self, session: &Session, on: bool) -> Result<(), CoreError> {
        self.transport
            .set_led_mode(session.token(), LedMode::for_power(on))
            .await
            .map_err(|e| self.api_error(e))
    }

    /// Set brightness from the host scale (0–255); the device receives
    /// `round(level / 2.55)`.
    pub async fn set_brightness(&self, session: &Session, level: u8) -> Result<(), CoreError> {
        let native = brightness::to_native(level);
        debug!(host = %self.endpoint, level, native, "converting brightness");
        self.transport
            .set_brightness(session.token(), native)
            .await
            .map_err(|e| self.api_error(e))
    }

    /// Brightness on the host scale: `native * 2.55`, unrounded.
    pub async fn read_brightness(&self, session: &Session) -> Result<f64, CoreError> {
        let native = self
            .transport
            .brightness(session.token())
            .await
            .map_err(|e| self.api_error(e))?;
        Ok(brightness::to_external(native))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::SessionManager;
    use crate::test_support::{Call, FakeDevice};

    async fn authenticated(
        kind: EntityKind,
    ) -> (Arc<FakeDevice>, SessionManager<FakeDevice>, DeviceStateSync<FakeDevice>) {
        let device = Arc::new(FakeDevice::new());
        let mut session = SessionManager::new(Arc::clone(&device));
        assert!(session.authenticate().await.unwrap());
        let sync = DeviceStateSync::new(Arc::clone(&device), kind);
        device.clear_calls();
        (device, session, sync)
    }

    #[tokio::test]
    async fn read_state_on_with_mid_brightness() {
        let (device, session, sync) = authenticated(EntityKind::Light).await;
        device.set_mode(LedMode::Movie);
        device.set_native_brightness(50);

        let state = sync.read_state(session.session().unwrap()).await.unwrap();

        assert!(state.power);
        assert_eq!(state.brightness, Some(50));
        assert_eq!(state.brightness_external(), Some(127.5));
    }

    #[tokio::test]
    async fn switch_reads_power_only() {
        let (device, session, sync) = authenticated(EntityKind::Switch).await;
        device.set_mode(LedMode::Off);

        let state = sync.read_state(session.session().unwrap()).await.unwrap();

        assert_eq!(
            state,
            DeviceState {
                power: false,
                brightness: None
            }
        );
        assert_eq!(device.calls(), vec![Call::ReadMode]);
    }

    #[tokio::test]
    async fn read_brightness_bounds() {
        let (device, session, sync) = authenticated(EntityKind::Light).await;
        let session = session.session().unwrap();

        device.set_native_brightness(100);
        let full = sync.read_brightness(session).await.unwrap();
        assert!((full - 255.0).abs() < f64::EPSILON);

        device.set_native_brightness(0);
        let dark = sync.read_brightness(session).await.unwrap();
        assert!(dark.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn set_brightness_converts_to_native() {
        let (device, session, sync) = authenticated(EntityKind::Light).await;

        sync.set_brightness(session.session().unwrap(), 128)
            .await
            .unwrap();

        assert_eq!(device.calls(), vec![Call::SetBrightness(50)]);
        assert_eq!(device.native_brightness(), 50);
    }

    #[tokio::test]
    async fn set_power_twice_matches_once() {
        let (device, session, sync) = authenticated(EntityKind::Light).await;
        device.set_mode(LedMode::Off);
        let session = session.session().unwrap();

        sync.set_power(session, true).await.unwrap();
        let once = sync.read_state(session).await.unwrap();
        sync.set_power(session, true).await.unwrap();
        let twice = sync.read_state(session).await.unwrap();

        assert_eq!(once, twice);
        assert_eq!(device.mode(), LedMode::Movie);
    }

    #[tokio::test]
    async fn identity_combines_gestalt_and_firmware() {
        let (_device, session, sync) = authenticated(EntityKind::Light).await;

        let identity = sync
            .fetch_device_identity(session.session().unwrap())
            .await
            .unwrap();

        assert_eq!(identity.unique_id, "00000000-0000-0000-0000-000000000001");
        assert_eq!(identity.mac, "98:cd:ac:00:11:22");
        assert_eq!(identity.model, "TWW210SPP");
        assert_eq!(identity.firmware_version, "2.8.11");
    }

    #[tokio::test]
    async fn transport_failure_is_connectivity() {
        let (device, session, sync) = authenticated(EntityKind::Light).await;
        device.set_reachable(false);

        let err = sync
            .read_state(session.session().unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, CoreError::Connectivity { .. }));
    }
}
