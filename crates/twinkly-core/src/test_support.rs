// Scripted in-memory transport for unit tests.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use twinkly_api::{AuthToken, Error as ApiError, FirmwareVersion, Gestalt, LedMode, LoginGrant};

use crate::transport::DeviceTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Call {
    Login,
    Verify,
    Logout,
    Gestalt,
    FirmwareVersion,
    ReadMode,
    SetMode(LedMode),
    ReadBrightness,
    SetBrightness(u8),
}

impl Call {
    pub(crate) fn is_command(self) -> bool {
        matches!(self, Self::SetMode(_) | Self::SetBrightness(_))
    }
}

#[derive(Debug)]
struct Script {
    reachable: bool,
    accept_login: bool,
    identity_available: bool,
    token_lifetime: Duration,
    /// HTTP status every exchange fails with.
    http_fault: Option<u16>,
    /// HTTP status every exchange except the handshake fails with.
    http_fault_after_login: Option<u16>,
    mode: LedMode,
    brightness: u8,
    calls: Vec<Call>,
}

/// A device that lives in memory. Flip `reachable` / `accept_login` to
/// simulate outages and refusals.
#[derive(Debug)]
pub(crate) struct FakeDevice {
    script: Mutex<Script>,
}

impl FakeDevice {
    pub(crate) fn new() -> Self {
        Self {
            script: Mutex::new(Script {
                reachable: true,
                accept_login: true,
                identity_available: true,
                token_lifetime: Duration::from_secs(14_400),
                http_fault: None,
                http_fault_after_login: None,
                mode: LedMode::Movie,
                brightness: 50,
                calls: Vec::new(),
            }),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    pub(crate) fn set_reachable(&self, reachable: bool) {
        self.script().reachable = reachable;
    }

    pub(crate) fn set_accept_login(&self, accept: bool) {
        self.script().accept_login = accept;
    }

    pub(crate) fn set_identity_available(&self, available: bool) {
        self.script().identity_available = available;
    }

    pub(crate) fn set_token_lifetime(&self, lifetime: Duration) {
        self.script().token_lifetime = lifetime;
    }

    pub(crate) fn set_http_fault(&self, status: Option<u16>) {
        self.script().http_fault = status;
    }

    pub(crate) fn set_http_fault_after_login(&self, status: Option<u16>) {
        self.script().http_fault_after_login = status;
    }

    pub(crate) fn set_mode(&self, mode: LedMode) {
        self.script().mode = mode;
    }

    pub(crate) fn set_native_brightness(&self, value: u8) {
        self.script().brightness = value;
    }

    pub(crate) fn mode(&self) -> LedMode {
        self.script().mode
    }

    pub(crate) fn native_brightness(&self) -> u8 {
        self.script().brightness
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.script().calls.clone()
    }

    pub(crate) fn command_count(&self) -> usize {
        self.script().calls.iter().filter(|c| c.is_command()).count()
    }

    pub(crate) fn clear_calls(&self) {
        self.script().calls.clear();
    }

    fn exchange(&self, call: Call) -> Result<MutexGuard<'_, Script>, ApiError> {
        let mut script = self.script();
        script.calls.push(call);
        if !script.reachable {
            return Err(ApiError::Timeout { timeout_secs: 5 });
        }
        let handshake = matches!(call, Call::Login | Call::Verify);
        let fault = script
            .http_fault
            .or(script.http_fault_after_login.filter(|_| !handshake));
        match fault {
            Some(status) => Err(ApiError::Http {
                endpoint: format!("{call:?}"),
                status,
            }),
            None => Ok(script),
        }
    }
}

impl DeviceTransport for FakeDevice {
    fn host(&self) -> String {
        "fake.local".into()
    }

    async fn login(&self) -> Result<LoginGrant, ApiError> {
        let script = self.exchange(Call::Login)?;
        if !script.accept_login {
            return Err(ApiError::Authentication {
                message: "device busy".into(),
            });
        }
        Ok(LoginGrant {
            token: AuthToken::new("fake-token"),
            challenge_response: "fake-response".into(),
            expires_in: script.token_lifetime,
        })
    }

    async fn verify(&self, _token: &AuthToken, _challenge_response: &str) -> Result<(), ApiError> {
        self.exchange(Call::Verify).map(drop)
    }

    async fn logout(&self, _token: &AuthToken) -> Result<(), ApiError> {
        self.exchange(Call::Logout).map(drop)
    }

    async fn gestalt(&self, _token: &AuthToken) -> Result<Gestalt, ApiError> {
        let script = self.exchange(Call::Gestalt)?;
        if !script.identity_available {
            return Err(ApiError::DeviceCode {
                endpoint: "gestalt".into(),
                code: 1103,
            });
        }
        Ok(Gestalt {
            uuid: "00000000-0000-0000-0000-000000000001".into(),
            mac: "98:cd:ac:00:11:22".into(),
            product_code: "TWW210SPP".into(),
            product_name: Some("Twinkly".into()),
            device_name: Some("Tree".into()),
            hardware_version: Some("100".into()),
            number_of_led: Some(210),
        })
    }

    async fn firmware_version(&self, _token: &AuthToken) -> Result<FirmwareVersion, ApiError> {
        self.exchange(Call::FirmwareVersion)?;
        Ok(FirmwareVersion {
            version: "2.8.11".into(),
        })
    }

    async fn led_mode(&self, _token: &AuthToken) -> Result<LedMode, ApiError> {
        Ok(self.exchange(Call::ReadMode)?.mode)
    }

    async fn set_led_mode(&self, _token: &AuthToken, mode: LedMode) -> Result<(), ApiError> {
        self.exchange(Call::SetMode(mode))?.mode = mode;
        Ok(())
    }

    async fn brightness(&self, _token: &AuthToken) -> Result<u8, ApiError> {
        Ok(self.exchange(Call::ReadBrightness)?.brightness)
    }

    async fn set_brightness(&self, _token: &AuthToken, value: u8) -> Result<(), ApiError> {
        self.exchange(Call::SetBrightness(value))?.brightness = value;
        Ok(())
    }
}
