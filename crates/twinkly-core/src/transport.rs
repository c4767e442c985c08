// ── Transport seam ──
//
// Everything core needs from the network, as a trait. `TwinklyClient`
// is the production implementation; tests script their own.

use std::future::Future;

use twinkly_api::{AuthToken, Error as ApiError, FirmwareVersion, Gestalt, LedMode, LoginGrant, TwinklyClient};

/// Raw request/response calls against one device's control endpoint.
///
/// Implementations perform exactly one network exchange per call, with no
/// retries; a failed call is reported once and the next poll tries again.
pub trait DeviceTransport: Send + Sync {
    /// Address of the device, used in errors and logs.
    fn host(&self) -> String;

    fn login(&self) -> impl Future<Output = Result<LoginGrant, ApiError>> + Send;

    fn verify(
        &self,
        token: &AuthToken,
        challenge_response: &str,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn logout(&self, token: &AuthToken) -> impl Future<Output = Result<(), ApiError>> + Send;

    fn gestalt(&self, token: &AuthToken) -> impl Future<Output = Result<Gestalt, ApiError>> + Send;

    fn firmware_version(
        &self,
        token: &AuthToken,
    ) -> impl Future<Output = Result<FirmwareVersion, ApiError>> + Send;

    fn led_mode(&self, token: &AuthToken) -> impl Future<Output = Result<LedMode, ApiError>> + Send;

    fn set_led_mode(
        &self,
        token: &AuthToken,
        mode: LedMode,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Native brightness, 0–100.
    fn brightness(&self, token: &AuthToken) -> impl Future<Output = Result<u8, ApiError>> + Send;

    /// Native brightness, 0–100.
    fn set_brightness(
        &self,
        token: &AuthToken,
        value: u8,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

impl DeviceTransport for TwinklyClient {
    fn host(&self) -> String {
        TwinklyClient::host(self)
    }

    async fn login(&self) -> Result<LoginGrant, ApiError> {
        TwinklyClient::login(self).await
    }

    async fn verify(&self, token: &AuthToken, challenge_response: &str) -> Result<(), ApiError> {
        TwinklyClient::verify(self, token, challenge_response).await
    }

    async fn logout(&self, token: &AuthToken) -> Result<(), ApiError> {
        TwinklyClient::logout(self, token).await
    }

    async fn gestalt(&self, token: &AuthToken) -> Result<Gestalt, ApiError> {
        TwinklyClient::gestalt(self, token).await
    }

    async fn firmware_version(&self, token: &AuthToken) -> Result<FirmwareVersion, ApiError> {
        TwinklyClient::firmware_version(self, token).await
    }

    async fn led_mode(&self, token: &AuthToken) -> Result<LedMode, ApiError> {
        TwinklyClient::led_mode(self, token).await
    }

    async fn set_led_mode(&self, token: &AuthToken, mode: LedMode) -> Result<(), ApiError> {
        TwinklyClient::set_led_mode(self, token, mode).await
    }

    async fn brightness(&self, token: &AuthToken) -> Result<u8, ApiError> {
        TwinklyClient::brightness(self, token).await
    }

    async fn set_brightness(&self, token: &AuthToken, value: u8) -> Result<(), ApiError> {
        TwinklyClient::set_brightness(self, token, value).await
    }
}
