// LED output endpoints
//
// Power is expressed through the LED mode (`off` vs. anything else);
// brightness is an absolute value on the device's 0–100 scale.

use tracing::debug;

use crate::auth::AuthToken;
use crate::client::TwinklyClient;
use crate::error::Error;
use crate::models::{Ack, BrightnessRequest, BrightnessResponse, LedMode, ModeRequest, ModeResponse};

impl TwinklyClient {
    /// `GET /xled/v1/led/mode`
    pub async fn led_mode(&self, token: &AuthToken) -> Result<LedMode, Error> {
        let resp: ModeResponse = self.get("led/mode", Some(token)).await?;
        Ok(resp.mode)
    }

    /// `POST /xled/v1/led/mode` with `{"mode": ...}`
    pub async fn set_led_mode(&self, token: &AuthToken, mode: LedMode) -> Result<(), Error> {
        debug!(?mode, "setting LED mode");
        let _: Ack = self
            .post("led/mode", Some(token), &ModeRequest { mode })
            .await?;
        Ok(())
    }

    /// Native brightness, 0–100.
    ///
    /// `GET /xled/v1/led/out/brightness`
    pub async fn brightness(&self, token: &AuthToken) -> Result<u8, Error> {
        let resp: BrightnessResponse = self.get("led/out/brightness", Some(token)).await?;
        Ok(resp.value)
    }

    /// Set native brightness, 0–100.
    ///
    /// `POST /xled/v1/led/out/brightness` with `{"type": "A", "mode": "enabled", "value": ...}`
    pub async fn set_brightness(&self, token: &AuthToken, value: u8) -> Result<(), Error> {
        debug!(value, "setting brightness");
        let _: Ack = self
            .post(
                "led/out/brightness",
                Some(token),
                &BrightnessRequest::absolute(value),
            )
            .await?;
        Ok(())
    }
}
