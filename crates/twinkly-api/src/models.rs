// Response and request bodies for the `/xled/v1` API.
//
// Only the fields this workspace reads are modelled; everything else in the
// device's JSON is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Result code the device reports for a successful call.
pub const CODE_OK: u32 = 1000;

/// Token lifetime the firmware uses when the login response omits it.
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 14_400;

/// Every response is a flat object with a `code` next to the payload fields.
#[derive(Debug, Deserialize)]
pub(crate) struct Coded<T> {
    pub code: u32,
    #[serde(flatten)]
    pub body: T,
}

/// Just the `code`, read before the payload so refusals without payload
/// fields still map to a device code.
#[derive(Debug, Deserialize)]
pub(crate) struct CodeHeader {
    pub code: u32,
}

/// Payload-free acknowledgement (`{"code": 1000}`).
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {}

/// `POST /login` response.
#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub authentication_token: String,
    #[serde(default = "default_token_lifetime")]
    pub authentication_token_expires_in: u64,
    #[serde(rename = "challenge-response")]
    pub challenge_response: String,
}

fn default_token_lifetime() -> u64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

/// `GET /gestalt`: the device's self-description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gestalt {
    pub uuid: String,
    pub mac: String,
    pub product_code: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub device_name: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
    #[serde(default)]
    pub number_of_led: Option<u32>,
}

/// `GET /fw/version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    pub version: String,
}

/// LED operating mode reported by `GET /led/mode`.
///
/// Anything other than [`Off`](Self::Off) means the lights are on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedMode {
    Off,
    Color,
    Demo,
    Effect,
    Movie,
    Playlist,
    Rt,
    #[serde(other)]
    Unknown,
}

impl LedMode {
    pub fn is_on(self) -> bool {
        !matches!(self, Self::Off)
    }

    /// The mode to request for a power state. "On" resumes the stored movie.
    pub fn for_power(on: bool) -> Self {
        if on { Self::Movie } else { Self::Off }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ModeResponse {
    pub mode: LedMode,
}

#[derive(Debug, Serialize)]
pub(crate) struct ModeRequest {
    pub mode: LedMode,
}

/// `GET /led/out/brightness` response. `value` is on the native 0–100 scale.
#[derive(Debug, Deserialize)]
pub(crate) struct BrightnessResponse {
    pub value: u8,
}

/// `POST /led/out/brightness` body. Type `"A"` sets an absolute value.
#[derive(Debug, Serialize)]
pub(crate) struct BrightnessRequest {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub value: u8,
}

impl BrightnessRequest {
    pub fn absolute(value: u8) -> Self {
        Self {
            kind: "A",
            mode: "enabled",
            value,
        }
    }
}
