// Device metadata endpoints
//
// Identity and firmware details, read once when a device is set up.

use tracing::debug;

use crate::auth::AuthToken;
use crate::client::TwinklyClient;
use crate::error::Error;
use crate::models::{FirmwareVersion, Gestalt};

impl TwinklyClient {
    /// Device self-description (uuid, MAC, product code, LED count).
    ///
    /// `GET /xled/v1/gestalt`
    pub async fn gestalt(&self, token: &AuthToken) -> Result<Gestalt, Error> {
        debug!("fetching gestalt");
        self.get("gestalt", Some(token)).await
    }

    /// Running firmware version.
    ///
    /// `GET /xled/v1/fw/version`
    pub async fn firmware_version(&self, token: &AuthToken) -> Result<FirmwareVersion, Error> {
        debug!("fetching firmware version");
        self.get("fw/version", Some(token)).await
    }
}
