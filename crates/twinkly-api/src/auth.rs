// Login handshake
//
// The device issues a token in exchange for a random challenge
// (`POST /login`), then expects the challenge response echoed back with
// that token (`POST /verify`) before the token is accepted elsewhere.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::client::TwinklyClient;
use crate::error::Error;
use crate::models::{Ack, LoginResponse};

/// Session token issued by the device. Redacted in `Debug` output.
#[derive(Debug, Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

/// 32 random bytes, base64-encoded, sent with `POST /login`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge(String);

impl Challenge {
    pub fn random() -> Self {
        let bytes: [u8; 32] = rand::random();
        Self(STANDARD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Outcome of `POST /login`: a token that still needs [`verify`](TwinklyClient::verify).
#[derive(Debug, Clone)]
pub struct LoginGrant {
    pub token: AuthToken,
    pub challenge_response: String,
    pub expires_in: Duration,
}

impl TwinklyClient {
    /// Request a new token.
    ///
    /// `POST /xled/v1/login` with `{"challenge": ...}`. A non-success code
    /// is reported as [`Error::Authentication`].
    pub async fn login(&self) -> Result<LoginGrant, Error> {
        let challenge = Challenge::random();
        debug!("requesting login token");

        let resp: LoginResponse = self
            .post("login", None, &json!({ "challenge": challenge.as_str() }))
            .await
            .map_err(into_auth_error)?;

        Ok(LoginGrant {
            token: AuthToken::new(resp.authentication_token),
            challenge_response: resp.challenge_response,
            expires_in: Duration::from_secs(resp.authentication_token_expires_in),
        })
    }

    /// Confirm a freshly issued token.
    ///
    /// `POST /xled/v1/verify` with `{"challenge-response": ...}`.
    pub async fn verify(&self, token: &AuthToken, challenge_response: &str) -> Result<(), Error> {
        debug!("verifying login token");
        let _: Ack = self
            .post(
                "verify",
                Some(token),
                &json!({ "challenge-response": challenge_response }),
            )
            .await
            .map_err(into_auth_error)?;
        Ok(())
    }

    /// Invalidate a token on the device.
    ///
    /// `POST /xled/v1/logout`
    pub async fn logout(&self, token: &AuthToken) -> Result<(), Error> {
        debug!("logging out");
        let _: Ack = self.post("logout", Some(token), &json!({})).await?;
        Ok(())
    }
}

/// During the handshake, a refused result code is a rejection, not a protocol fault.
fn into_auth_error(err: Error) -> Error {
    match err {
        Error::DeviceCode { endpoint, code } => Error::Authentication {
            message: format!("{endpoint} refused with code {code}"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_is_32_bytes_base64() {
        let challenge = Challenge::random();
        assert_eq!(challenge.as_str().len(), 44);
        assert_ne!(challenge, Challenge::random());
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AuthToken::new("very-secret");
        assert!(!format!("{token:?}").contains("very-secret"));
    }
}
