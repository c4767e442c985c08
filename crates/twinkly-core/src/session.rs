// ── Session lifecycle ──
//
// One SessionManager per device. It is the only owner of the device token:
// callers borrow the current `Session` to make authenticated calls and never
// hold on to the token themselves.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};
use twinkly_api::AuthToken;

use crate::error::CoreError;
use crate::transport::DeviceTransport;

/// An authenticated handle for one device.
#[derive(Debug, Clone)]
pub struct Session {
    endpoint: String,
    token: AuthToken,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl Session {
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn token(&self) -> &AuthToken {
        &self.token
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Owns the authentication lifecycle against one device endpoint.
pub struct SessionManager<T> {
    transport: Arc<T>,
    endpoint: String,
    session: Option<Session>,
}

impl<T: DeviceTransport> SessionManager<T> {
    pub fn new(transport: Arc<T>) -> Self {
        let endpoint = transport.host();
        Self {
            transport,
            endpoint,
            session: None,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Establish or refresh the session.
    ///
    /// Returns `Ok(true)` once the device has issued and verified a new
    /// token, `Ok(false)` if the device answered but refused, and
    /// [`CoreError::Connectivity`] if it could not be reached. Any existing
    /// token is discarded before the handshake starts, so after a failure
    /// there is no session at all.
    pub async fn authenticate(&mut self) -> Result<bool, CoreError> {
        self.session = None;

        let grant = match self.transport.login().await {
            Ok(grant) => grant,
            Err(err) if err.is_rejection() => {
                debug!(host = %self.endpoint, error = %err, "login refused");
                return Ok(false);
            }
            Err(err) => return Err(CoreError::from_api(&self.endpoint, err)),
        };

        match self
            .transport
            .verify(&grant.token, &grant.challenge_response)
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_rejection() => {
                debug!(host = %self.endpoint, error = %err, "token verification refused");
                return Ok(false);
            }
            Err(err) => return Err(CoreError::from_api(&self.endpoint, err)),
        }

        let issued_at = Utc::now();
        let lifetime = TimeDelta::from_std(grant.expires_in).unwrap_or(TimeDelta::MAX);
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        self.session = Some(Session {
            endpoint: self.endpoint.clone(),
            token: grant.token,
            issued_at,
            expires_at,
        });
        debug!(host = %self.endpoint, %expires_at, "session established");
        Ok(true)
    }

    /// The current session, if one exists and has not expired.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref().filter(|s| s.is_valid())
    }

    /// The current session, or [`CoreError::NotAuthenticated`].
    pub fn require_session(&self) -> Result<&Session, CoreError> {
        self.session().ok_or_else(|| CoreError::NotAuthenticated {
            host: self.endpoint.clone(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.session().is_some()
    }

    /// Drop the current session without telling the device.
    pub fn invalidate(&mut self) {
        if self.session.take().is_some() {
            debug!(host = %self.endpoint, "session invalidated");
        }
    }

    /// Log out and drop the session. Failure to reach the device is not an error here.
    pub async fn close(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if let Err(e) = self.transport.logout(session.token()).await {
            warn!(host = %self.endpoint, error = %e, "logout failed (non-fatal)");
        }
    }
}
