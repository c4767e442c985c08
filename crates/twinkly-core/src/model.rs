// ── Device domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use twinkly_api::{FirmwareVersion, Gestalt};

use crate::brightness;
use crate::config::EntityKind;
use crate::error::UnavailableReason;

/// Manufacturer reported for every device.
pub const MANUFACTURER: &str = "Ledworks";

/// Registry domain used for the device identifier.
pub const IDENTIFIER_DOMAIN: &str = "Twinkly";

/// Immutable identity, fetched once at setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Device uuid; the stable key a host registers the device under.
    pub unique_id: String,
    pub mac: String,
    /// Product code, e.g. `TWW210SPP`.
    pub model: String,
    pub firmware_version: String,
    pub device_name: Option<String>,
    pub led_count: Option<u32>,
}

impl DeviceIdentity {
    pub fn from_parts(gestalt: Gestalt, firmware: FirmwareVersion) -> Self {
        Self {
            unique_id: gestalt.uuid,
            mac: gestalt.mac,
            model: gestalt.product_code,
            firmware_version: firmware.version,
            device_name: gestalt.device_name,
            led_count: gestalt.number_of_led,
        }
    }
}

/// Power and brightness as last read from the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    pub power: bool,
    /// Native brightness (0–100). `None` for devices exposed as a switch.
    pub brightness: Option<u8>,
}

impl DeviceState {
    /// Brightness on the host scale (0–255), unrounded.
    pub fn brightness_external(&self) -> Option<f64> {
        self.brightness.map(brightness::to_external)
    }
}

/// Per-device lifecycle.
///
/// `Uninitialized → Unauthenticated → Authenticated ⇄ Unavailable`; there is
/// no terminal state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LifecycleState {
    /// Only exists before a `Device` is built; construction moves straight to
    /// `Unauthenticated`, so a live device never reports it.
    #[default]
    Uninitialized,
    Unauthenticated,
    Authenticated,
    Unavailable,
}

/// Result of a sync operation that may find the device unavailable.
///
/// Unavailability is an expected outcome, not an error: the caller keeps
/// showing the last-known state and tries again on the next poll.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome<T> {
    Ok(T),
    Unavailable(UnavailableReason),
}

impl<T> SyncOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Unavailable(_) => None,
        }
    }

    pub fn unavailable_reason(&self) -> Option<&UnavailableReason> {
        match self {
            Self::Ok(_) => None,
            Self::Unavailable(reason) => Some(reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SyncOutcome<U> {
        match self {
            Self::Ok(value) => SyncOutcome::Ok(f(value)),
            Self::Unavailable(reason) => SyncOutcome::Unavailable(reason),
        }
    }
}

/// What a host registers for an exposed device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRegistryEntry {
    /// `(domain, id)` pairs; always `("Twinkly", unique_id)`.
    pub identifiers: Vec<(String, String)>,
    /// `(connection type, value)` pairs; always `("mac", mac)`.
    pub connections: Vec<(String, String)>,
    pub name: String,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: String,
}

impl DeviceRegistryEntry {
    pub fn new(identity: &DeviceIdentity, name: &str) -> Self {
        Self {
            identifiers: vec![(IDENTIFIER_DOMAIN.to_owned(), identity.unique_id.clone())],
            connections: vec![("mac".to_owned(), identity.mac.clone())],
            name: name.to_owned(),
            manufacturer: MANUFACTURER.to_owned(),
            model: identity.model.clone(),
            sw_version: identity.firmware_version.clone(),
        }
    }
}

/// Point-in-time view of a device, published by [`DeviceHandle`](crate::DeviceHandle).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceSnapshot {
    pub name: String,
    pub host: String,
    pub kind: EntityKind,
    pub unique_id: Option<String>,
    pub lifecycle: LifecycleState,
    pub available: bool,
    /// Last-known state. Kept while unavailable, but stale.
    pub state: Option<DeviceState>,
    pub last_updated: Option<DateTime<Utc>>,
    pub unavailable_reason: Option<UnavailableReason>,
}

impl DeviceSnapshot {
    pub fn is_stale(&self) -> bool {
        !self.available && self.state.is_some()
    }
}
