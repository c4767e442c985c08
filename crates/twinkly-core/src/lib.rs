//! Session and state synchronization for Twinkly LED controllers.
//!
//! This crate sits between `twinkly-api` and a host that drives devices on a
//! timer (the `twinkly` CLI, or any other scheduler):
//!
//! - **[`SessionManager`]**: owns one device's token lifecycle. Every
//!   authentication drops the previous token first, so a stale token is never
//!   reused.
//!
//! - **[`DeviceStateSync`]**: reads and writes power and brightness through a
//!   live [`Session`], translating between the device's 0–100 brightness and
//!   the 0–255 scale hosts expect (see [`brightness`]).
//!
//! - **[`Device`]**: composes the two with a cached [`DeviceIdentity`], the
//!   last-known [`DeviceState`], and an availability flag. Connectivity loss is
//!   reported as [`SyncOutcome::Unavailable`] rather than as an error.
//!
//! - **[`DeviceHandle`]**: runs a `Device` inside its own task, serializing
//!   commands and periodic polls and publishing [`DeviceSnapshot`]s.
//!
//! The network is reached only through the [`DeviceTransport`] trait, which
//! [`twinkly_api::TwinklyClient`] implements.

pub mod brightness;
pub mod config;
pub mod device;
pub mod error;
pub mod handle;
pub mod model;
pub mod session;
pub mod sync;
pub mod transport;

#[cfg(test)]
mod test_support;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DeviceConfig, EntityKind};
pub use device::Device;
pub use error::{CoreError, UnavailableReason};
pub use handle::DeviceHandle;
pub use model::{
    DeviceIdentity, DeviceRegistryEntry, DeviceSnapshot, DeviceState, LifecycleState, SyncOutcome,
};
pub use session::{Session, SessionManager};
pub use sync::DeviceStateSync;
pub use transport::DeviceTransport;
pub use twinkly_api::TwinklyClient;
