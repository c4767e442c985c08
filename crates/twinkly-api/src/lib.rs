//! Async client for the local HTTP API exposed by Twinkly LED controllers.
//!
//! Every device serves a small JSON API under `http://{host}/xled/v1/`.
//! Requests other than the login handshake carry an `X-Auth-Token` header,
//! and every response body carries a numeric `code` where `1000` means
//! success. [`TwinklyClient`] strips that envelope before callers see it.

pub mod auth;
pub mod client;
pub mod device;
pub mod error;
pub mod led;
pub mod models;
pub mod transport;

pub use auth::{AuthToken, Challenge, LoginGrant};
pub use client::TwinklyClient;
pub use error::Error;
pub use models::{FirmwareVersion, Gestalt, LedMode};
pub use transport::TransportConfig;
