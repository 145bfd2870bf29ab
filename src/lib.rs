//! Session facade for publishing rich presence through a social-presence SDK.
//!
//! [`PresenceSession`] owns at most one live SDK session and exposes the four
//! host-facing operations: `initialize`, `update_presence`, `pump_callbacks`
//! and `shutdown`. SDK backends implement [`PresenceSdk`]; the Discord client
//! backend is available behind the `discord` feature.

#[cfg(feature = "discord")]
pub mod discord;
pub mod error;
pub mod logging;
pub mod presence;
pub mod settings;

pub use error::{PresenceError, SdkError};
pub use presence::{
    Activity, ActivityBuilder, ActivityButton, ActivityImage, ActivityKind, ActivityRecord,
    ConnectionEvent, PresenceSdk, PresenceSession,
};
