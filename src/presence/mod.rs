mod activity;
mod session;
mod traits;

pub use activity::{
    Activity, ActivityBuilder, ActivityButton, ActivityImage, ActivityKind, ActivityRecord,
    MAX_BUTTONS,
};
pub use session::PresenceSession;
pub use traits::{ConnectionEvent, PresenceSdk};
