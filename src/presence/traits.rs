use super::activity::ActivityRecord;
use crate::error::SdkError;

/// Connection state change reported while pumping callbacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The SDK finished its handshake as the given user
    Connected { username: String },
    /// The SDK lost its connection
    Disconnected { reason: String },
}

/// Boundary with an external presence SDK (Discord, a test double, etc.)
///
/// A session value is created by [`create_session`](Self::create_session) and
/// consumed by [`destroy_session`](Self::destroy_session).
pub trait PresenceSdk {
    /// Live session handle owned by the caller
    type Session;

    /// Returns the name of this SDK (for logging)
    fn name(&self) -> &'static str;

    fn create_session(&mut self, application_id: u64) -> Result<Self::Session, SdkError>;

    fn destroy_session(&mut self, session: Self::Session);

    /// Queue an activity update on the session
    fn update_activity(
        &mut self,
        session: &mut Self::Session,
        activity: &ActivityRecord,
    ) -> Result<(), SdkError>;

    /// Remove any published activity
    fn clear_activity(&mut self, session: &mut Self::Session) -> Result<(), SdkError>;

    /// Let the SDK process its queue and dispatch pending callbacks
    fn run_callbacks(&mut self, session: &mut Self::Session);
}
