//! Lifecycle facade around a single presence SDK session

use super::activity::{Activity, ActivityRecord};
use super::traits::PresenceSdk;
use crate::error::PresenceError;

/// Owns at most one live SDK session and serializes access to it.
///
/// Every operation takes `&mut self`, so calls are serialized by the borrow
/// checker. Sharing a session between threads needs an external lock around
/// the whole facade; there is no internal mutex. `pump_callbacks` is expected
/// to run from the same context as the other calls, every 1-2 seconds.
///
/// Dropping the facade shuts the session down.
pub struct PresenceSession<S: PresenceSdk> {
    sdk: S,
    session: Option<S::Session>,
}

impl<S: PresenceSdk> PresenceSession<S> {
    pub fn new(sdk: S) -> Self {
        Self { sdk, session: None }
    }

    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn sdk_mut(&mut self) -> &mut S {
        &mut self.sdk
    }

    /// Create a session for the given application id.
    ///
    /// A session that is already live is released first. On failure the
    /// facade is left uninitialized.
    pub fn initialize(&mut self, application_id: &str) -> Result<(), PresenceError> {
        let id = parse_application_id(application_id)?;

        self.shutdown();

        tracing::debug!("Creating {} session for application {}", self.sdk.name(), id);
        let session = self.sdk.create_session(id).map_err(|e| {
            tracing::warn!("Failed to initialize {}: {}", self.sdk.name(), e);
            PresenceError::SdkInitFailed(e)
        })?;

        self.session = Some(session);
        tracing::info!("{} presence session initialized", self.sdk.name());
        Ok(())
    }

    /// Publish an activity on the live session
    pub fn update_presence(&mut self, activity: &Activity) -> Result<(), PresenceError> {
        let session = self.session.as_mut().ok_or(PresenceError::NotInitialized)?;
        let record = ActivityRecord::try_from(activity)?;

        tracing::debug!("Updating {} presence: {:?}", self.sdk.name(), record);
        self.sdk
            .update_activity(session, &record)
            .map_err(PresenceError::SdkUpdateFailed)
    }

    /// Remove the published activity from the live session
    pub fn clear_presence(&mut self) -> Result<(), PresenceError> {
        let session = self.session.as_mut().ok_or(PresenceError::NotInitialized)?;

        tracing::debug!("Clearing {} presence", self.sdk.name());
        self.sdk
            .clear_activity(session)
            .map_err(PresenceError::SdkUpdateFailed)
    }

    /// Dispatch pending SDK callbacks. No-op without a session.
    pub fn pump_callbacks(&mut self) {
        if let Some(session) = self.session.as_mut() {
            self.sdk.run_callbacks(session);
        }
    }

    /// Release the live session, if any. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!("Shutting down {} presence session", self.sdk.name());
            self.sdk.destroy_session(session);
        }
    }
}

impl<S: PresenceSdk> Drop for PresenceSession<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn parse_application_id(application_id: &str) -> Result<u64, PresenceError> {
    let digits = application_id.trim();
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PresenceError::InvalidArgument(format!(
            "application id {:?} must contain only digits",
            application_id
        )));
    }

    digits.parse::<u64>().map_err(|e| {
        PresenceError::InvalidArgument(format!(
            "application id {:?} is not a 64-bit unsigned integer: {}",
            application_id, e
        ))
    })
}
