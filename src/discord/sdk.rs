//! Discord Rich Presence backend using discord-sdk

use std::time::Duration;

use discord_sdk::{
    activity::{self as discord_activity, ActivityBuilder, Assets, Button},
    wheel::{UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::runtime::{Handle, Runtime};
use tokio::sync::watch;

use crate::error::SdkError;
use crate::presence::{ActivityKind, ActivityRecord, ConnectionEvent, PresenceSdk};

/// Timeout for waiting for Discord handshake
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single activity request to be acknowledged by the client
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

type EventHandler = Box<dyn FnMut(&ConnectionEvent) + Send>;

/// A connected Discord IPC session
pub struct DiscordSession {
    discord: Discord,
    user: watch::Receiver<UserState>,
    closed: bool,
    _wheel: Wheel,
}

/// [`PresenceSdk`] backed by the local Discord client.
///
/// Owns the tokio runtime the IPC connection runs on, so none of its methods
/// may be called from inside another async runtime.
pub struct DiscordSdk {
    runtime: Runtime,
    event_handler: Option<EventHandler>,
}

impl DiscordSdk {
    pub fn new() -> Result<Self, std::io::Error> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("discord-ipc")
            .enable_all()
            .build()?;

        Ok(Self {
            runtime,
            event_handler: None,
        })
    }

    /// Register a handler for connection changes delivered by `run_callbacks`
    pub fn with_event_handler(
        mut self,
        handler: impl FnMut(&ConnectionEvent) + Send + 'static,
    ) -> Self {
        self.event_handler = Some(Box::new(handler));
        self
    }

    /// Handle to the runtime driving the IPC connection
    pub fn runtime_handle(&self) -> Handle {
        self.runtime.handle().clone()
    }

    fn dispatch(&mut self, event: ConnectionEvent) {
        tracing::debug!("Discord connection event: {:?}", event);
        if let Some(handler) = self.event_handler.as_mut() {
            handler(&event);
        }
    }
}

fn connection_event(state: &UserState) -> ConnectionEvent {
    match state {
        UserState::Connected(user) => ConnectionEvent::Connected {
            username: user.username.clone(),
        },
        UserState::Disconnected(err) => ConnectionEvent::Disconnected {
            reason: format!("{:?}", err),
        },
    }
}

fn discord_kind(kind: ActivityKind) -> discord_activity::ActivityKind {
    match kind {
        ActivityKind::Playing => discord_activity::ActivityKind::Playing,
        ActivityKind::Listening => discord_activity::ActivityKind::Listening,
        ActivityKind::Watching => discord_activity::ActivityKind::Watching,
        ActivityKind::Competing => discord_activity::ActivityKind::Competing,
    }
}

fn activity_builder(record: &ActivityRecord) -> ActivityBuilder {
    let mut builder = ActivityBuilder::new().kind(discord_kind(record.kind));

    if let Some(details) = &record.details {
        builder = builder.details(details.clone());
    }
    if let Some(state) = &record.state {
        builder = builder.state(state.clone());
    }
    if let Some(start) = record.start_timestamp {
        builder = builder.start_timestamp(start);
    }
    if let Some(end) = record.end_timestamp {
        builder = builder.end_timestamp(end);
    }

    if record.large_image.is_some() || record.small_image.is_some() {
        let mut assets = Assets::default();
        if let Some(image) = &record.large_image {
            assets = assets.large(image.key.clone(), image.text.clone());
        }
        if let Some(image) = &record.small_image {
            assets = assets.small(image.key.clone(), image.text.clone());
        }
        builder = builder.assets(assets);
    }

    for button in &record.buttons {
        builder = builder.button(Button {
            label: button.label.clone(),
            url: button.url.clone(),
        });
    }

    // SET_ACTIVITY has no application name field
    if let Some(name) = &record.application_name {
        tracing::debug!("Discord IPC ignores application name override {:?}", name);
    }

    builder
}

impl PresenceSdk for DiscordSdk {
    type Session = DiscordSession;

    fn name(&self) -> &'static str {
        "Discord"
    }

    fn create_session(&mut self, application_id: u64) -> Result<DiscordSession, SdkError> {
        let app_id = i64::try_from(application_id).map_err(|_| {
            SdkError::message(format!("Discord application id {} is out of range", application_id))
        })?;

        let (wheel, handler) = Wheel::new(Box::new(|err| {
            tracing::warn!("Discord error: {:?}", err);
        }));
        let mut user = wheel.user().0;

        let discord = {
            let _guard = self.runtime.enter();
            Discord::new(app_id, Subscriptions::ACTIVITY, Box::new(handler))
                .map_err(|e| SdkError::message(format!("Discord not available: {:?}", e)))?
        };

        tracing::info!("Discord connecting...");

        let handshake = self.runtime.block_on(async {
            let changed = tokio::time::timeout(HANDSHAKE_TIMEOUT, user.changed()).await;
            match changed {
                Ok(Ok(())) => match &*user.borrow_and_update() {
                    UserState::Connected(user) => Ok(user.username.clone()),
                    UserState::Disconnected(err) => {
                        Err(format!("Discord disconnected: {:?}", err))
                    }
                },
                Ok(Err(_)) => Err("Discord connection closed".to_string()),
                Err(_) => Err("Discord handshake timed out".to_string()),
            }
        });

        match handshake {
            Ok(username) => {
                tracing::info!("Discord Rich Presence connected as {}", username);
                self.dispatch(ConnectionEvent::Connected { username });
                Ok(DiscordSession {
                    discord,
                    user,
                    closed: false,
                    _wheel: wheel,
                })
            }
            Err(e) => {
                self.runtime.block_on(discord.disconnect());
                Err(SdkError::message(e))
            }
        }
    }

    fn destroy_session(&mut self, session: DiscordSession) {
        self.runtime.block_on(session.discord.disconnect());
        tracing::info!("Discord Rich Presence disconnected");
    }

    fn update_activity(
        &mut self,
        session: &mut DiscordSession,
        activity: &ActivityRecord,
    ) -> Result<(), SdkError> {
        let builder = activity_builder(activity);
        let discord = &session.discord;

        let result = self.runtime.block_on(async {
            tokio::time::timeout(REQUEST_TIMEOUT, discord.update_activity(builder)).await
        });

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SdkError::message(format!("{:?}", e))),
            Err(_) => Err(SdkError::message("Discord did not acknowledge the update")),
        }
    }

    fn clear_activity(&mut self, session: &mut DiscordSession) -> Result<(), SdkError> {
        let discord = &session.discord;

        let result = self.runtime.block_on(async {
            tokio::time::timeout(REQUEST_TIMEOUT, discord.clear_activity()).await
        });

        match result {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(SdkError::message(format!("{:?}", e))),
            Err(_) => Err(SdkError::message("Discord did not acknowledge the clear")),
        }
    }

    fn run_callbacks(&mut self, session: &mut DiscordSession) {
        if session.closed {
            return;
        }

        match session.user.has_changed() {
            Ok(true) => {
                let event = connection_event(&session.user.borrow_and_update());
                self.dispatch(event);
            }
            Ok(false) => {}
            Err(_) => {
                tracing::warn!("Discord connection handler closed");
                session.closed = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presence::Activity;
    use discord_sdk::activity::ActivityArgs;
    use serde_json::Value;

    fn sent_activity(activity: &Activity) -> Value {
        let record = ActivityRecord::try_from(activity).unwrap();
        let args = ActivityArgs::from(activity_builder(&record));
        serde_json::to_value(&args).unwrap()["activity"].clone()
    }

    #[test]
    fn test_kind_is_sent_as_type() {
        for (kind, code) in [
            (ActivityKind::Playing, 0),
            (ActivityKind::Listening, 2),
            (ActivityKind::Watching, 3),
            (ActivityKind::Competing, 5),
        ] {
            let sent = sent_activity(&Activity::builder().details("x").kind(kind).build());
            assert_eq!(sent["type"], code);
        }
    }

    #[test]
    fn test_zero_start_differs_from_unset_start() {
        let zero = sent_activity(&Activity::builder().details("x").start_timestamp(0).build());
        assert_eq!(zero["timestamps"]["start"], 0);
        assert!(zero["timestamps"].get("end").is_none());

        let unset = sent_activity(&Activity::builder().details("x").build());
        assert!(unset.get("timestamps").is_none());
    }

    #[test]
    fn test_assets_and_buttons() {
        let sent = sent_activity(
            &Activity::builder()
                .state("In Launcher")
                .large_image("logo", Some("My Game"))
                .small_image("rank", None)
                .button("Play", "https://example.com/play")
                .button("Watch", "https://example.com/watch")
                .build(),
        );

        assert_eq!(sent["state"], "In Launcher");
        assert_eq!(sent["assets"]["large_image"], "logo");
        assert_eq!(sent["assets"]["large_text"], "My Game");
        assert_eq!(sent["assets"]["small_image"], "rank");
        assert!(sent["assets"].get("small_text").is_none());
        assert_eq!(sent["buttons"][0]["label"], "Play");
        assert_eq!(sent["buttons"][1]["url"], "https://example.com/watch");
    }

    #[test]
    fn test_application_name_is_not_sent() {
        let sent = sent_activity(&Activity::builder().application_name("Override").build());
        assert!(sent.get("name").is_none());
        assert_eq!(sent["type"], 0);
    }
}
