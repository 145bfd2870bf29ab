//! Activity payloads published through a presence session

use serde::{Deserialize, Serialize};

use crate::error::PresenceError;

/// Maximum number of buttons a presence can show
pub const MAX_BUTTONS: usize = 2;

/// Kind of activity, using the SDK's numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActivityKind {
    #[default]
    Playing,
    Listening,
    Watching,
    Competing,
}

impl ActivityKind {
    pub fn code(self) -> i32 {
        match self {
            ActivityKind::Playing => 0,
            ActivityKind::Listening => 2,
            ActivityKind::Watching => 3,
            ActivityKind::Competing => 5,
        }
    }
}

impl TryFrom<i32> for ActivityKind {
    type Error = PresenceError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ActivityKind::Playing),
            2 => Ok(ActivityKind::Listening),
            3 => Ok(ActivityKind::Watching),
            5 => Ok(ActivityKind::Competing),
            other => Err(PresenceError::InvalidArgument(format!(
                "unknown activity type {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityButton {
    pub label: String,
    pub url: String,
}

/// An image asset with optional hover text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityImage {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Presence state as the host describes it.
///
/// `activity_type` is the raw code supplied by the host; it is only checked
/// against [`ActivityKind`] when the activity is published.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activity {
    /// Primary line, e.g. "In a match"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Secondary line, e.g. "Ranked - Solo Queue"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Unix epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_timestamp: Option<i64>,
    /// Unix epoch seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub large_image: Option<ActivityImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub small_image: Option<ActivityImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ActivityButton>,
    pub activity_type: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
}

impl Activity {
    pub fn builder() -> ActivityBuilder {
        ActivityBuilder::new()
    }
}

/// Fluent constructor for [`Activity`]
#[derive(Debug, Clone, Default)]
pub struct ActivityBuilder {
    activity: Activity,
}

impl ActivityBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.activity.details = Some(details.into());
        self
    }

    pub fn state(mut self, state: impl Into<String>) -> Self {
        self.activity.state = Some(state.into());
        self
    }

    pub fn start_timestamp(mut self, timestamp: i64) -> Self {
        self.activity.start_timestamp = Some(timestamp);
        self
    }

    /// Start the elapsed-time counter at the current time
    pub fn start_timestamp_now(self) -> Self {
        self.start_timestamp(chrono::Utc::now().timestamp())
    }

    pub fn end_timestamp(mut self, timestamp: i64) -> Self {
        self.activity.end_timestamp = Some(timestamp);
        self
    }

    pub fn large_image(mut self, key: impl Into<String>, text: Option<&str>) -> Self {
        self.activity.large_image = Some(ActivityImage {
            key: key.into(),
            text: text.map(str::to_string),
        });
        self
    }

    pub fn small_image(mut self, key: impl Into<String>, text: Option<&str>) -> Self {
        self.activity.small_image = Some(ActivityImage {
            key: key.into(),
            text: text.map(str::to_string),
        });
        self
    }

    pub fn button(mut self, label: impl Into<String>, url: impl Into<String>) -> Self {
        self.activity.buttons.push(ActivityButton {
            label: label.into(),
            url: url.into(),
        });
        self
    }

    pub fn kind(mut self, kind: ActivityKind) -> Self {
        self.activity.activity_type = kind.code();
        self
    }

    /// Set a raw activity type code without checking it
    pub fn activity_type(mut self, code: i32) -> Self {
        self.activity.activity_type = code;
        self
    }

    pub fn application_name(mut self, name: impl Into<String>) -> Self {
        self.activity.application_name = Some(name.into());
        self
    }

    pub fn build(self) -> Activity {
        self.activity
    }
}

/// Validated activity in the shape handed to the SDK
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub details: Option<String>,
    pub state: Option<String>,
    pub start_timestamp: Option<i64>,
    pub end_timestamp: Option<i64>,
    pub large_image: Option<ActivityImage>,
    pub small_image: Option<ActivityImage>,
    pub buttons: Vec<ActivityButton>,
    pub kind: ActivityKind,
    pub application_name: Option<String>,
}

impl TryFrom<&Activity> for ActivityRecord {
    type Error = PresenceError;

    fn try_from(activity: &Activity) -> Result<Self, Self::Error> {
        let kind = ActivityKind::try_from(activity.activity_type)?;

        if activity.buttons.len() > MAX_BUTTONS {
            return Err(PresenceError::InvalidArgument(format!(
                "at most {} buttons are allowed, got {}",
                MAX_BUTTONS,
                activity.buttons.len()
            )));
        }

        Ok(Self {
            details: activity.details.clone(),
            state: activity.state.clone(),
            start_timestamp: activity.start_timestamp,
            end_timestamp: activity.end_timestamp,
            large_image: activity.large_image.clone(),
            small_image: activity.small_image.clone(),
            buttons: activity.buttons.clone(),
            kind,
            application_name: activity.application_name.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_kind_codes() {
        for kind in [
            ActivityKind::Playing,
            ActivityKind::Listening,
            ActivityKind::Watching,
            ActivityKind::Competing,
        ] {
            assert_eq!(ActivityKind::try_from(kind.code()).unwrap(), kind);
        }

        for code in [1, 4, 6, 99, -1] {
            assert!(matches!(
                ActivityKind::try_from(code),
                Err(PresenceError::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_builder() {
        let activity = Activity::builder()
            .details("In a match")
            .state("Ranked - Solo Queue")
            .start_timestamp(1_700_000_000)
            .large_image("logo", Some("My Game"))
            .small_image("rank", None)
            .button("Join", "https://example.com/join")
            .kind(ActivityKind::Competing)
            .build();

        assert_eq!(activity.details.as_deref(), Some("In a match"));
        assert_eq!(activity.start_timestamp, Some(1_700_000_000));
        assert_eq!(activity.end_timestamp, None);
        assert_eq!(activity.small_image.unwrap().text, None);
        assert_eq!(activity.buttons.len(), 1);
        assert_eq!(activity.activity_type, 5);
    }

    #[test]
    fn test_start_timestamp_now() {
        let before = chrono::Utc::now().timestamp();
        let activity = Activity::builder().start_timestamp_now().build();
        let start = activity.start_timestamp.unwrap();
        assert!(start >= before && start <= before + 5);
    }

    #[test]
    fn test_record_keeps_absent_fields_absent() {
        let zero = Activity::builder().start_timestamp(0).build();
        let unset = Activity::default();

        let zero = ActivityRecord::try_from(&zero).unwrap();
        let unset = ActivityRecord::try_from(&unset).unwrap();

        assert_eq!(zero.start_timestamp, Some(0));
        assert_eq!(unset.start_timestamp, None);
        assert_ne!(zero, unset);
    }

    #[test]
    fn test_record_rejects_too_many_buttons() {
        let activity = Activity::builder()
            .button("One", "https://example.com/1")
            .button("Two", "https://example.com/2")
            .button("Three", "https://example.com/3")
            .build();

        assert!(matches!(
            ActivityRecord::try_from(&activity),
            Err(PresenceError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_activity_from_json() {
        let activity: Activity = serde_json::from_str(
            r#"{
                "details": "Browsing",
                "start_timestamp": 0,
                "large_image": { "key": "logo" },
                "activity_type": 3
            }"#,
        )
        .unwrap();

        assert_eq!(activity.start_timestamp, Some(0));
        assert_eq!(activity.end_timestamp, None);
        assert_eq!(activity.large_image.unwrap().text, None);
        assert_eq!(activity.activity_type, 3);
    }
}
