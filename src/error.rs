use std::fmt;

/// Error reported by the underlying presence SDK, kept as the SDK produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkError {
    /// Native result code, when the SDK exposes one
    pub code: Option<i32>,
    pub message: String,
}

impl SdkError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    /// Error without a native result code (e.g. a transport failure)
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for SdkError {}

#[derive(Debug, thiserror::Error)]
pub enum PresenceError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Presence session is not initialized")]
    NotInitialized,

    #[error("Failed to initialize presence SDK: {0}")]
    SdkInitFailed(#[source] SdkError),

    #[error("Presence SDK rejected the update: {0}")]
    SdkUpdateFailed(#[source] SdkError),
}

impl From<PresenceError> for String {
    fn from(e: PresenceError) -> Self {
        e.to_string()
    }
}
