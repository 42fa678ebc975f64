use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// The feed identity matches no registered payload shape.
    #[error("adapter does not support feed '{0}'")]
    UnsupportedFeed(String),

    /// A single payload lacks required fields or carries non-numeric values.
    #[error("malformed payload from '{feed}': {reason}")]
    MalformedPayload { feed: String, reason: String },

    #[error("invalid tracker config: {0}")]
    InvalidConfig(String),
}

impl TrackerError {
    pub(crate) fn malformed(feed: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            feed: feed.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the tracker can keep polling after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MalformedPayload { .. })
    }
}
