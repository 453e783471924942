use thiserror::Error;

/// Errors that can occur on the event channel.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Channel connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Publish failed: {0}")]
    PublishFailed(String),
    #[error("Subscribe failed: {0}")]
    SubscribeFailed(String),
    /// A handler declined the delivery; the message stays unacknowledged.
    #[error("Handler failed: {0}")]
    HandlerFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
