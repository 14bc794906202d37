//! UseCase 層のエラー定義

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced to callers of the channel
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// Join of a member (same identity) that is already joined
    #[error("'{name}' is already a member of this channel")]
    DuplicateMember { name: String },

    /// Leave of a member that is not joined
    #[error("'{name}' is not a member of this channel")]
    MemberNotFound { name: String },

    /// The channel has been closed
    #[error("channel is closed")]
    Closed,

    /// The channel was opened outside a tokio runtime
    #[error("no tokio runtime to run the broadcaster on")]
    NoRuntime,

    /// The channel could not be opened with the given configuration
    #[error("invalid channel configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}
