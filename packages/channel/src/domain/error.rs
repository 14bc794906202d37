//! Domain layer error definitions.

use thiserror::Error;

use super::value_object::MemberId;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// MemberName validation error
    #[error("MemberName cannot be empty")]
    MemberNameEmpty,

    /// MemberName too long error
    #[error("MemberName cannot exceed {max} characters (got {actual})")]
    MemberNameTooLong { max: usize, actual: usize },

    /// MessageBody validation error
    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    /// MessageBody too long error
    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },
}

/// Errors returned by a membership set
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MembershipError {
    /// The same member (by id) is already present
    #[error("member {id} is already in the set")]
    Duplicate { id: MemberId },

    /// The member is not present
    #[error("member {id} is not in the set")]
    NotFound { id: MemberId },
}

/// Errors returned by a member's transport when a delivery fails
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// The member's connection was already closed
    #[error("connection is closed")]
    Closed,

    /// The receiving side went away
    #[error("peer disconnected")]
    Disconnected,

    /// The transport did not accept the message in time
    #[error("delivery timed out after {millis}ms")]
    Timeout { millis: u64 },

    /// The transport panicked while delivering
    #[error("transport panicked during delivery")]
    Panicked,
}
