//! Storage abstractions the channel depends on.
//!
//! The usecase layer depends on these traits; concrete implementations live
//! in the infrastructure layer.

use async_trait::async_trait;

use super::{
    entity::Message,
    error::MembershipError,
    member::MemberRef,
    value_object::MemberId,
};

/// Concurrent collection of the members currently in a channel.
///
/// Implementations provide their own synchronization. `each` must visit a
/// consistent snapshot and must not hold internal locks while the visitor
/// runs, so a visitor may call back into the set.
#[async_trait]
pub trait MembershipSet: Send + Sync {
    /// Insert a member
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::Duplicate` if a member with the same id is present
    async fn add(&self, member: MemberRef) -> Result<(), MembershipError>;

    /// Remove the member with `id`
    ///
    /// # Errors
    ///
    /// Returns `MembershipError::NotFound` if no such member is present
    async fn remove(&self, id: MemberId) -> Result<(), MembershipError>;

    /// Visit every member of a snapshot. Visiting order is unspecified.
    async fn each(&self, visit: &mut (dyn for<'m> FnMut(&'m MemberRef) + Send));

    /// Remove every member
    async fn clear(&self);

    /// Number of members
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Members whose display name starts with `prefix`
    async fn list_by_prefix(&self, prefix: &str) -> Vec<MemberRef>;
}

/// Bounded, append-only log of the most recent messages.
#[async_trait]
pub trait History: Send + Sync {
    /// Append a message, evicting the oldest entry once capacity is exceeded
    async fn append(&self, message: Message);

    /// Recent messages, oldest first
    async fn recent(&self) -> Vec<Message>;

    /// Maximum number of retained messages
    fn capacity(&self) -> usize;
}
