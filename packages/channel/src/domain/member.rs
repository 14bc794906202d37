//! The member abstraction consumed by the channel.
//!
//! How a message physically reaches a member and how its connection is torn
//! down belong to the transport; the channel only calls this trait.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    entity::Message,
    error::DeliveryError,
    value_object::{MemberId, MemberName},
};

/// A connected member that can receive messages and be disconnected.
///
/// Identity is [`Member::id`]. Implementations should bound the time a
/// single `send` may take; the channel applies no timeout of its own.
#[async_trait]
pub trait Member: Send + Sync {
    /// Stable identity handle
    fn id(&self) -> MemberId;

    /// Display name
    fn name(&self) -> MemberName;

    /// Deliver one message
    async fn send(&self, message: &Message) -> Result<(), DeliveryError>;

    /// Close the member's connection
    async fn close(&self);
}

/// Shared handle to a member, as stored in a membership set.
pub type MemberRef = Arc<dyn Member>;
