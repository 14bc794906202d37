//! Domain layer for the channel.
//!
//! This module contains the message model, value objects, errors and the
//! abstractions (member, membership set, history) the channel is built on.
//! It is independent of any concrete storage or transport.

pub mod entity;
pub mod error;
pub mod factory;
pub mod member;
pub mod repository;
pub mod value_object;

pub use entity::{Author, Message};
pub use error::{DeliveryError, MembershipError, ValueObjectError};
pub use factory::MemberIdFactory;
pub use member::{Member, MemberRef};
pub use repository::{History, MembershipSet};
pub use value_object::{MemberId, MemberName, MessageBody, Timestamp};
