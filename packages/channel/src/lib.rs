//! Chat channel broadcast engine.
//!
//! A [`Channel`] is a group of members exchanging short text messages.
//! Producers enqueue into a bounded queue (blocking while it is full); one
//! broadcaster task per channel fans every message out, in enqueue order, to
//! all members except its author, and evicts members whose delivery fails.
//! The most recent messages are kept in a bounded history for newcomers.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod usecase;

// Re-export entry points
pub use config::{ChannelConfig, ConfigError};
pub use domain::{Member, MemberRef, Message};
pub use usecase::{Channel, ChannelError};
