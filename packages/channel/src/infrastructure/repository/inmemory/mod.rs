//! InMemory 実装

mod history;
mod membership;

pub use history::RingHistory;
pub use membership::InMemoryMembershipSet;
