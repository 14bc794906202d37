//! Infrastructure 層
//!
//! ドメイン層の trait（MembershipSet, History, Member）の具体的な実装を提供します。

pub mod repository;
pub mod transport;

pub use repository::{InMemoryMembershipSet, RingHistory};
pub use transport::MpscMember;
