//! UseCase 層
//!
//! チャンネルのブロードキャストエンジンを実装するレイヤー。
//! ドメイン層の trait（MembershipSet, History, Member）を操作します。

mod broadcaster;
pub mod channel;
pub mod error;

pub use channel::Channel;
pub use error::ChannelError;
