//! Member のトランスポート実装

mod mpsc;

pub use mpsc::MpscMember;
