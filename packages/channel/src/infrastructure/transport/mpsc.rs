//! tokio mpsc による Member 実装
//!
//! 各メンバーは有界の mpsc チャンネルを持ち、受信側（Receiver）は
//! 上位層（WebSocket や SSH セッションなど）が読み出して実際の接続に書き込みます。
//! `close` で送信側を破棄すると、受信側はバッファを読み切った後に `None` を受け取ります。

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::domain::{
    DeliveryError, Member, MemberId, MemberIdFactory, MemberName, Message, Timestamp,
    ValueObjectError,
};

/// mpsc チャンネルを送信路とするメンバー
pub struct MpscMember {
    id: MemberId,
    name: MemberName,
    /// 送信側（close 後は None）
    sender: Mutex<Option<mpsc::Sender<Message>>>,
    /// 1 回の送信で待機する上限（None の場合は無制限）
    send_timeout: Option<Duration>,
    connected_at: Timestamp,
}

impl MpscMember {
    /// 新しいメンバーと、その受信側を作成
    ///
    /// # Arguments
    ///
    /// * `name` - 表示名
    /// * `buffer` - 受信側に溜められるメッセージ数（0 は 1 として扱う）
    /// * `send_timeout` - 受信側が詰まっている場合に待機する上限
    pub fn new(
        name: MemberName,
        buffer: usize,
        send_timeout: Option<Duration>,
    ) -> (Arc<Self>, mpsc::Receiver<Message>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        let member = Self {
            id: MemberIdFactory::generate(),
            name,
            sender: Mutex::new(Some(sender)),
            send_timeout,
            connected_at: Timestamp::now(),
        };
        (Arc::new(member), receiver)
    }

    /// 文字列の表示名からタイムアウトなしのメンバーを作成
    pub fn with_name(
        name: &str,
        buffer: usize,
    ) -> Result<(Arc<Self>, mpsc::Receiver<Message>), ValueObjectError> {
        let name = MemberName::try_from(name)?;
        Ok(Self::new(name, buffer, None))
    }

    pub fn connected_at(&self) -> Timestamp {
        self.connected_at
    }

    /// close 済みかどうか
    pub async fn is_closed(&self) -> bool {
        self.sender.lock().await.is_none()
    }
}

#[async_trait]
impl Member for MpscMember {
    fn id(&self) -> MemberId {
        self.id
    }

    fn name(&self) -> MemberName {
        self.name.clone()
    }

    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        // ロックを保持したまま待機しないよう、送信側を複製してから送る
        let sender = self
            .sender
            .lock()
            .await
            .clone()
            .ok_or(DeliveryError::Closed)?;
        let delivery = sender.send(message.clone());

        match self.send_timeout {
            Some(limit) => match tokio::time::timeout(limit, delivery).await {
                Ok(result) => result.map_err(|_| DeliveryError::Disconnected),
                Err(_) => Err(DeliveryError::Timeout {
                    millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                }),
            },
            None => delivery.await.map_err(|_| DeliveryError::Disconnected),
        }
    }

    async fn close(&self) {
        if self.sender.lock().await.take().is_some() {
            tracing::debug!("Closed connection of '{}' ({})", self.name, self.id);
        }
    }
}
