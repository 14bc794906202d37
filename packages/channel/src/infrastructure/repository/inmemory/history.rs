//! InMemory History 実装
//!
//! 直近 N 件のメッセージを保持するリングバッファ。
//! 容量を超えた場合は最も古いメッセージから破棄します。

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{History, Message};

/// リングバッファによる History 実装
pub struct RingHistory {
    capacity: usize,
    messages: Mutex<VecDeque<Message>>,
}

impl RingHistory {
    /// 容量を指定して RingHistory を作成（容量 0 の場合は何も保持しない）
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            messages: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

#[async_trait]
impl History for RingHistory {
    async fn append(&self, message: Message) {
        if self.capacity == 0 {
            return;
        }
        let mut messages = self.messages.lock().await;
        while messages.len() >= self.capacity {
            messages.pop_front();
        }
        messages.push_back(message);
    }

    async fn recent(&self) -> Vec<Message> {
        let messages = self.messages.lock().await;
        messages.iter().cloned().collect()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}
