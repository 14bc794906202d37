//! UseCase: チャンネル
//!
//! 参加（join）・退室（leave）・送信（send）・クローズ（close）を提供する
//! チャンネルのファサード。送信されたメッセージは有界キューに積まれ、
//! チャンネルごとに 1 つの Broadcaster タスクが順番に配信します。
//!
//! ## ライフサイクル
//!
//! `Open` → `Closed` の一方向のみ。キューの送信側を `RwLock<Option<_>>` に
//! 保持し、`close` は書き込みロックを取って `None` にすることでキューを封印します。
//! `join` は読み取りロックを保持したままメンバーを追加するため、
//! `close` より前に追加されたメンバーは必ず `close` で切断されます。

use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::{Mutex, RwLock, mpsc},
    task::JoinHandle,
};

use crate::{
    config::ChannelConfig,
    domain::{History, Member, MemberRef, MembershipSet, Message},
    infrastructure::{InMemoryMembershipSet, RingHistory},
};

use super::{
    broadcaster::{Broadcaster, close_member},
    error::ChannelError,
};

/// A chat channel: membership, bounded history and a broadcast queue.
///
/// Opening spawns the broadcaster task on the current tokio runtime.
pub struct Channel {
    topic: RwLock<String>,
    members: Arc<dyn MembershipSet>,
    history: Arc<dyn History>,
    /// Producer side of the broadcast queue, `None` once sealed
    queue: RwLock<Option<mpsc::Sender<Message>>>,
    broadcaster: Mutex<Option<JoinHandle<()>>>,
}

impl Channel {
    /// Open a channel with in-memory membership and history.
    ///
    /// # Errors
    ///
    /// * `ChannelError::InvalidConfig` - `queue_capacity` is 0
    /// * `ChannelError::NoRuntime` - called outside a tokio runtime
    pub fn open(history_capacity: usize, queue_capacity: usize) -> Result<Self, ChannelError> {
        Self::with_config(ChannelConfig::new(history_capacity, queue_capacity)?)
    }

    /// Open a channel from a configuration.
    ///
    /// # Errors
    ///
    /// * `ChannelError::InvalidConfig` - the configuration is invalid
    /// * `ChannelError::NoRuntime` - called outside a tokio runtime
    pub fn with_config(config: ChannelConfig) -> Result<Self, ChannelError> {
        Self::with_parts(
            config,
            Arc::new(InMemoryMembershipSet::new()),
            Arc::new(RingHistory::new(config.history_capacity)),
        )
    }

    /// Open a channel over caller-provided membership and history.
    ///
    /// `config.history_capacity` is not applied to an injected history.
    ///
    /// # Errors
    ///
    /// * `ChannelError::InvalidConfig` - the configuration is invalid
    /// * `ChannelError::NoRuntime` - called outside a tokio runtime
    pub fn with_parts(
        config: ChannelConfig,
        members: Arc<dyn MembershipSet>,
        history: Arc<dyn History>,
    ) -> Result<Self, ChannelError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| ChannelError::NoRuntime)?;

        let (sender, receiver) = mpsc::channel(config.queue_capacity);
        let handle = Broadcaster::new(members.clone(), history.clone()).spawn(&runtime, receiver);
        tracing::debug!(
            "Channel opened (queue capacity: {}, history capacity: {})",
            config.queue_capacity,
            history.capacity()
        );

        Ok(Self {
            topic: RwLock::new(String::new()),
            members,
            history,
            queue: RwLock::new(Some(sender)),
            broadcaster: Mutex::new(Some(handle)),
        })
    }

    /// Add a member and announce it to everyone, the newcomer included.
    ///
    /// # Errors
    ///
    /// * `ChannelError::DuplicateMember` - the same member is already joined, nothing is broadcast
    /// * `ChannelError::Closed` - the channel has been closed
    pub async fn join(&self, member: MemberRef) -> Result<(), ChannelError> {
        let name = member.name();
        let (queue, connected) = {
            let queue = self.queue.read().await;
            let Some(sender) = queue.as_ref() else {
                return Err(ChannelError::Closed);
            };
            self.members
                .add(member)
                .await
                .map_err(|_| ChannelError::DuplicateMember {
                    name: name.to_string(),
                })?;
            (sender.clone(), self.members.len().await)
        };

        tracing::info!("'{}' joined the channel ({} connected)", name, connected);
        Self::enqueue(
            &queue,
            Message::system(format!("{name} joined. (Connected: {connected})")),
        )
        .await
    }

    /// Remove a member and announce its departure to the rest.
    ///
    /// The member's connection is left open; closing it is up to the caller.
    ///
    /// # Errors
    ///
    /// * `ChannelError::MemberNotFound` - the member is not joined, nothing is broadcast
    /// * `ChannelError::Closed` - the channel has been closed
    pub async fn leave(&self, member: &dyn Member) -> Result<(), ChannelError> {
        let name = member.name();
        let queue = {
            let queue = self.queue.read().await;
            let Some(sender) = queue.as_ref() else {
                return Err(ChannelError::Closed);
            };
            self.members
                .remove(member.id())
                .await
                .map_err(|_| ChannelError::MemberNotFound {
                    name: name.to_string(),
                })?;
            sender.clone()
        };

        tracing::info!("'{}' left the channel", name);
        Self::enqueue(&queue, Message::system(format!("{name} left."))).await
    }

    /// Enqueue a message for broadcast.
    ///
    /// Waits while the queue is full. Delivery failures are handled by the
    /// broadcaster and never reported back here.
    ///
    /// # Panics
    ///
    /// Panics if the channel has been closed. Sending after `close` is a
    /// lifecycle bug in the caller.
    pub async fn send(&self, message: Message) {
        let queue = self.queue.read().await.clone();
        let Some(queue) = queue else {
            panic!("send on closed channel");
        };
        if queue.send(message).await.is_err() {
            panic!("send on closed channel: broadcaster has stopped");
        }
    }

    async fn enqueue(queue: &mpsc::Sender<Message>, message: Message) -> Result<(), ChannelError> {
        queue.send(message).await.map_err(|_| {
            tracing::error!("Broadcaster has stopped; notice dropped");
            ChannelError::Closed
        })
    }

    pub async fn topic(&self) -> String {
        self.topic.read().await.clone()
    }

    pub async fn set_topic(&self, topic: impl Into<String>) {
        *self.topic.write().await = topic.into();
    }

    /// Display names of members whose name starts with `prefix`, in no
    /// particular order. Used for input completion.
    pub async fn names_prefix(&self, prefix: &str) -> Vec<String> {
        self.members
            .list_by_prefix(prefix)
            .await
            .iter()
            .map(|member| member.name().into_string())
            .collect()
    }

    pub async fn member_count(&self) -> usize {
        self.members.len().await
    }

    /// Recently broadcast messages, oldest first, for replay to newcomers.
    pub async fn history(&self) -> Vec<Message> {
        self.history.recent().await
    }

    pub async fn is_closed(&self) -> bool {
        self.queue.read().await.is_none()
    }

    /// Close the channel.
    ///
    /// Seals the queue, disconnects every member and clears the membership.
    /// Messages already queued are still dispatched (to nobody, since the
    /// membership is empty) and recorded in history. Does not wait for the
    /// broadcaster; see [`Channel::wait_drained`]. Calling `close` again is
    /// a no-op.
    pub async fn close(&self) {
        let Some(queue) = self.queue.write().await.take() else {
            tracing::debug!("Channel already closed");
            return;
        };
        drop(queue);

        let mut members = Vec::new();
        self.members
            .each(&mut |member: &MemberRef| members.push(member.clone()))
            .await;

        let mut disconnected = 0;
        for member in members {
            // A failed remove means the broadcaster evicted it first and owns the close
            if self.members.remove(member.id()).await.is_ok() {
                close_member(&member).await;
                disconnected += 1;
            }
        }
        self.members.clear().await;

        tracing::info!("Channel closed ({} members disconnected)", disconnected);
    }

    /// Wait until the broadcaster has drained the queue and stopped.
    ///
    /// Only returns after [`Channel::close`] has been called. Subsequent
    /// calls return immediately.
    pub async fn wait_drained(&self) {
        let handle = self.broadcaster.lock().await.take();
        if let Some(handle) = handle
            && let Err(e) = handle.await
        {
            tracing::error!("Broadcaster task failed: {}", e);
        }
    }
}
