//! Broadcast consumer of a channel.
//!
//! Exactly one broadcaster task runs per channel. It drains the bounded
//! queue in FIFO order and fully dispatches each message before taking the
//! next one, so every member observes the same global order.
//!
//! Fan-out order across members within one message is unspecified: it is
//! whatever order the membership set's `each` yields.

use std::{collections::VecDeque, panic::AssertUnwindSafe, sync::Arc};

use futures_util::FutureExt;
use tokio::{runtime::Handle, sync::mpsc, task::JoinHandle};

use crate::domain::{DeliveryError, History, MemberRef, MembershipSet, Message};

pub(crate) struct Broadcaster {
    members: Arc<dyn MembershipSet>,
    history: Arc<dyn History>,
}

impl Broadcaster {
    pub(crate) fn new(members: Arc<dyn MembershipSet>, history: Arc<dyn History>) -> Self {
        Self { members, history }
    }

    /// Start the consumer loop on `runtime`. It ends once every queue sender
    /// is gone and the queue is drained.
    pub(crate) fn spawn(
        self,
        runtime: &Handle,
        queue: mpsc::Receiver<Message>,
    ) -> JoinHandle<()> {
        runtime.spawn(self.run(queue))
    }

    async fn run(self, mut queue: mpsc::Receiver<Message>) {
        tracing::debug!("Broadcaster started");
        while let Some(message) = queue.recv().await {
            self.broadcast(message).await;
        }
        tracing::debug!("Broadcast queue sealed and drained, broadcaster stopped");
    }

    /// Dispatch one dequeued message.
    ///
    /// Members evicted during the fan-out are announced with a `"<name> left."`
    /// notice, dispatched inline before the next queued message. The
    /// broadcaster never enqueues into its own queue, which could block it
    /// forever on a full queue.
    pub(crate) async fn broadcast(&self, message: Message) {
        let mut pending = VecDeque::from([message]);
        while let Some(message) = pending.pop_front() {
            self.history.append(message.clone()).await;
            for evicted in self.fan_out(&message).await {
                pending.push_back(Message::system(format!("{} left.", evicted.name())));
            }
        }
    }

    /// Deliver `message` to every current member except its author.
    ///
    /// Returns the members evicted because their delivery failed.
    async fn fan_out(&self, message: &Message) -> Vec<MemberRef> {
        let mut recipients = Vec::new();
        self.members
            .each(&mut |member: &MemberRef| {
                if !message.is_from(member.id()) {
                    recipients.push(member.clone());
                }
            })
            .await;

        let mut evicted = Vec::new();
        for member in recipients {
            let result = AssertUnwindSafe(member.send(message))
                .catch_unwind()
                .await
                .unwrap_or_else(|_| Err(DeliveryError::Panicked));

            if let Err(e) = result
                && self.evict(&member, &e).await
            {
                evicted.push(member);
            }
        }
        evicted
    }

    /// Remove a member whose delivery failed and close its connection.
    ///
    /// Only the caller whose `remove` succeeds closes the member, so a member
    /// that leaves concurrently or is swept by `Channel::close` is closed once.
    async fn evict(&self, member: &MemberRef, cause: &DeliveryError) -> bool {
        match self.members.remove(member.id()).await {
            Ok(()) => {
                tracing::warn!(
                    "Delivery to '{}' failed ({}), evicting member {}",
                    member.name(),
                    cause,
                    member.id()
                );
                close_member(member).await;
                true
            }
            Err(_) => {
                tracing::debug!(
                    "Delivery to '{}' failed ({}) but it already left",
                    member.name(),
                    cause
                );
                false
            }
        }
    }
}

/// Close a member's connection. A panic in the transport is logged and
/// swallowed so the caller keeps running.
pub(crate) async fn close_member(member: &MemberRef) {
    if AssertUnwindSafe(member.close())
        .catch_unwind()
        .await
        .is_err()
    {
        tracing::warn!(
            "Closing the connection of '{}' panicked ({})",
            member.name(),
            member.id()
        );
    }
}
