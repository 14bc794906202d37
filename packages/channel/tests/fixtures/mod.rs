//! Shared helpers for channel integration tests.

#![allow(dead_code)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use hiroba_channel::{
    Member, Message,
    domain::{DeliveryError, MemberId, MemberIdFactory, MemberName},
    infrastructure::MpscMember,
};
use mockall::mock;
use tokio::sync::{Semaphore, mpsc};

/// How long a test waits for a delivery before failing
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

mock! {
    pub Peer {}

    #[async_trait]
    impl Member for Peer {
        fn id(&self) -> MemberId;
        fn name(&self) -> MemberName;
        async fn send(&self, message: &Message) -> Result<(), DeliveryError>;
        async fn close(&self);
    }
}

/// Connect a member backed by an mpsc channel with room for 256 messages.
pub fn connect(name: &str) -> (Arc<MpscMember>, mpsc::Receiver<Message>) {
    MpscMember::with_name(name, 256).expect("valid member name")
}

/// A mock peer with a fixed identity. Expectations on `send` and `close`
/// are left to the test.
pub fn mock_peer(name: &str) -> MockPeer {
    let mut peer = MockPeer::new();
    peer.expect_id().return_const(MemberIdFactory::generate());
    peer.expect_name()
        .return_const(MemberName::new(name.to_string()).expect("valid member name"));
    peer
}

/// Wait for the next message body delivered to `receiver`.
pub async fn next_body(receiver: &mut mpsc::Receiver<Message>) -> String {
    tokio::time::timeout(RECV_TIMEOUT, receiver.recv())
        .await
        .expect("timed out waiting for a message")
        .expect("connection closed while waiting for a message")
        .body()
        .to_string()
}

/// Collect every message left in `receiver` until its member is closed.
pub async fn drain(receiver: &mut mpsc::Receiver<Message>) -> Vec<Message> {
    let mut messages = Vec::new();
    loop {
        let next = tokio::time::timeout(RECV_TIMEOUT, receiver.recv())
            .await
            .expect("timed out draining; was the member closed?");
        match next {
            Some(message) => messages.push(message),
            None => return messages,
        }
    }
}

pub fn bodies(messages: &[Message]) -> Vec<String> {
    messages.iter().map(|m| m.body().to_string()).collect()
}

/// A member whose deliveries wait for a permit, used to stall the
/// broadcaster on purpose.
pub struct GatedMember {
    id: MemberId,
    gate: Arc<Semaphore>,
    delivered: AtomicUsize,
}

impl GatedMember {
    pub fn new() -> (Arc<Self>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let member = Arc::new(Self {
            id: MemberIdFactory::generate(),
            gate: gate.clone(),
            delivered: AtomicUsize::new(0),
        });
        (member, gate)
    }

    pub fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Member for GatedMember {
    fn id(&self) -> MemberId {
        self.id
    }

    fn name(&self) -> MemberName {
        MemberName::new("gated".to_string()).expect("valid member name")
    }

    async fn send(&self, _message: &Message) -> Result<(), DeliveryError> {
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|_| DeliveryError::Closed)?;
        permit.forget();
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn close(&self) {
        self.gate.close();
    }
}

/// A member whose deliveries always fail and whose `close` panics.
pub struct BrittleMember {
    id: MemberId,
    name: MemberName,
    close_calls: AtomicUsize,
}

impl BrittleMember {
    pub fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            id: MemberIdFactory::generate(),
            name: MemberName::new(name.to_string()).expect("valid member name"),
            close_calls: AtomicUsize::new(0),
        })
    }

    pub fn close_calls(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Member for BrittleMember {
    fn id(&self) -> MemberId {
        self.id
    }

    fn name(&self) -> MemberName {
        self.name.clone()
    }

    async fn send(&self, _message: &Message) -> Result<(), DeliveryError> {
        Err(DeliveryError::Disconnected)
    }

    async fn close(&self) {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        panic!("transport failed to close");
    }
}
