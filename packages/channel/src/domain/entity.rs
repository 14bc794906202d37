//! Core domain models for the channel.

use serde::{Deserialize, Serialize};

use super::{
    member::Member,
    value_object::{MemberId, MemberName, MessageBody, Timestamp},
};

/// Identity and display name of a message's sender
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Sender's member id, used for the skip-sender check
    pub id: MemberId,
    /// Sender's display name at the time the message was built
    pub name: MemberName,
}

/// A message broadcast through a channel.
///
/// Messages without an author are system notices and go to every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    from: Option<Author>,
    body: MessageBody,
    sent_at: Timestamp,
}

impl Message {
    /// Create a message authored by `from`
    pub fn new(from: Author, body: MessageBody, sent_at: Timestamp) -> Self {
        Self {
            from: Some(from),
            body,
            sent_at,
        }
    }

    /// Create a message authored by `member`, stamped with the current time
    pub fn from_member(member: &dyn Member, body: MessageBody) -> Self {
        let author = Author {
            id: member.id(),
            name: member.name(),
        };
        Self::new(author, body, Timestamp::now())
    }

    /// Create a system notice
    pub fn system(body: impl Into<String>) -> Self {
        Self {
            from: None,
            body: MessageBody::notice(body.into()),
            sent_at: Timestamp::now(),
        }
    }

    pub fn author(&self) -> Option<&Author> {
        self.from.as_ref()
    }

    pub fn body(&self) -> &MessageBody {
        &self.body
    }

    pub fn sent_at(&self) -> Timestamp {
        self.sent_at
    }

    pub fn is_system(&self) -> bool {
        self.from.is_none()
    }

    /// Whether the member with `id` authored this message
    pub fn is_from(&self, id: MemberId) -> bool {
        self.from.as_ref().is_some_and(|author| author.id == id)
    }

    /// Render for display: `"name: body"`, or `" * body"` for notices.
    pub fn format(&self) -> String {
        match &self.from {
            Some(author) => format!("{}: {}", author.name, self.body),
            None => format!(" * {}", self.body),
        }
    }
}
