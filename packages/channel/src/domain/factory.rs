//! Domain factories for creating value objects.

use super::MemberId;

/// Factory for generating MemberId instances.
///
/// This factory encapsulates the logic for generating new member identifiers,
/// separating the generation concern from the MemberId value itself.
pub struct MemberIdFactory;

impl MemberIdFactory {
    /// Generate a new MemberId with a random UUID v4.
    pub fn generate() -> MemberId {
        MemberId::from_uuid(uuid::Uuid::new_v4())
    }
}
