//! Typed subspace events.
//!
//! Each typed event owns the envelope it was built from or parsed out of.
//! The envelope stays the source of truth for anything stored or sent; the
//! typed fields are a decoded view of its tags and content.

use crate::model::envelope::{Envelope, EventKind};
use crate::model::ops_spec::{OP_INVITE, OP_POST, OP_PROPOSE, OP_VOTE};

/// Creation of a subspace (kind 30100).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubspaceCreateEvent {
    pub envelope: Envelope,
    pub subspace_id: String,
    pub name: String,
    pub ops: String,
    pub rules: String,
    pub description: String,
    pub image_url: String,
}

/// An identity joining a subspace (kind 30200).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubspaceJoinEvent {
    pub envelope: Envelope,
    pub subspace_id: String,
}

/// One operation inside a subspace (kind 30300).
///
/// Which optional fields matter depends on `operation`; see
/// [`crate::validate::OpRegistry::basic`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubspaceOpEvent {
    pub envelope: Envelope,
    pub subspace_id: String,
    pub operation: String,
    pub content_type: Option<String>,
    pub parent: Option<String>,
    pub proposal_id: Option<String>,
    pub vote: Option<String>,
    pub invitee_pubkey: Option<String>,
    pub contributions: Option<String>,
    pub rules: Option<String>,
}

impl SubspaceOpEvent {
    /// Decoded vote, if the vote field holds a legal value.
    pub fn vote_value(&self) -> Option<VoteValue> {
        self.vote.as_deref().and_then(VoteValue::from_str)
    }
}

/// The operations every subspace understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicOperation {
    Post,
    Propose,
    Vote,
    Invite,
}

impl BasicOperation {
    /// All four, in vocabulary-code order.
    pub const ALL: [BasicOperation; 4] = [
        BasicOperation::Post,
        BasicOperation::Propose,
        BasicOperation::Vote,
        BasicOperation::Invite,
    ];

    /// Wire name of the operation.
    pub fn name(self) -> &'static str {
        match self {
            BasicOperation::Post => OP_POST,
            BasicOperation::Propose => OP_PROPOSE,
            BasicOperation::Vote => OP_VOTE,
            BasicOperation::Invite => OP_INVITE,
        }
    }
}

/// Legal vote values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoteValue {
    Yes,
    No,
}

impl VoteValue {
    /// Reads `yes` or `no`; anything else is not a vote.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(VoteValue::Yes),
            "no" => Some(VoteValue::No),
            _ => None,
        }
    }

    /// Wire form of the vote.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteValue::Yes => "yes",
            VoteValue::No => "no",
        }
    }
}

/// Any of the three typed subspace events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubspaceEvent {
    Create(SubspaceCreateEvent),
    Join(SubspaceJoinEvent),
    Op(SubspaceOpEvent),
}

impl SubspaceEvent {
    /// Reserved kind of the wrapped event.
    pub fn kind(&self) -> EventKind {
        match self {
            SubspaceEvent::Create(_) => EventKind::Create,
            SubspaceEvent::Join(_) => EventKind::Join,
            SubspaceEvent::Op(_) => EventKind::Op,
        }
    }

    /// The subspace the event belongs to.
    pub fn subspace_id(&self) -> &str {
        match self {
            SubspaceEvent::Create(e) => &e.subspace_id,
            SubspaceEvent::Join(e) => &e.subspace_id,
            SubspaceEvent::Op(e) => &e.subspace_id,
        }
    }

    /// The underlying envelope.
    pub fn envelope(&self) -> &Envelope {
        match self {
            SubspaceEvent::Create(e) => &e.envelope,
            SubspaceEvent::Join(e) => &e.envelope,
            SubspaceEvent::Op(e) => &e.envelope,
        }
    }

    /// Unwraps the envelope, dropping the decoded view.
    pub fn into_envelope(self) -> Envelope {
        match self {
            SubspaceEvent::Create(e) => e.envelope,
            SubspaceEvent::Join(e) => e.envelope,
            SubspaceEvent::Op(e) => e.envelope,
        }
    }
}

impl From<SubspaceCreateEvent> for SubspaceEvent {
    fn from(e: SubspaceCreateEvent) -> Self {
        SubspaceEvent::Create(e)
    }
}

impl From<SubspaceJoinEvent> for SubspaceEvent {
    fn from(e: SubspaceJoinEvent) -> Self {
        SubspaceEvent::Join(e)
    }
}

impl From<SubspaceOpEvent> for SubspaceEvent {
    fn from(e: SubspaceOpEvent) -> Self {
        SubspaceEvent::Op(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::builder::OpEventBuilder;

    #[test]
    fn test_vote_value() {
        let evt = OpEventBuilder::new("0x", OP_VOTE).vote("p1", "no").build();
        assert_eq!(evt.vote_value(), Some(VoteValue::No));
        assert_eq!(VoteValue::No.as_str(), "no");

        let evt = OpEventBuilder::new("0x", OP_VOTE).vote("p1", "YES").build();
        assert_eq!(evt.vote_value(), None);
        assert_eq!(OpEventBuilder::new("0x", OP_VOTE).build().vote_value(), None);
    }

    #[test]
    fn test_basic_operation_names() {
        let names: Vec<&str> = BasicOperation::ALL.iter().map(|op| op.name()).collect();
        assert_eq!(names, vec![OP_POST, OP_PROPOSE, OP_VOTE, OP_INVITE]);
    }
}
