//! Builder API for subspace events.
//!
//! Builders fill in the envelope kind, the creation time and the mandatory
//! tags, then hand back a typed event. They never sign or publish.
//!
//! # Example
//!
//! ```rust
//! use subspace::model::builder::{CreateEventBuilder, OpEventBuilder};
//! use subspace::model::ops_spec::OP_VOTE;
//!
//! let create = CreateEventBuilder::new("modelgraph")
//!     .rules("energy>1000")
//!     .description("AI model collaboration")
//!     .build();
//!
//! let vote = OpEventBuilder::new(&create.subspace_id, OP_VOTE)
//!     .vote("prop_001", "yes")
//!     .content("Agree")
//!     .build();
//!
//! assert_eq!(vote.proposal_id.as_deref(), Some("prop_001"));
//! ```

use crate::codec::{
    encode_create_content, encode_create_tags, encode_join_tags, encode_op_tags, TagKey,
};
use crate::model::envelope::{Envelope, EventKind};
use crate::model::event::{SubspaceCreateEvent, SubspaceJoinEvent, SubspaceOpEvent};
use crate::model::id::derive_subspace_id;
use crate::model::ops_spec::DEFAULT_SUBSPACE_OPS;

/// Builder for a subspace create event.
#[derive(Debug, Clone)]
pub struct CreateEventBuilder {
    name: String,
    ops: String,
    rules: String,
    description: String,
    image_url: String,
    pubkey: String,
    created_at: Option<u64>,
}

impl CreateEventBuilder {
    /// Starts a subspace named `name` with the default vocabulary.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ops: DEFAULT_SUBSPACE_OPS.to_string(),
            rules: String::new(),
            description: String::new(),
            image_url: String::new(),
            pubkey: String::new(),
            created_at: None,
        }
    }

    /// Sets the ops-spec (`name=code,...`).
    pub fn ops(mut self, ops: impl Into<String>) -> Self {
        self.ops = ops.into();
        self
    }

    /// Sets the policy expression.
    pub fn rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = rules.into();
        self
    }

    /// Sets the human-readable description (required to be non-empty).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the image URL.
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Sets the author identity ahead of signing.
    pub fn pubkey(mut self, pubkey: impl Into<String>) -> Self {
        self.pubkey = pubkey.into();
        self
    }

    /// Overrides the creation timestamp (seconds since Unix epoch).
    pub fn created_at(mut self, timestamp: u64) -> Self {
        self.created_at = Some(timestamp);
        self
    }

    /// Derives the subspace ID and builds the event.
    pub fn build(self) -> SubspaceCreateEvent {
        let subspace_id = derive_subspace_id(&self.name, &self.ops, &self.rules);

        let mut envelope = Envelope::new(EventKind::Create.as_u32());
        if let Some(ts) = self.created_at {
            envelope.created_at = ts;
        }
        envelope.pubkey = self.pubkey;
        envelope.tags = encode_create_tags(&subspace_id, &self.name, &self.ops, &self.rules);
        envelope.content = encode_create_content(&self.description, &self.image_url);

        SubspaceCreateEvent {
            envelope,
            subspace_id,
            name: self.name,
            ops: self.ops,
            rules: self.rules,
            description: self.description,
            image_url: self.image_url,
        }
    }
}

impl SubspaceCreateEvent {
    /// Builds a create event in one call.
    pub fn new(name: &str, ops: &str, rules: &str, description: &str, image_url: &str) -> Self {
        CreateEventBuilder::new(name)
            .ops(ops)
            .rules(rules)
            .description(description)
            .image_url(image_url)
            .build()
    }
}

/// Builder for a join event.
#[derive(Debug, Clone)]
pub struct JoinEventBuilder {
    event: SubspaceJoinEvent,
}

impl JoinEventBuilder {
    /// Joins the subspace `subspace_id`. The ID is taken as given.
    pub fn new(subspace_id: impl Into<String>) -> Self {
        let subspace_id = subspace_id.into();
        let mut envelope = Envelope::new(EventKind::Join.as_u32());
        envelope.tags = encode_join_tags(&subspace_id);
        Self {
            event: SubspaceJoinEvent {
                envelope,
                subspace_id,
            },
        }
    }

    /// Sets the joining identity ahead of signing.
    pub fn pubkey(mut self, pubkey: impl Into<String>) -> Self {
        self.event.envelope.pubkey = pubkey.into();
        self
    }

    /// Overrides the creation timestamp.
    pub fn created_at(mut self, timestamp: u64) -> Self {
        self.event.envelope.created_at = timestamp;
        self
    }

    /// Builds the event.
    pub fn build(self) -> SubspaceJoinEvent {
        self.event
    }
}

impl SubspaceJoinEvent {
    /// Builds a join event in one call.
    pub fn new(subspace_id: &str) -> Self {
        JoinEventBuilder::new(subspace_id).build()
    }
}

/// Builder for an operation event.
///
/// Each setter records the typed field and appends the matching tag.
/// Calling a setter twice appends a second tag; decoding keeps the last one.
#[derive(Debug, Clone)]
pub struct OpEventBuilder {
    event: SubspaceOpEvent,
}

impl OpEventBuilder {
    /// Starts an `operation` event in subspace `subspace_id`.
    pub fn new(subspace_id: impl Into<String>, operation: impl Into<String>) -> Self {
        let subspace_id = subspace_id.into();
        let operation = operation.into();
        let mut envelope = Envelope::new(EventKind::Op.as_u32());
        envelope.tags = encode_op_tags(&subspace_id, &operation);
        Self {
            event: SubspaceOpEvent {
                envelope,
                subspace_id,
                operation,
                content_type: None,
                parent: None,
                proposal_id: None,
                vote: None,
                invitee_pubkey: None,
                contributions: None,
                rules: None,
            },
        }
    }

    fn push(&mut self, key: TagKey, value: &str) {
        self.event.envelope.tags.push(key.tag(value));
    }

    /// Content type of a post (e.g. `markdown`).
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        let content_type = content_type.into();
        self.push(TagKey::ContentType, &content_type);
        self.event.content_type = Some(content_type);
        self
    }

    /// Reference to the parent event.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        let parent = parent.into();
        self.push(TagKey::Parent, &parent);
        self.event.parent = Some(parent);
        self
    }

    /// Proposal ID, plus the proposed rules when non-empty.
    pub fn proposal(mut self, proposal_id: impl Into<String>, rules: impl Into<String>) -> Self {
        let proposal_id = proposal_id.into();
        let rules = rules.into();
        self.push(TagKey::ProposalId, &proposal_id);
        self.event.proposal_id = Some(proposal_id);
        if !rules.is_empty() {
            self.push(TagKey::Rules, &rules);
            self.event.rules = Some(rules);
        }
        self
    }

    /// Vote `vote` on proposal `proposal_id`. The value is not checked here.
    pub fn vote(mut self, proposal_id: impl Into<String>, vote: impl Into<String>) -> Self {
        let proposal_id = proposal_id.into();
        let vote = vote.into();
        self.push(TagKey::ProposalId, &proposal_id);
        self.push(TagKey::Vote, &vote);
        self.event.proposal_id = Some(proposal_id);
        self.event.vote = Some(vote);
        self
    }

    /// Invitee identity, plus admission rules when non-empty.
    pub fn invite(mut self, invitee_pubkey: impl Into<String>, rules: impl Into<String>) -> Self {
        let invitee_pubkey = invitee_pubkey.into();
        let rules = rules.into();
        self.push(TagKey::InviteePubkey, &invitee_pubkey);
        self.event.invitee_pubkey = Some(invitee_pubkey);
        if !rules.is_empty() {
            self.push(TagKey::Rules, &rules);
            self.event.rules = Some(rules);
        }
        self
    }

    /// Contribution weights (`name:weight,...`).
    pub fn contributions(mut self, contributions: impl Into<String>) -> Self {
        let contributions = contributions.into();
        self.push(TagKey::Contrib, &contributions);
        self.event.contributions = Some(contributions);
        self
    }

    /// Free-form envelope content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.event.envelope.content = content.into();
        self
    }

    /// Sets the author identity ahead of signing.
    pub fn pubkey(mut self, pubkey: impl Into<String>) -> Self {
        self.event.envelope.pubkey = pubkey.into();
        self
    }

    /// Overrides the creation timestamp.
    pub fn created_at(mut self, timestamp: u64) -> Self {
        self.event.envelope.created_at = timestamp;
        self
    }

    /// Builds the event.
    pub fn build(self) -> SubspaceOpEvent {
        self.event
    }
}

impl SubspaceOpEvent {
    /// Builds a bare op event in one call; optional fields are left unset.
    pub fn new(subspace_id: &str, operation: &str) -> Self {
        OpEventBuilder::new(subspace_id, operation).build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{has_key, required_keys};
    use crate::model::envelope::{KIND_SUBSPACE_CREATE, KIND_SUBSPACE_JOIN, KIND_SUBSPACE_OP};

    fn create() -> SubspaceCreateEvent {
        SubspaceCreateEvent::new(
            "test-subspace",
            DEFAULT_SUBSPACE_OPS,
            "energy>1000",
            "Test Subspace",
            "https://example.com/image.png",
        )
    }

    #[test]
    fn test_create_event_shape() {
        let evt = create();
        assert_eq!(evt.envelope.kind, KIND_SUBSPACE_CREATE);
        for key in required_keys(EventKind::Create) {
            assert!(has_key(&evt.envelope.tags, *key), "missing {key:?}");
        }
        assert_eq!(
            evt.subspace_id,
            derive_subspace_id("test-subspace", DEFAULT_SUBSPACE_OPS, "energy>1000")
        );
        assert_eq!(evt.envelope.tag_value("rules"), Some("energy>1000"));
        assert_eq!(evt.envelope.tag_value("d"), Some("subspace_create"));
        assert!(evt.envelope.id.is_empty());
        assert!(evt.envelope.sig.is_empty());
        assert!(evt.envelope.created_at > 0);
    }

    #[test]
    fn test_builder_order_does_not_matter_for_id() {
        let a = CreateEventBuilder::new("n").rules("r").ops("post=1").build();
        let b = CreateEventBuilder::new("n").ops("post=1").rules("r").build();
        assert_eq!(a.subspace_id, b.subspace_id);
    }

    #[test]
    fn test_join_event_shape() {
        let evt = JoinEventBuilder::new(create().subspace_id)
            .pubkey("alice")
            .created_at(42)
            .build();
        assert_eq!(evt.envelope.kind, KIND_SUBSPACE_JOIN);
        assert_eq!(evt.envelope.created_at, 42);
        assert_eq!(evt.envelope.pubkey, "alice");
        assert_eq!(evt.envelope.tags.len(), 2);
    }

    #[test]
    fn test_op_setters_append_tags() {
        let evt = OpEventBuilder::new(create().subspace_id, "post")
            .content_type("markdown")
            .parent("parent-hash")
            .content("Test post content")
            .build();
        assert_eq!(evt.envelope.kind, KIND_SUBSPACE_OP);
        assert_eq!(evt.content_type.as_deref(), Some("markdown"));
        assert_eq!(evt.parent.as_deref(), Some("parent-hash"));
        assert_eq!(evt.envelope.tags.len(), 5);
        assert_eq!(evt.envelope.content, "Test post content");
    }

    #[test]
    fn test_repeated_setter_duplicates_tags() {
        let evt = OpEventBuilder::new("0x", "vote")
            .vote("p1", "yes")
            .vote("p1", "yes")
            .build();
        let votes = evt
            .envelope
            .tags
            .iter()
            .filter(|t| t.key() == Some("vote"))
            .count();
        assert_eq!(votes, 2);
        assert_eq!(evt.vote.as_deref(), Some("yes"));
    }

    #[test]
    fn test_proposal_rules_only_when_present() {
        let with = OpEventBuilder::new("0x", "propose")
            .proposal("prop_001", "energy>2000")
            .build();
        assert_eq!(with.rules.as_deref(), Some("energy>2000"));
        let without = OpEventBuilder::new("0x", "propose").proposal("prop_001", "").build();
        assert_eq!(without.rules, None);
        assert_eq!(without.envelope.tags.len(), 4);
    }
}
