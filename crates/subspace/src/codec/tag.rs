//! Mapping between typed event fields and envelope tags.
//!
//! Decoding is a single pass over the tag list. Tags with fewer than two
//! elements and tags with unknown keys are skipped. When a key repeats, the
//! later tag wins. Tag order otherwise carries no meaning.

use crate::model::envelope::{EventKind, Tag};

/// Every tag key this crate reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKey {
    D,
    Sid,
    SubspaceName,
    Ops,
    Rules,
    ContentType,
    Parent,
    ProposalId,
    Vote,
    InviteePubkey,
    Contrib,
}

impl TagKey {
    pub const ALL: [TagKey; 11] = [
        TagKey::D,
        TagKey::Sid,
        TagKey::SubspaceName,
        TagKey::Ops,
        TagKey::Rules,
        TagKey::ContentType,
        TagKey::Parent,
        TagKey::ProposalId,
        TagKey::Vote,
        TagKey::InviteePubkey,
        TagKey::Contrib,
    ];

    /// Wire name of the key.
    pub fn as_str(self) -> &'static str {
        match self {
            TagKey::D => "d",
            TagKey::Sid => "sid",
            TagKey::SubspaceName => "subspace_name",
            TagKey::Ops => "ops",
            TagKey::Rules => "rules",
            TagKey::ContentType => "content_type",
            TagKey::Parent => "parent",
            TagKey::ProposalId => "proposal_id",
            TagKey::Vote => "vote",
            TagKey::InviteePubkey => "invitee_pubkey",
            TagKey::Contrib => "contrib",
        }
    }

    /// Looks up a key by wire name.
    pub fn from_wire(s: &str) -> Option<Self> {
        Some(match s {
            "d" => TagKey::D,
            "sid" => TagKey::Sid,
            "subspace_name" => TagKey::SubspaceName,
            "ops" => TagKey::Ops,
            "rules" => TagKey::Rules,
            "content_type" => TagKey::ContentType,
            "parent" => TagKey::Parent,
            "proposal_id" => TagKey::ProposalId,
            "vote" => TagKey::Vote,
            "invitee_pubkey" => TagKey::InviteePubkey,
            "contrib" => TagKey::Contrib,
            _ => return None,
        })
    }

    /// Builds a `[key, value]` tag.
    pub fn tag(self, value: impl Into<String>) -> Tag {
        Tag::pair(self.as_str(), value)
    }
}

/// Tags an event of `kind` must carry.
pub fn required_keys(kind: EventKind) -> &'static [TagKey] {
    match kind {
        EventKind::Create => &[TagKey::D, TagKey::Sid, TagKey::SubspaceName, TagKey::Ops],
        EventKind::Join => &[TagKey::D, TagKey::Sid],
        EventKind::Op => &[TagKey::D, TagKey::Sid, TagKey::Ops],
    }
}

/// Recognized `(key, first value)` pairs in tag order.
pub fn entries(tags: &[Tag]) -> impl Iterator<Item = (TagKey, &str)> {
    tags.iter().filter_map(|tag| {
        if tag.len() < 2 {
            return None;
        }
        let key = TagKey::from_wire(tag.key()?)?;
        Some((key, tag.value()?))
    })
}

/// Whether any well-formed tag carries `key`.
pub fn has_key(tags: &[Tag], key: TagKey) -> bool {
    entries(tags).any(|(k, _)| k == key)
}

/// First required key of `kind` absent from `tags`.
pub fn first_missing_key(tags: &[Tag], kind: EventKind) -> Option<TagKey> {
    required_keys(kind)
        .iter()
        .copied()
        .find(|&key| !has_key(tags, key))
}

// =============================================================================
// DECODING
// =============================================================================

/// Tag fields of a create event. Absent keys decode to empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CreateTags {
    pub subspace_id: String,
    pub name: String,
    pub ops: String,
    pub rules: String,
}

/// Tag fields of a join event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JoinTags {
    pub subspace_id: String,
}

/// Tag fields of an op event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpTags {
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

/// Reads the create fields. Missing tags decode to empty strings.
pub fn decode_create_tags(tags: &[Tag]) -> CreateTags {
    let mut out = CreateTags::default();
    for (key, value) in entries(tags) {
        match key {
            TagKey::Sid => out.subspace_id = value.to_string(),
            TagKey::SubspaceName => out.name = value.to_string(),
            TagKey::Ops => out.ops = value.to_string(),
            TagKey::Rules => out.rules = value.to_string(),
            TagKey::D
            | TagKey::ContentType
            | TagKey::Parent
            | TagKey::ProposalId
            | TagKey::Vote
            | TagKey::InviteePubkey
            | TagKey::Contrib => {}
        }
    }
    out
}

/// Reads the join fields.
pub fn decode_join_tags(tags: &[Tag]) -> JoinTags {
    let mut out = JoinTags::default();
    for (key, value) in entries(tags) {
        match key {
            TagKey::Sid => out.subspace_id = value.to_string(),
            TagKey::D
            | TagKey::SubspaceName
            | TagKey::Ops
            | TagKey::Rules
            | TagKey::ContentType
            | TagKey::Parent
            | TagKey::ProposalId
            | TagKey::Vote
            | TagKey::InviteePubkey
            | TagKey::Contrib => {}
        }
    }
    out
}

/// Reads the op fields. Optional tags stay `None` when absent.
pub fn decode_op_tags(tags: &[Tag]) -> OpTags {
    let mut out = OpTags::default();
    for (key, value) in entries(tags) {
        let value = value.to_string();
        match key {
            TagKey::Sid => out.subspace_id = value,
            TagKey::Ops => out.operation = value,
            TagKey::ContentType => out.content_type = Some(value),
            TagKey::Parent => out.parent = Some(value),
            TagKey::ProposalId => out.proposal_id = Some(value),
            TagKey::Vote => out.vote = Some(value),
            TagKey::InviteePubkey => out.invitee_pubkey = Some(value),
            TagKey::Contrib => out.contributions = Some(value),
            TagKey::Rules => out.rules = Some(value),
            TagKey::D | TagKey::SubspaceName => {}
        }
    }
    out
}

// =============================================================================
// ENCODING
// =============================================================================

/// Mandatory tags of a create event. `rules` is emitted only when non-empty.
pub fn encode_create_tags(subspace_id: &str, name: &str, ops: &str, rules: &str) -> Vec<Tag> {
    let mut tags = vec![
        TagKey::D.tag(EventKind::Create.d_tag()),
        TagKey::Sid.tag(subspace_id),
        TagKey::SubspaceName.tag(name),
        TagKey::Ops.tag(ops),
    ];
    if !rules.is_empty() {
        tags.push(TagKey::Rules.tag(rules));
    }
    tags
}

/// Mandatory tags of a join event.
pub fn encode_join_tags(subspace_id: &str) -> Vec<Tag> {
    vec![
        TagKey::D.tag(EventKind::Join.d_tag()),
        TagKey::Sid.tag(subspace_id),
    ]
}

/// Mandatory tags of an op event; the operation travels in `ops`.
pub fn encode_op_tags(subspace_id: &str, operation: &str) -> Vec<Tag> {
    vec![
        TagKey::D.tag(EventKind::Op.d_tag()),
        TagKey::Sid.tag(subspace_id),
        TagKey::Ops.tag(operation),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(parts: &[&str]) -> Tag {
        Tag(parts.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_key_names_roundtrip() {
        for key in TagKey::ALL {
            assert_eq!(TagKey::from_wire(key.as_str()), Some(key));
        }
        assert_eq!(TagKey::from_wire("unknown"), None);
    }

    #[test]
    fn test_decode_skips_short_and_unknown_tags() {
        let tags = vec![
            raw(&["sid"]),
            raw(&[]),
            raw(&["x-custom", "ignored"]),
            raw(&["sid", "0x1", "extra"]),
        ];
        let join = decode_join_tags(&tags);
        assert_eq!(join.subspace_id, "0x1");
        assert!(!has_key(&[raw(&["sid"])], TagKey::Sid));
    }

    #[test]
    fn test_decode_last_write_wins() {
        let tags = vec![
            TagKey::Ops.tag("vote"),
            TagKey::Vote.tag("no"),
            TagKey::Vote.tag("yes"),
        ];
        let op = decode_op_tags(&tags);
        assert_eq!(op.operation, "vote");
        assert_eq!(op.vote.as_deref(), Some("yes"));
    }

    #[test]
    fn test_decode_ignores_order() {
        let mut tags = encode_create_tags("0xabc", "name", "post=1", "r>1");
        let forward = decode_create_tags(&tags);
        tags.reverse();
        assert_eq!(decode_create_tags(&tags), forward);
        assert_eq!(forward.rules, "r>1");
    }

    #[test]
    fn test_create_omits_empty_rules() {
        let tags = encode_create_tags("0xabc", "name", "post=1", "");
        assert_eq!(tags.len(), 4);
        assert!(!has_key(&tags, TagKey::Rules));
        assert_eq!(decode_create_tags(&tags).rules, "");
    }

    #[test]
    fn test_first_missing_key() {
        let tags = encode_op_tags("0xabc", "post");
        assert_eq!(first_missing_key(&tags, EventKind::Op), None);
        assert_eq!(
            first_missing_key(&tags, EventKind::Create),
            Some(TagKey::SubspaceName)
        );
        assert_eq!(first_missing_key(&[], EventKind::Join), Some(TagKey::D));
    }
}
