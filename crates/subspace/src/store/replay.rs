//! Rebuilding the typed history of a subspace from stored envelopes.

use tracing::{debug, warn};

use crate::error::{StoreError, ValidationError};
use crate::model::event::{SubspaceCreateEvent, SubspaceEvent, SubspaceJoinEvent, SubspaceOpEvent};
use crate::parse::{parse_event_with, ParseOptions};
use crate::store::{EventStore, Filter};

/// An envelope the pipeline refused.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub id: String,
    pub error: ValidationError,
}

/// Accepted events of one subspace, oldest first (ties broken by id).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubspaceLog {
    /// The earliest valid create event for this ID.
    pub create: Option<SubspaceCreateEvent>,
    pub joins: Vec<SubspaceJoinEvent>,
    pub ops: Vec<SubspaceOpEvent>,
    pub rejected: Vec<Rejection>,
}

impl SubspaceLog {
    /// Distinct identities that joined, in join order.
    pub fn members(&self) -> Vec<&str> {
        let mut members: Vec<&str> = Vec::new();
        for join in &self.joins {
            let pubkey = join.envelope.pubkey.as_str();
            if !members.contains(&pubkey) {
                members.push(pubkey);
            }
        }
        members
    }

    /// Ops with the given operation name.
    pub fn ops_named<'a>(
        &'a self,
        operation: &'a str,
    ) -> impl Iterator<Item = &'a SubspaceOpEvent> {
        self.ops.iter().filter(move |op| op.operation == operation)
    }
}

/// Loads every envelope tagged with `subspace_id` and parses it.
///
/// Envelopes that fail to parse, or that decode to a different subspace ID
/// than the one requested, are recorded in `rejected` and contribute nothing
/// else to the log. When several valid creates exist (same defining
/// attributes, different author or time), the earliest is kept.
pub fn load_subspace<S>(
    store: &S,
    subspace_id: &str,
    options: &ParseOptions<'_>,
) -> Result<SubspaceLog, StoreError>
where
    S: EventStore + ?Sized,
{
    let mut envelopes = store.query(&Filter::for_subspace(subspace_id))?;
    envelopes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let mut log = SubspaceLog::default();
    for envelope in &envelopes {
        let event = parse_event_with(envelope, options).and_then(|event| {
            if event.subspace_id() == subspace_id {
                Ok(event)
            } else {
                Err(ValidationError::IdMismatch {
                    expected: subspace_id.to_string(),
                    found: event.subspace_id().to_string(),
                })
            }
        });

        match event {
            Ok(SubspaceEvent::Create(e)) => {
                if log.create.is_some() {
                    debug!(id = %envelope.id, "ignoring later create for subspace");
                } else {
                    log.create = Some(e);
                }
            }
            Ok(SubspaceEvent::Join(e)) => log.joins.push(e),
            Ok(SubspaceEvent::Op(e)) => log.ops.push(e),
            Err(error) => {
                warn!(
                    id = %envelope.id,
                    code = error.code().code(),
                    error = %error,
                    "skipping rejected subspace envelope"
                );
                log.rejected.push(Rejection {
                    id: envelope.id.clone(),
                    error,
                });
            }
        }
    }

    debug!(
        subspace = subspace_id,
        created = log.create.is_some(),
        joins = log.joins.len(),
        ops = log.ops.len(),
        rejected = log.rejected.len(),
        "loaded subspace"
    );
    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::builder::{CreateEventBuilder, JoinEventBuilder, OpEventBuilder};
    use crate::model::envelope::{Envelope, Tag};
    use crate::model::ops_spec::{OP_POST, OP_VOTE};
    use crate::store::MemoryStore;

    fn signed(mut envelope: Envelope, pubkey: &str) -> Envelope {
        envelope.pubkey = pubkey.to_string();
        envelope.assign_id();
        envelope
    }

    fn populated() -> (MemoryStore, String) {
        let create = CreateEventBuilder::new("modelgraph")
            .rules("energy>1000")
            .description("Desci AI Model collaboration subspace")
            .created_at(10)
            .build();
        let sid = create.subspace_id.clone();

        let mut store = MemoryStore::new();
        store.store(signed(create.envelope, "alice")).unwrap();
        for (ts, who) in [(20, "bob"), (21, "carol"), (22, "bob")] {
            let join = JoinEventBuilder::new(&sid).created_at(ts).build();
            store.store(signed(join.envelope, who)).unwrap();
        }
        let post = OpEventBuilder::new(&sid, OP_POST)
            .content_type("markdown")
            .content("# update")
            .created_at(31)
            .build();
        store.store(signed(post.envelope, "bob")).unwrap();
        let vote = OpEventBuilder::new(&sid, OP_VOTE)
            .vote("prop_001", "yes")
            .created_at(30)
            .build();
        store.store(signed(vote.envelope, "carol")).unwrap();
        (store, sid)
    }

    #[test]
    fn test_load_subspace() {
        let (store, sid) = populated();
        let log = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();

        assert_eq!(log.create.as_ref().map(|c| c.name.as_str()), Some("modelgraph"));
        assert_eq!(log.joins.len(), 3);
        assert_eq!(log.members(), vec!["bob", "carol"]);
        let ops: Vec<&str> = log.ops.iter().map(|o| o.operation.as_str()).collect();
        assert_eq!(ops, vec!["vote", "post"]);
        assert_eq!(log.ops_named(OP_VOTE).count(), 1);
        assert!(log.rejected.is_empty());
    }

    #[test]
    fn test_rejected_envelopes_are_isolated() {
        let (mut store, sid) = populated();
        let bad_vote = OpEventBuilder::new(&sid, OP_VOTE)
            .vote("prop_001", "maybe")
            .created_at(40)
            .build();
        let bad = signed(bad_vote.envelope, "dave");
        let bad_id = bad.id.clone();
        store.store(bad).unwrap();

        let log = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();
        assert_eq!(log.ops.len(), 2);
        assert_eq!(log.rejected.len(), 1);
        assert_eq!(log.rejected[0].id, bad_id);
        assert_eq!(log.rejected[0].error.code(), ErrorCode::InvalidVoteValue);
    }

    #[test]
    fn test_duplicate_delivery_is_harmless() {
        let (mut store, sid) = populated();
        let before = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();
        let again = store.query(&Filter::for_subspace(&sid)).unwrap();
        for envelope in again {
            assert!(!store.store(envelope).unwrap());
        }
        let after = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_conflicting_sid_tags_rejected() {
        let (mut store, sid) = populated();
        let other = JoinEventBuilder::new("0x".to_string() + &"f".repeat(64))
            .created_at(50)
            .build();
        let mut envelope = other.envelope;
        // Tagged with both IDs; the later tag decides the decoded ID.
        envelope.tags.insert(1, Tag::pair("sid", sid.clone()));
        store.store(signed(envelope, "eve")).unwrap();

        let log = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();
        assert_eq!(log.joins.len(), 3);
        assert_eq!(log.rejected.len(), 1);
        assert_eq!(log.rejected[0].error.code(), ErrorCode::IdMismatch);
    }

    #[test]
    fn test_unknown_subspace_is_empty() {
        let (store, _) = populated();
        let log = load_subspace(&store, "0xnothing", &ParseOptions::default()).unwrap();
        assert_eq!(log, SubspaceLog::default());
        assert!(log.create.is_none());
    }

    #[test]
    fn test_earliest_create_is_kept() {
        let (mut store, sid) = populated();
        let again = CreateEventBuilder::new("modelgraph")
            .rules("energy>1000")
            .description("Desci AI Model collaboration subspace")
            .created_at(15)
            .build();
        assert_eq!(again.subspace_id, sid);
        store.store(signed(again.envelope, "mallory")).unwrap();

        let log = load_subspace(&store, &sid, &ParseOptions::default()).unwrap();
        let create = log.create.as_ref().unwrap();
        assert_eq!(create.envelope.pubkey, "alice");
        assert_eq!(create.envelope.created_at, 10);
        assert!(log.rejected.is_empty());
    }
}
