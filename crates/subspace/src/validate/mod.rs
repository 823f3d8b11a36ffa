//! Validation of typed subspace events.
//!
//! Each check returns the first violated rule. Checks run in a fixed order:
//! kind, required tags, subspace ID shape, then the kind-specific rules.
//! Required tags are looked up in the envelope itself, while the remaining
//! rules read the decoded typed fields.

pub mod business;
pub mod registry;

pub use registry::{basic_registry, OpRegistry, OpValidator};

use crate::codec::{check_create_content, first_missing_key};
use crate::error::ValidationError;
use crate::model::envelope::{Envelope, EventKind};
use crate::model::event::{SubspaceCreateEvent, SubspaceJoinEvent, SubspaceOpEvent};
use crate::model::id::{check_subspace_id, SubspaceId};
use crate::model::ops_spec::OpsSpec;

/// Validates a create event.
///
/// Beyond the common checks, the declared ID must equal the one derived
/// from name, ops and rules, the content must carry a non-empty `desc`, and
/// the ops-spec must be well formed.
pub fn validate_create(event: &SubspaceCreateEvent) -> Result<(), ValidationError> {
    check_envelope(&event.envelope, EventKind::Create)?;
    check_subspace_id(&event.subspace_id)?;

    let expected = SubspaceId::derive(&event.name, &event.ops, &event.rules);
    if event.subspace_id != expected.as_str() {
        return Err(ValidationError::IdMismatch {
            expected: expected.into(),
            found: event.subspace_id.clone(),
        });
    }

    check_create_content(&event.envelope.content)?;
    OpsSpec::parse(&event.ops)?;
    Ok(())
}

/// Validates a join event.
pub fn validate_join(event: &SubspaceJoinEvent) -> Result<(), ValidationError> {
    check_envelope(&event.envelope, EventKind::Join)?;
    check_subspace_id(&event.subspace_id)
}

/// Validates an op event against the basic registry.
pub fn validate_op(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    validate_op_with(event, basic_registry())
}

/// Validates an op event, dispatching operation rules through `registry`.
pub fn validate_op_with(
    event: &SubspaceOpEvent,
    registry: &OpRegistry,
) -> Result<(), ValidationError> {
    check_envelope(&event.envelope, EventKind::Op)?;
    check_subspace_id(&event.subspace_id)?;
    registry.validate(event)
}

/// Rejects an op whose operation name the subspace does not declare.
///
/// Not part of [`validate_op`]; callers that hold the subspace's create
/// event can opt in.
pub fn check_vocabulary(event: &SubspaceOpEvent, ops: &OpsSpec) -> Result<(), ValidationError> {
    if ops.contains(&event.operation) {
        Ok(())
    } else {
        Err(ValidationError::OperationNotInVocabulary {
            operation: event.operation.clone(),
        })
    }
}

/// Kind and required-tag checks shared by all three event kinds.
fn check_envelope(envelope: &Envelope, kind: EventKind) -> Result<(), ValidationError> {
    if envelope.kind != kind.as_u32() {
        return Err(ValidationError::InvalidKind {
            expected: expected_kind(kind),
            found: envelope.kind,
        });
    }
    if let Some(missing) = first_missing_key(&envelope.tags, kind) {
        return Err(ValidationError::MissingRequiredField {
            kind: kind.name(),
            field: missing.as_str(),
        });
    }
    Ok(())
}

fn expected_kind(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Create => "30100",
        EventKind::Join => "30200",
        EventKind::Op => "30300",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::model::builder::{CreateEventBuilder, JoinEventBuilder, OpEventBuilder};
    use crate::model::envelope::Tag;
    use crate::model::ops_spec::{DEFAULT_SUBSPACE_OPS, OP_INVITE, OP_POST, OP_PROPOSE, OP_VOTE};

    fn create() -> SubspaceCreateEvent {
        CreateEventBuilder::new("test-subspace")
            .rules("energy>1000")
            .description("Test Subspace")
            .image_url("https://example.com/image.png")
            .build()
    }

    fn sid() -> String {
        create().subspace_id
    }

    #[test]
    fn test_valid_events_pass() {
        assert!(validate_create(&create()).is_ok());
        assert!(validate_join(&JoinEventBuilder::new(sid()).build()).is_ok());
        let post = OpEventBuilder::new(sid(), OP_POST)
            .content_type("markdown")
            .parent("parent-hash")
            .build();
        assert!(validate_op(&post).is_ok());
        let propose = OpEventBuilder::new(sid(), OP_PROPOSE)
            .proposal("prop_001", "energy>2000")
            .build();
        assert!(validate_op(&propose).is_ok());
        let invite = OpEventBuilder::new(sid(), OP_INVITE)
            .invite("charlie", "energy>1000")
            .build();
        assert!(validate_op(&invite).is_ok());
    }

    #[test]
    fn test_wrong_kind() {
        let mut evt = JoinEventBuilder::new(sid()).build();
        evt.envelope.kind = 1;
        assert_eq!(
            validate_join(&evt),
            Err(ValidationError::InvalidKind {
                expected: "30200",
                found: 1
            })
        );
    }

    #[test]
    fn test_kind_checked_before_tags() {
        let mut evt = OpEventBuilder::new(sid(), OP_POST).build();
        evt.envelope.kind = 30100;
        evt.envelope.tags.clear();
        assert_eq!(validate_op(&evt).unwrap_err().code(), ErrorCode::InvalidKind);
    }

    #[test]
    fn test_missing_required_tag() {
        let mut evt = create();
        evt.envelope.tags.retain(|t| t.key() != Some("subspace_name"));
        assert_eq!(
            validate_create(&evt),
            Err(ValidationError::MissingRequiredField {
                kind: "create",
                field: "subspace_name"
            })
        );
    }

    #[test]
    fn test_short_tag_does_not_count_as_present() {
        let mut evt = JoinEventBuilder::new(sid()).build();
        evt.envelope.tags = vec![Tag::pair("sid", sid()), Tag(vec!["d".to_string()])];
        assert!(matches!(
            validate_join(&evt),
            Err(ValidationError::MissingRequiredField { field: "d", .. })
        ));
    }

    #[test]
    fn test_malformed_subspace_id() {
        let evt = JoinEventBuilder::new("0x1234").build();
        assert_eq!(
            validate_join(&evt).unwrap_err().code(),
            ErrorCode::MalformedSubspaceId
        );
        let evt = OpEventBuilder::new("not-an-id", "model").build();
        assert_eq!(
            validate_op(&evt).unwrap_err().code(),
            ErrorCode::MalformedSubspaceId
        );
    }

    #[test]
    fn test_id_mismatch() {
        let mut evt = create();
        evt.rules = "energy>2000".to_string();
        assert!(matches!(
            validate_create(&evt),
            Err(ValidationError::IdMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_description() {
        let evt = CreateEventBuilder::new("n").description("").build();
        assert_eq!(
            validate_create(&evt).unwrap_err().code(),
            ErrorCode::InvalidContent
        );
    }

    #[test]
    fn test_bad_ops_format() {
        let evt = CreateEventBuilder::new("n")
            .ops("post=1,vote")
            .description("d")
            .build();
        assert_eq!(
            validate_create(&evt),
            Err(ValidationError::InvalidOpsFormat {
                ops: "post=1,vote".to_string()
            })
        );
    }

    #[test]
    fn test_vote_domain() {
        let maybe = OpEventBuilder::new(sid(), OP_VOTE).vote("p1", "maybe").build();
        assert_eq!(
            validate_op(&maybe).unwrap_err().code(),
            ErrorCode::InvalidVoteValue
        );
        for v in ["yes", "no"] {
            let evt = OpEventBuilder::new(sid(), OP_VOTE).vote("p1", v).build();
            assert!(validate_op(&evt).is_ok());
        }
    }

    #[test]
    fn test_unknown_operation_passes() {
        let evt = OpEventBuilder::new(sid(), "model").build();
        assert!(validate_op(&evt).is_ok());
    }

    #[test]
    fn test_check_vocabulary() {
        let ops = OpsSpec::parse(DEFAULT_SUBSPACE_OPS).unwrap();
        let post = OpEventBuilder::new(sid(), OP_POST).build();
        assert!(check_vocabulary(&post, &ops).is_ok());
        let model = OpEventBuilder::new(sid(), "model").build();
        assert_eq!(
            check_vocabulary(&model, &ops),
            Err(ValidationError::OperationNotInVocabulary {
                operation: "model".to_string()
            })
        );
    }
}
