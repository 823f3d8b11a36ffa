//! Turning inbound envelopes into typed subspace events.
//!
//! This is the only path from an untrusted envelope to a typed event. Each
//! parser checks limits, decodes the recognized tags, then validates. On
//! any failure the error is returned and nothing partially decoded escapes.
//! Parsing is pure: the same envelope always yields the same result.

use tracing::debug;

use crate::codec::{decode_create_content, decode_create_tags, decode_join_tags, decode_op_tags};
use crate::error::ValidationError;
use crate::limits::Limits;
use crate::model::envelope::{Envelope, EventKind};
use crate::model::event::{SubspaceCreateEvent, SubspaceEvent, SubspaceJoinEvent, SubspaceOpEvent};
use crate::validate::{basic_registry, validate_create, validate_join, validate_op_with, OpRegistry};

/// Limits and operation registry used while parsing.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions<'r> {
    pub limits: Limits,
    pub registry: &'r OpRegistry,
}

impl Default for ParseOptions<'static> {
    fn default() -> Self {
        Self {
            limits: Limits::default(),
            registry: basic_registry(),
        }
    }
}

impl<'r> ParseOptions<'r> {
    /// Default limits with a caller-supplied registry.
    pub fn with_registry(registry: &'r OpRegistry) -> Self {
        Self {
            limits: Limits::default(),
            registry,
        }
    }

    /// Replaces the limits.
    pub fn limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Parses a create envelope.
pub fn parse_create(envelope: &Envelope) -> Result<SubspaceCreateEvent, ValidationError> {
    parse_create_with(envelope, &ParseOptions::default())
}

/// Parses a join envelope.
pub fn parse_join(envelope: &Envelope) -> Result<SubspaceJoinEvent, ValidationError> {
    parse_join_with(envelope, &ParseOptions::default())
}

/// Parses an op envelope with the basic operation validators.
pub fn parse_op(envelope: &Envelope) -> Result<SubspaceOpEvent, ValidationError> {
    parse_op_with(envelope, &ParseOptions::default())
}

/// Parses any subspace envelope, choosing the parser from its kind.
pub fn parse_event(envelope: &Envelope) -> Result<SubspaceEvent, ValidationError> {
    parse_event_with(envelope, &ParseOptions::default())
}

/// Parses a create envelope with explicit options.
pub fn parse_create_with(
    envelope: &Envelope,
    options: &ParseOptions<'_>,
) -> Result<SubspaceCreateEvent, ValidationError> {
    let result = options.limits.check(envelope).and_then(|()| {
        let tags = decode_create_tags(&envelope.tags);
        let content = decode_create_content(&envelope.content).unwrap_or_default();
        let event = SubspaceCreateEvent {
            envelope: envelope.clone(),
            subspace_id: tags.subspace_id,
            name: tags.name,
            ops: tags.ops,
            rules: tags.rules,
            description: content.desc,
            image_url: content.img_url,
        };
        validate_create(&event)?;
        Ok(event)
    });
    log_outcome(EventKind::Create, envelope, &result);
    result
}

/// Parses a join envelope with explicit options.
pub fn parse_join_with(
    envelope: &Envelope,
    options: &ParseOptions<'_>,
) -> Result<SubspaceJoinEvent, ValidationError> {
    let result = options.limits.check(envelope).and_then(|()| {
        let tags = decode_join_tags(&envelope.tags);
        let event = SubspaceJoinEvent {
            envelope: envelope.clone(),
            subspace_id: tags.subspace_id,
        };
        validate_join(&event)?;
        Ok(event)
    });
    log_outcome(EventKind::Join, envelope, &result);
    result
}

/// Parses an op envelope, validating its operation through `options.registry`.
pub fn parse_op_with(
    envelope: &Envelope,
    options: &ParseOptions<'_>,
) -> Result<SubspaceOpEvent, ValidationError> {
    let result = options.limits.check(envelope).and_then(|()| {
        let tags = decode_op_tags(&envelope.tags);
        let event = SubspaceOpEvent {
            envelope: envelope.clone(),
            subspace_id: tags.subspace_id,
            operation: tags.operation,
            content_type: tags.content_type,
            parent: tags.parent,
            proposal_id: tags.proposal_id,
            vote: tags.vote,
            invitee_pubkey: tags.invitee_pubkey,
            contributions: tags.contributions,
            rules: tags.rules,
        };
        validate_op_with(&event, options.registry)?;
        Ok(event)
    });
    log_outcome(EventKind::Op, envelope, &result);
    result
}

pub fn parse_event_with(
    envelope: &Envelope,
    options: &ParseOptions<'_>,
) -> Result<SubspaceEvent, ValidationError> {
    match envelope.event_kind() {
        Some(EventKind::Create) => parse_create_with(envelope, options).map(SubspaceEvent::Create),
        Some(EventKind::Join) => parse_join_with(envelope, options).map(SubspaceEvent::Join),
        Some(EventKind::Op) => parse_op_with(envelope, options).map(SubspaceEvent::Op),
        None => {
            debug!(kind = envelope.kind, id = %envelope.id, "not a subspace envelope");
            Err(ValidationError::InvalidKind {
                expected: "30100, 30200 or 30300",
                found: envelope.kind,
            })
        }
    }
}

fn log_outcome<T>(kind: EventKind, envelope: &Envelope, result: &Result<T, ValidationError>) {
    match result {
        Ok(_) => debug!(kind = kind.name(), id = %envelope.id, "accepted subspace envelope"),
        Err(err) => debug!(
            kind = kind.name(),
            id = %envelope.id,
            code = err.code().code(),
            error = %err,
            "rejected subspace envelope"
        ),
    }
}
