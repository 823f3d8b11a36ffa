//! Per-operation validators keyed by operation name.
//!
//! Op events are validated by looking up their operation name here. Names
//! without a registered validator pass: vocabularies are extended per
//! subspace, and domains that want stricter checks register their own.

use std::fmt;
use std::sync::Arc;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::error::ValidationError;
use crate::model::event::{BasicOperation, SubspaceOpEvent};

/// A validator for one operation name.
pub type OpValidator = dyn Fn(&SubspaceOpEvent) -> Result<(), ValidationError> + Send + Sync;

lazy_static! {
    static ref BASIC_REGISTRY: OpRegistry = OpRegistry::basic();
}

/// The shared registry holding the four basic validators.
pub fn basic_registry() -> &'static OpRegistry {
    &BASIC_REGISTRY
}

/// Table of `operation name -> validator`.
#[derive(Clone, Default)]
pub struct OpRegistry {
    validators: FxHashMap<String, Arc<OpValidator>>,
}

impl OpRegistry {
    /// Creates an empty registry (every operation passes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the post, propose, vote and invite validators.
    pub fn basic() -> Self {
        let mut registry = Self::new();
        for op in BasicOperation::ALL {
            registry.register(op.name(), basic_validator(op));
        }
        registry
    }

    /// Registers `validator` for `operation`, replacing any previous one.
    pub fn register<F>(&mut self, operation: impl Into<String>, validator: F)
    where
        F: Fn(&SubspaceOpEvent) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.validators.insert(operation.into(), Arc::new(validator));
    }

    /// Builder-style [`OpRegistry::register`].
    pub fn with<F>(mut self, operation: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&SubspaceOpEvent) -> Result<(), ValidationError> + Send + Sync + 'static,
    {
        self.register(operation, validator);
        self
    }

    /// Whether `operation` has a registered validator.
    pub fn contains(&self, operation: &str) -> bool {
        self.validators.contains_key(operation)
    }

    /// Registered operation names, sorted.
    pub fn operations(&self) -> Vec<&str> {
        let mut ops: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        ops.sort_unstable();
        ops
    }

    /// Runs the validator registered for the event's operation, if any.
    pub fn validate(&self, event: &SubspaceOpEvent) -> Result<(), ValidationError> {
        match self.validators.get(event.operation.as_str()) {
            Some(validator) => {
                trace!(operation = %event.operation, "dispatching operation validator");
                validator(event)
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for OpRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpRegistry")
            .field("operations", &self.operations())
            .finish()
    }
}

/// The built-in validator for a basic operation.
pub fn basic_validator(op: BasicOperation) -> fn(&SubspaceOpEvent) -> Result<(), ValidationError> {
    match op {
        BasicOperation::Post => validate_post,
        BasicOperation::Propose => validate_propose,
        BasicOperation::Vote => validate_vote,
        BasicOperation::Invite => validate_invite,
    }
}

/// Requires `value` to be present and non-empty.
pub fn require_field(
    event: &SubspaceOpEvent,
    value: Option<&String>,
    field: &'static str,
) -> Result<(), ValidationError> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingOperationField {
            operation: event.operation.clone(),
            field,
        }),
    }
}

/// `post` needs a content type.
pub fn validate_post(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    require_field(event, event.content_type.as_ref(), "content_type")
}

/// `propose` needs a proposal ID.
pub fn validate_propose(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    require_field(event, event.proposal_id.as_ref(), "proposal_id")
}

/// `vote` needs a proposal ID and a vote of `yes` or `no`.
pub fn validate_vote(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    require_field(event, event.proposal_id.as_ref(), "proposal_id")?;
    require_field(event, event.vote.as_ref(), "vote")?;
    match event.vote_value() {
        Some(_) => Ok(()),
        None => Err(ValidationError::InvalidVoteValue {
            vote: event.vote.clone().unwrap_or_default(),
        }),
    }
}

/// `invite` needs the invitee identity.
pub fn validate_invite(event: &SubspaceOpEvent) -> Result<(), ValidationError> {
    require_field(event, event.invitee_pubkey.as_ref(), "invitee_pubkey")
}
