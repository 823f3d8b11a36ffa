//! Error types for subspace event decoding, validation and storage.

use thiserror::Error;

/// Stable codes for validation failures.
///
/// Every code is a local, deterministic rejection of one envelope. None of
/// them is transient: retrying the same envelope yields the same code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// S001: Envelope kind is not the expected reserved kind
    InvalidKind,
    /// S002: A tag required for the event kind is absent
    MissingRequiredField,
    /// S003: Subspace ID has the wrong prefix or length
    MalformedSubspaceId,
    /// S004: Declared subspace ID differs from the recomputed one
    IdMismatch,
    /// S005: Create content is not `{"desc": ...}` with a non-empty desc
    InvalidContent,
    /// S006: Ops-spec element without `=`
    InvalidOpsFormat,
    /// S007: Vote value outside {"yes", "no"}
    InvalidVoteValue,
    /// S008: Operation-specific field missing or empty
    MissingOperationField,
    /// S009: Contribution weights are malformed
    InvalidContributions,
    /// S010: Operation not declared by the subspace vocabulary
    OperationNotInVocabulary,
    /// S011: Envelope exceeds a decoder limit
    LimitExceeded,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "S001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidKind => "S001",
            ErrorCode::MissingRequiredField => "S002",
            ErrorCode::MalformedSubspaceId => "S003",
            ErrorCode::IdMismatch => "S004",
            ErrorCode::InvalidContent => "S005",
            ErrorCode::InvalidOpsFormat => "S006",
            ErrorCode::InvalidVoteValue => "S007",
            ErrorCode::MissingOperationField => "S008",
            ErrorCode::InvalidContributions => "S009",
            ErrorCode::OperationNotInVocabulary => "S010",
            ErrorCode::LimitExceeded => "S011",
        }
    }
}

/// Rejection of an inbound subspace event.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("[S001] invalid event kind: expected {expected}, got {found}")]
    InvalidKind { expected: &'static str, found: u32 },

    #[error("[S002] missing required tag {field:?} for {kind} event")]
    MissingRequiredField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("[S003] malformed subspace ID {id:?}: {reason}")]
    MalformedSubspaceId { id: String, reason: &'static str },

    #[error("[S004] subspace ID mismatch: expected {expected}, got {found}")]
    IdMismatch { expected: String, found: String },

    #[error("[S005] invalid create content: {reason}")]
    InvalidContent { reason: String },

    #[error("[S006] invalid ops format: {ops:?}")]
    InvalidOpsFormat { ops: String },

    #[error("[S007] invalid vote value: {vote:?} (expected \"yes\" or \"no\")")]
    InvalidVoteValue { vote: String },

    #[error("[S008] {field} is required for {operation} operation")]
    MissingOperationField {
        operation: String,
        field: &'static str,
    },

    #[error("[S009] invalid contributions {contributions:?}: {reason}")]
    InvalidContributions {
        contributions: String,
        reason: &'static str,
    },

    #[error("[S010] operation {operation:?} is not declared by the subspace ops")]
    OperationNotInVocabulary { operation: String },

    #[error("[S011] {field} length {len} exceeds maximum {max}")]
    LimitExceeded {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

impl ValidationError {
    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::InvalidKind { .. } => ErrorCode::InvalidKind,
            ValidationError::MissingRequiredField { .. } => ErrorCode::MissingRequiredField,
            ValidationError::MalformedSubspaceId { .. } => ErrorCode::MalformedSubspaceId,
            ValidationError::IdMismatch { .. } => ErrorCode::IdMismatch,
            ValidationError::InvalidContent { .. } => ErrorCode::InvalidContent,
            ValidationError::InvalidOpsFormat { .. } => ErrorCode::InvalidOpsFormat,
            ValidationError::InvalidVoteValue { .. } => ErrorCode::InvalidVoteValue,
            ValidationError::MissingOperationField { .. } => ErrorCode::MissingOperationField,
            ValidationError::InvalidContributions { .. } => ErrorCode::InvalidContributions,
            ValidationError::OperationNotInVocabulary { .. } => {
                ErrorCode::OperationNotInVocabulary
            }
            ValidationError::LimitExceeded { .. } => ErrorCode::LimitExceeded,
        }
    }
}

/// Error reading a generic envelope from its wire JSON.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("malformed envelope JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error from an event store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("envelope has no id (sign or assign an id before storing)")]
    MissingId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code_prefix() {
        let err = ValidationError::InvalidVoteValue {
            vote: "maybe".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.starts_with("[S007]"), "{msg}");
        assert!(msg.starts_with(&format!("[{}]", err.code().code())));
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            ErrorCode::InvalidKind,
            ErrorCode::MissingRequiredField,
            ErrorCode::MalformedSubspaceId,
            ErrorCode::IdMismatch,
            ErrorCode::InvalidContent,
            ErrorCode::InvalidOpsFormat,
            ErrorCode::InvalidVoteValue,
            ErrorCode::MissingOperationField,
            ErrorCode::InvalidContributions,
            ErrorCode::OperationNotInVocabulary,
            ErrorCode::LimitExceeded,
        ];
        let mut seen = std::collections::HashSet::new();
        for code in codes {
            assert!(seen.insert(code.code()));
        }
    }
}
