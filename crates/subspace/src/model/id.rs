//! Subspace identifiers.
//!
//! A subspace ID is `"0x"` followed by the 64 lowercase hex digits of
//! `SHA-256(name || ops || rules)`, with no separator between the inputs.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::ValidationError;

/// Prefix of every subspace ID.
pub const SUBSPACE_ID_PREFIX: &str = "0x";

/// Total length of a subspace ID: prefix plus 64 hex digits.
pub const SUBSPACE_ID_LEN: usize = 66;

/// A validated subspace identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubspaceId(String);

impl SubspaceId {
    /// Derives the ID of a subspace from its defining attributes.
    pub fn derive(name: &str, ops: &str, rules: &str) -> Self {
        SubspaceId(derive_subspace_id(name, ops, rules))
    }

    /// Parses an ID, checking prefix and length.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        check_subspace_id(s)?;
        Ok(SubspaceId(s.to_string()))
    }

    /// The ID as it appears on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SubspaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SubspaceId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        check_subspace_id(&s)?;
        Ok(SubspaceId(s))
    }
}

impl From<SubspaceId> for String {
    fn from(id: SubspaceId) -> Self {
        id.0
    }
}

/// Computes the subspace ID for `(name, ops, rules)`.
///
/// ```text
/// sid = "0x" || hex(SHA-256(name || ops || rules))
/// ```
pub fn derive_subspace_id(name: &str, ops: &str, rules: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(ops.as_bytes());
    hasher.update(rules.as_bytes());
    let hash = hasher.finalize();

    let mut s = String::with_capacity(SUBSPACE_ID_LEN);
    s.push_str(SUBSPACE_ID_PREFIX);
    s.push_str(&to_hex(&hash));
    s
}

/// Checks the wire shape of a subspace ID: `0x` prefix, 66 characters.
///
/// Hex digits are not checked; IDs minted elsewhere are accepted as long as
/// the shape matches.
pub fn check_subspace_id(id: &str) -> Result<(), ValidationError> {
    if !id.starts_with(SUBSPACE_ID_PREFIX) {
        return Err(ValidationError::MalformedSubspaceId {
            id: id.to_string(),
            reason: "should start with 0x",
        });
    }
    if id.len() != SUBSPACE_ID_LEN {
        return Err(ValidationError::MalformedSubspaceId {
            id: id.to_string(),
            reason: "length should be 66",
        });
    }
    Ok(())
}

/// Formats bytes as lowercase hex.
pub(crate) fn to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        s.push_str(&format!("{:02x}", byte));
    }
    s
}
