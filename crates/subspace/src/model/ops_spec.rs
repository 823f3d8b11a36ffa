//! Operation vocabularies (`name=code` lists).
//!
//! A subspace declares its legal operations as a comma-separated list of
//! `name=code` pairs. There is no escaping: a name containing `,` or `=`
//! cannot be represented, and such input has no defined meaning.

use std::fmt;

use crate::error::ValidationError;

/// Post content into the subspace.
pub const OP_POST: &str = "post";
/// Open a proposal.
pub const OP_PROPOSE: &str = "propose";
/// Vote on a proposal.
pub const OP_VOTE: &str = "vote";
/// Invite an identity into the subspace.
pub const OP_INVITE: &str = "invite";

/// Default vocabulary for new subspaces.
pub const DEFAULT_SUBSPACE_OPS: &str = "post=1,propose=2,vote=3,invite=4";

/// A parsed ops-spec.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OpsSpec {
    entries: Vec<(String, String)>,
}

impl OpsSpec {
    /// Parses `key1=value1,key2=value2,...`.
    ///
    /// Every comma-separated element must contain `=`. Names and codes are
    /// otherwise unconstrained. The empty string is one empty element and is
    /// therefore rejected.
    pub fn parse(ops: &str) -> Result<Self, ValidationError> {
        let mut entries = Vec::new();
        for part in ops.split(',') {
            let Some((name, code)) = part.split_once('=') else {
                return Err(ValidationError::InvalidOpsFormat {
                    ops: ops.to_string(),
                });
            };
            entries.push((name.to_string(), code.to_string()));
        }
        Ok(Self { entries })
    }

    /// The default vocabulary (post, propose, vote, invite).
    pub fn basic() -> Self {
        Self {
            entries: [(OP_POST, "1"), (OP_PROPOSE, "2"), (OP_VOTE, "3"), (OP_INVITE, "4")]
                .into_iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
        }
    }

    /// Appends every entry of `other` whose name is not declared yet.
    pub fn union(mut self, other: &OpsSpec) -> Self {
        for (name, code) in &other.entries {
            if !self.contains(name) {
                self.entries.push((name.clone(), code.clone()));
            }
        }
        self
    }

    /// Whether `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Code declared for `name` (first declaration wins).
    pub fn code(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, c)| c.as_str())
    }

    /// Declared names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for OpsSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, code)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, code)?;
        }
        Ok(())
    }
}
