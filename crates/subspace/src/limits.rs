//! Decoder limits for untrusted envelopes.
//!
//! The parse pipeline checks these before decoding any tag, so a hostile
//! envelope costs at most one pass over its tag list. Per-tag limits apply
//! only to tags with a recognized key; foreign tags are skipped by the
//! decoder and are bounded only by the tag count.

use serde::{Deserialize, Serialize};

use crate::codec::TagKey;
use crate::error::ValidationError;
use crate::model::Envelope;

/// Maximum number of tags in one envelope.
pub const MAX_TAGS: usize = 2048;

/// Maximum number of elements (key included) in one recognized tag.
pub const MAX_TAG_VALUES: usize = 16;

/// Maximum byte length of a single element of a recognized tag.
pub const MAX_TAG_VALUE_LEN: usize = 64 * 1024;

/// Maximum byte length of the envelope content.
pub const MAX_CONTENT_LEN: usize = 1024 * 1024;

/// Configurable decoder limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_tags: usize,
    pub max_tag_values: usize,
    pub max_tag_value_len: usize,
    pub max_content_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_tags: MAX_TAGS,
            max_tag_values: MAX_TAG_VALUES,
            max_tag_value_len: MAX_TAG_VALUE_LEN,
            max_content_len: MAX_CONTENT_LEN,
        }
    }
}

impl Limits {
    /// Checks an envelope against these limits.
    pub fn check(&self, envelope: &Envelope) -> Result<(), ValidationError> {
        if envelope.content.len() > self.max_content_len {
            return Err(ValidationError::LimitExceeded {
                field: "content",
                len: envelope.content.len(),
                max: self.max_content_len,
            });
        }
        if envelope.tags.len() > self.max_tags {
            return Err(ValidationError::LimitExceeded {
                field: "tags",
                len: envelope.tags.len(),
                max: self.max_tags,
            });
        }
        let recognized = envelope
            .tags
            .iter()
            .filter(|tag| tag.key().and_then(TagKey::from_wire).is_some());
        for tag in recognized {
            if tag.len() > self.max_tag_values {
                return Err(ValidationError::LimitExceeded {
                    field: "tag",
                    len: tag.len(),
                    max: self.max_tag_values,
                });
            }
            if let Some(long) = tag.iter().find(|v| v.len() > self.max_tag_value_len) {
                return Err(ValidationError::LimitExceeded {
                    field: "tag value",
                    len: long.len(),
                    max: self.max_tag_value_len,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Tag;

    #[test]
    fn test_default_limits_accept_small_envelope() {
        let mut env = Envelope::default();
        env.tags.push(Tag::pair("d", "subspace_join"));
        env.content = "hello".to_string();
        assert!(Limits::default().check(&env).is_ok());
    }

    #[test]
    fn test_too_many_tags() {
        let limits = Limits {
            max_tags: 2,
            ..Limits::default()
        };
        let mut env = Envelope::default();
        for i in 0..3 {
            env.tags.push(Tag::pair("t", i.to_string()));
        }
        let err = limits.check(&env).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LimitExceeded {
                field: "tags",
                len: 3,
                max: 2
            }
        );
    }

    #[test]
    fn test_long_tag_value() {
        let limits = Limits {
            max_tag_value_len: 4,
            ..Limits::default()
        };
        let mut env = Envelope::default();
        env.tags.push(Tag::pair("sid", "0123456789"));
        assert!(matches!(
            limits.check(&env),
            Err(ValidationError::LimitExceeded { field: "tag value", len: 10, max: 4 })
        ));
    }

    #[test]
    fn test_wide_tag_with_recognized_key() {
        let mut env = Envelope::default();
        let mut values = vec!["parent".to_string()];
        values.extend((0..MAX_TAG_VALUES).map(|i| i.to_string()));
        env.tags.push(Tag(values));
        assert_eq!(
            Limits::default().check(&env),
            Err(ValidationError::LimitExceeded {
                field: "tag",
                len: MAX_TAG_VALUES + 1,
                max: MAX_TAG_VALUES
            })
        );
    }

    #[test]
    fn test_foreign_tags_skip_per_tag_limits() {
        let limits = Limits {
            max_tag_values: 2,
            max_tag_value_len: 4,
            ..Limits::default()
        };
        let mut env = Envelope::default();
        let mut wide = vec!["x-meta".to_string()];
        wide.extend((0..MAX_TAG_VALUES).map(|i| i.to_string()));
        env.tags.push(Tag(wide));
        env.tags.push(Tag::pair("e", "a-long-event-reference"));
        env.tags.push(Tag(Vec::new()));
        assert!(limits.check(&env).is_ok());

        // The count limit still covers them.
        let limits = Limits {
            max_tags: 2,
            ..limits
        };
        assert!(matches!(
            limits.check(&env),
            Err(ValidationError::LimitExceeded { field: "tags", len: 3, max: 2 })
        ));
    }

    #[test]
    fn test_content_too_long() {
        let limits = Limits {
            max_content_len: 3,
            ..Limits::default()
        };
        let env = Envelope {
            content: "four".to_string(),
            ..Envelope::default()
        };
        assert!(matches!(
            limits.check(&env),
            Err(ValidationError::LimitExceeded { field: "content", .. })
        ));
    }
}
