//! Encoding of typed subspace fields into envelope tags and content.

pub mod content;
pub mod tag;

pub use content::{
    check_create_content, decode_create_content, encode_create_content, CreateContent,
};
pub use tag::{
    decode_create_tags, decode_join_tags, decode_op_tags, encode_create_tags, encode_join_tags,
    encode_op_tags, first_missing_key, has_key, required_keys, CreateTags, JoinTags, OpTags,
    TagKey,
};
