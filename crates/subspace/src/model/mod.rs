//! Data model types for subspace events.
//!
//! - Envelopes and tags (the generic wire record)
//! - Subspace identifiers
//! - Operation vocabularies and contribution weights
//! - Typed create/join/op events
//! - Builders (event construction)

pub mod builder;
pub mod contrib;
pub mod envelope;
pub mod event;
pub mod id;
pub mod ops_spec;

pub use builder::{CreateEventBuilder, JoinEventBuilder, OpEventBuilder};
pub use contrib::Contributions;
pub use envelope::{
    Envelope, EnvelopeSigner, EnvelopeVerifier, EventKind, Tag, KIND_SUBSPACE_CREATE,
    KIND_SUBSPACE_JOIN, KIND_SUBSPACE_OP,
};
pub use event::{
    BasicOperation, SubspaceCreateEvent, SubspaceEvent, SubspaceJoinEvent, SubspaceOpEvent,
    VoteValue,
};
pub use id::{
    check_subspace_id, derive_subspace_id, SubspaceId, SUBSPACE_ID_LEN, SUBSPACE_ID_PREFIX,
};
pub use ops_spec::{OpsSpec, DEFAULT_SUBSPACE_OPS, OP_INVITE, OP_POST, OP_PROPOSE, OP_VOTE};
