//! Subspace: governance events over a decentralized signed-event log.
//!
//! A subspace is a named collaboration group. Producers create it, peers
//! join it, and members record typed operations (post, propose, vote,
//! invite, plus domain-specific extensions) as individually verifiable,
//! append-only envelopes.
//!
//! # Overview
//!
//! This crate owns the event schema and its validation:
//! - **Deterministic IDs**: a subspace ID is a SHA-256 over its name, ops
//!   and rules, so anyone can recompute and check it
//! - **Tag codec**: typed fields travel as `[key, value]` envelope tags
//! - **Extensible validation**: operation rules live in a registry that
//!   domains extend without touching the core
//!
//! Signing, relaying and persistence belong to the surrounding network and
//! are reached through the [`model::EnvelopeSigner`],
//! [`model::EnvelopeVerifier`] and [`store::EventStore`] seams.
//!
//! # Quick Start
//!
//! ```rust
//! use subspace::{parse_create, parse_op, CreateEventBuilder, OpEventBuilder, OP_VOTE};
//!
//! let create = CreateEventBuilder::new("modelgraph")
//!     .rules("energy>1000")
//!     .description("Desci AI Model collaboration subspace")
//!     .build();
//!
//! let vote = OpEventBuilder::new(&create.subspace_id, OP_VOTE)
//!     .vote("prop_001", "yes")
//!     .build();
//!
//! // (sign and publish the envelopes, then on the receiving side:)
//! let parsed = parse_create(&create.envelope).unwrap();
//! assert_eq!(parsed.subspace_id, create.subspace_id);
//! assert_eq!(parse_op(&vote.envelope).unwrap().vote.as_deref(), Some("yes"));
//! ```
//!
//! # Modules
//!
//! - [`model`]: Envelopes, IDs, vocabularies, typed events, builders
//! - [`codec`]: Tag and content encoding
//! - [`validate`]: Per-kind and per-operation validation
//! - [`parse`]: Envelope to typed event pipeline
//! - [`store`]: Event-store seam, in-memory store, subspace replay
//! - [`limits`]: Decoder limits
//! - [`error`]: Error types
//!
//! # Wire Format
//!
//! | Kind  | Event  | Required tags                      |
//! |-------|--------|------------------------------------|
//! | 30100 | create | `d`, `sid`, `subspace_name`, `ops` |
//! | 30200 | join   | `d`, `sid`                         |
//! | 30300 | op     | `d`, `sid`, `ops`                  |
//!
//! Create content is `{"desc": "...", "img_url": "..."}`.

pub mod codec;
pub mod error;
pub mod limits;
pub mod model;
pub mod parse;
pub mod store;
pub mod validate;

// Re-export commonly used types at crate root
pub use error::{EnvelopeError, ErrorCode, StoreError, ValidationError};
pub use limits::Limits;
pub use model::{
    check_subspace_id, derive_subspace_id, CreateEventBuilder, Envelope, EventKind,
    JoinEventBuilder, OpEventBuilder, OpsSpec, SubspaceCreateEvent, SubspaceEvent, SubspaceId,
    SubspaceJoinEvent, SubspaceOpEvent, Tag, DEFAULT_SUBSPACE_OPS, OP_INVITE, OP_POST,
    OP_PROPOSE, OP_VOTE,
};
pub use parse::{parse_create, parse_event, parse_event_with, parse_join, parse_op, ParseOptions};
pub use validate::{validate_create, validate_join, validate_op, OpRegistry};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
