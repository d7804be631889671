//! # efile-batch — Batch Envelope Engine
//!
//! The container document of the e-filing stack: a batch either reports a
//! set of compliance activity records (one of five form families) or
//! carries the receiving authority's acknowledgment tree, plus aggregate
//! count/amount attributes that must stay consistent with the records.
//!
//! ## The engine, in dependency order
//!
//! - **Two-phase decoder** (`decode`): the concrete type of a nested
//!   record is revealed by the *envelope's* form type code, not by the
//!   record element. Phase one captures the envelope shape and holds each
//!   record as an untyped fragment; phase two resolves the registry codec
//!   and promotes every fragment in document order.
//! - **Aggregator** (`aggregate`): pure computation of the nine-field
//!   attribute bundle with per-family party classifier rules; generate
//!   and verify call modes.
//! - **Attribute injector** (`attrs`): byte-exact canonical namespace
//!   attributes on every XML encode, idempotent across round trips.
//! - **Validation orchestrator** (`validation`): structural checks by
//!   batch state, then aggregate verification, then delegation to the
//!   generic field validator — in that fixed order.
//! - **Sequencer** (`sequence`): on-demand depth-first assignment of
//!   tree sequence numbers.
//!
//! ## Concurrency
//!
//! Everything here is synchronous, in-memory computation. Each
//! `BatchEnvelope` belongs to one logical operation; parallel callers
//! give each decode its own envelope and share nothing but the `const`
//! registry.

pub mod aggregate;
pub mod attrs;
pub mod decode;
pub mod envelope;
pub mod error;
pub mod sequence;
pub mod submission;
pub mod validation;

pub use aggregate::{AttributeSummary, CountField};
pub use attrs::{inject_canonical_attrs, WireAttr};
pub use envelope::{BatchEnvelope, BatchKind, ACKNOWLEDGMENT_STATUS_CODE};
pub use error::{BatchError, BatchResult};
pub use sequence::assign_sequence_numbers;
pub use submission::{Submission, SubmissionActivity, SubmissionActivityError};
pub use validation::ValidationOptions;
