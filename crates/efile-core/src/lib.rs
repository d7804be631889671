//! # efile-core — Foundational Types for the E-Filing Stack
//!
//! This crate is the bedrock of the BSA e-filing stack. It defines the
//! primitives every other crate builds on: the closed form-type
//! discriminator, sequence-number identity, bounded wire text, the XML
//! element tree used by the primary wire format, and the field-validation
//! seam that the batch orchestrator delegates to.
//!
//! ## Key Design Principles
//!
//! 1. **Closed discriminator set.** `FormType` is a five-variant enum with
//!    exhaustive matches everywhere. There is no dynamic registration; an
//!    unknown code is data, never a new type.
//!
//! 2. **Newtype wrappers for wire primitives.** `SeqNumber`, `BsaId`,
//!    `BoundedText<N>` — validated constructors, no bare strings for
//!    values the receiving authority constrains.
//!
//! 3. **One funnel for the primary wire format.** All XML reading and
//!    writing flows through `XmlElement`; no call site touches the event
//!    stream directly.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `efile-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod form;
pub mod sequence;
pub mod text;
pub mod validate;
pub mod xml;

// Re-export primary types for ergonomic imports.
pub use form::FormType;
pub use sequence::SeqNumber;
pub use text::{BoundedText, BsaId, Text50, Text512, Text525, Text4000, TextError};
pub use validate::{FieldValidate, FieldViolation};
pub use xml::{XmlElement, XmlError};
