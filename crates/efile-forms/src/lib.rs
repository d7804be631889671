//! # efile-forms — Compliance Record Families
//!
//! The five activity record families a report batch can carry, the
//! capability contract they all satisfy, and the immutable registry that
//! maps a form type code to the codec for its concrete record type.
//!
//! A record's concrete schema is *not* discoverable from the record
//! element itself — the discriminator lives on the batch envelope, one
//! level up. Everything here is therefore built to be driven by the
//! envelope decoder: records decode through [`registry::resolve`] once the
//! envelope's form type is known, never by guessing from shape.
//!
//! ## Crate Policy
//!
//! - Depends only on `efile-core` internally.
//! - The family set is closed: five modules, five enum variants, one
//!   registry row each. Adding a family is a compile-time event visible
//!   to every consumer.

pub mod cash_payments;
pub mod currency_transaction;
pub mod error;
pub mod exempt_designation;
pub mod foreign_accounts;
pub mod party;
pub mod record;
pub mod registry;
pub mod suspicious_activity;

pub use error::FormError;
pub use party::{Party, PartyTypeCode};
pub use record::{Activity, ActivityRecord};
pub use registry::{resolve, RecordCodec, RECORD_CODECS};
