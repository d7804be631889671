//! # Field Validation Seam
//!
//! The batch orchestrator finishes by delegating to a generic per-field
//! validator: each wire node enforces the required/format rules its own
//! schema declares, and containers recurse into their children. The
//! orchestrator treats the result as authoritative and returns it
//! unmodified.
//!
//! The first violation short-circuits the walk — callers receive exactly
//! one error describing the first failure, matching the propagation policy
//! of the rest of the validation chain.

use thiserror::Error;

/// A per-field rule violation, naming the violating element.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{element}: {message}")]
pub struct FieldViolation {
    /// Wire name of the violating element.
    pub element: String,
    /// Human-readable description of the violated rule.
    pub message: String,
}

impl FieldViolation {
    /// Construct a violation for `element`.
    pub fn new(element: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            message: message.into(),
        }
    }
}

/// Per-field rule enforcement for one wire node and its subtree.
pub trait FieldValidate {
    /// Validate this node's own fields, then recurse into children.
    /// Returns the first violation encountered, in document order.
    fn validate_fields(&self) -> Result<(), FieldViolation>;
}

/// Validate an ordered sequence of nodes, stopping at the first violation.
pub fn validate_all<T: FieldValidate>(nodes: &[T]) -> Result<(), FieldViolation> {
    for node in nodes {
        node.validate_fields()?;
    }
    Ok(())
}
