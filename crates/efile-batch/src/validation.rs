//! # Validation Orchestration
//!
//! A two-state machine over the envelope's status code, running checks in
//! a fixed order so the cheapest and most diagnostic failures surface
//! first:
//!
//! 1. **Structural** — acknowledgments must carry the submission tree;
//!    reports must carry a recognized form type code and at least one
//!    record.
//! 2. **Aggregate** — unless the caller opts out, the stored attribute
//!    bundle is verified against the aggregator's computation. This
//!    applies to the report state only: an acknowledgment carries no
//!    record set for the bundle to summarize.
//! 3. **Field rules** — delegation to the generic field validator over
//!    the whole tree; its result is returned unmodified.
//!
//! The first violated rule aborts the chain; callers receive exactly one
//! error.

use efile_core::{FieldValidate, FormType};

use crate::envelope::{BatchEnvelope, BatchKind};
use crate::error::{BatchError, BatchResult};

/// Caller-selectable validation behavior.
#[derive(Debug, Clone, Copy)]
pub struct ValidationOptions {
    /// Run aggregate attribute verification for report batches.
    pub verify_attributes: bool,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            verify_attributes: true,
        }
    }
}

impl BatchEnvelope {
    /// Validate the envelope: structural checks for its state, then
    /// aggregate verification, then the generic field validator.
    pub fn validate(&self, options: &ValidationOptions) -> BatchResult<()> {
        match self.kind() {
            BatchKind::Acknowledgment => {
                if self.submission.is_none() {
                    return Err(BatchError::MissingSubmission);
                }
            }
            BatchKind::Report => {
                let code = self.form_type_code.as_deref().unwrap_or("");
                if !FormType::is_valid_code(code) {
                    return Err(BatchError::InvalidFormType {
                        code: code.to_string(),
                    });
                }
                if self.activities.is_empty() {
                    return Err(BatchError::EmptyActivityList);
                }
                if options.verify_attributes {
                    self.verify_attributes()?;
                }
            }
        }

        self.validate_fields()?;
        Ok(())
    }
}
