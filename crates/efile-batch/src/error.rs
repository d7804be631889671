//! Batch-level error taxonomy.
//!
//! Decode errors abort the whole decode — no partial envelope is ever
//! returned. Validation errors short-circuit at the first violated rule
//! in the orchestrator's fixed check order. Append errors are returned
//! without mutating the record sequence.

use thiserror::Error;

use efile_core::{FieldViolation, XmlError};

use crate::aggregate::CountField;

/// Errors from decoding, validating, or mutating a batch envelope.
#[derive(Error, Debug)]
pub enum BatchError {
    /// The input parses as neither supported wire format.
    #[error("input matches neither the XML nor the JSON batch format")]
    ParseError,

    /// No record codec is registered for the envelope's form type code.
    #[error("no record type is registered for form type code {code:?}")]
    UnknownDiscriminator {
        /// The unresolvable code.
        code: String,
    },

    /// A record fragment failed to decode into its resolved concrete type.
    #[error("activity {index} is not a valid {code} record: {reason}")]
    InvalidActivity {
        /// Zero-based position of the fragment in the envelope.
        index: usize,
        /// The form type code the fragment was resolved against.
        code: String,
        /// Decode failure detail.
        reason: String,
    },

    /// A report batch carries a form type code outside the closed set.
    #[error("form type code {code:?} is not one of the recognized report forms")]
    InvalidFormType {
        /// The rejected code (empty when absent).
        code: String,
    },

    /// A report batch carries no activity records.
    #[error("report batch carries no activities")]
    EmptyActivityList,

    /// An acknowledgment batch carries no submission tree.
    #[error("acknowledgment batch carries no submission tree")]
    MissingSubmission,

    /// A stored aggregate attribute disagrees with the computed value.
    #[error("{field} disagrees with the computed value: stored {stored}, computed {computed}")]
    CountMismatch {
        /// The first mismatching attribute, in check order.
        field: CountField,
        /// Value stored on the envelope.
        stored: String,
        /// Value the aggregator computed.
        computed: String,
    },

    /// A record could not be appended.
    #[error("cannot append activity: {reason}")]
    InvalidAppend {
        /// Why the append was rejected.
        reason: String,
    },

    /// The generic field validator reported a violation.
    #[error(transparent)]
    Field(#[from] FieldViolation),

    /// XML serialization failure on encode.
    #[error("xml error: {0}")]
    Xml(#[from] XmlError),

    /// JSON serialization failure on encode.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        assert!(BatchError::ParseError.to_string().contains("neither"));
    }

    #[test]
    fn test_unknown_discriminator_display() {
        let err = BatchError::UnknownDiscriminator {
            code: "CTR".to_string(),
        };
        assert!(err.to_string().contains("\"CTR\""));
    }

    #[test]
    fn test_count_mismatch_names_field() {
        let err = BatchError::CountMismatch {
            field: CountField::PartyCount,
            stored: "5".to_string(),
            computed: "6".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PartyCount"));
        assert!(msg.contains("stored 5"));
        assert!(msg.contains("computed 6"));
    }

    #[test]
    fn test_invalid_activity_display() {
        let err = BatchError::InvalidActivity {
            index: 2,
            code: "FBARX".to_string(),
            reason: "bad amount".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("activity 2"));
        assert!(msg.contains("FBARX"));
    }
}
