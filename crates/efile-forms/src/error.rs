//! Record-level decode errors.
//!
//! Structured errors for turning a raw fragment (XML subtree or keyed-map
//! value) into a concrete activity record. The batch decoder wraps these
//! into its own taxonomy; nothing here is user-facing on its own.

use thiserror::Error;

use efile_core::{TextError, XmlError};

/// Errors decoding or rendering one activity record.
#[derive(Error, Debug)]
pub enum FormError {
    /// A required element is absent from the fragment.
    #[error("required element {element} is missing")]
    MissingElement {
        /// Wire name of the missing element.
        element: &'static str,
    },

    /// An element or attribute carries an unparseable value.
    #[error("element {element} has invalid value {value:?}")]
    InvalidValue {
        /// Wire name of the offending element.
        element: &'static str,
        /// The rejected raw value.
        value: String,
    },

    /// An element violates a wire-text constraint (length, digit format).
    #[error("element {element}: {source}")]
    Text {
        /// Wire name of the offending element.
        element: &'static str,
        /// The underlying constraint violation.
        source: TextError,
    },

    /// The XML fragment itself is malformed.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// The keyed-map fragment does not deserialize.
    #[error("record does not deserialize: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for record codec operations.
pub type FormResult<T> = Result<T, FormError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_element_display() {
        let err = FormError::MissingElement {
            element: "ActivityPartyTypeCode",
        };
        assert!(err.to_string().contains("ActivityPartyTypeCode"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = FormError::InvalidValue {
            element: "TotalTransactionAmount",
            value: "lots".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("TotalTransactionAmount"));
        assert!(msg.contains("lots"));
    }
}
