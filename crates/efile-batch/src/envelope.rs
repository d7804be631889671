//! # The Batch Envelope
//!
//! The root entity: either a report of activity records (one of five form
//! families, all sharing the envelope's form type code) or an
//! acknowledgment carrying the authority's submission tree. The nine
//! aggregate attributes summarizing the record set are owned exclusively
//! by the envelope — records never write them.
//!
//! ## State
//!
//! ```text
//! StatusCode == "A"  ──▶  Acknowledgment (submission tree, no records)
//! anything else      ──▶  Report        (records, no submission tree)
//! ```
//!
//! The envelope is constructed empty, populated by appends or by the
//! two-phase decoder, mutated in place by the aggregator and sequencer,
//! and consumed by the encoders. It has no identity beyond the sequence
//! number assigned during sequencing.

use serde::Serialize;

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};
use efile_forms::{Activity, ActivityRecord};

use crate::attrs::{inject_canonical_attrs, WireAttr};
use crate::error::{BatchError, BatchResult};
use crate::submission::Submission;

/// Root element name of the batch document.
pub const BATCH_ELEMENT: &str = "EFilingBatchXML";

/// The status code sentinel marking an acknowledgment envelope.
pub const ACKNOWLEDGMENT_STATUS_CODE: &str = "A";

/// Which of the two envelope states a batch is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BatchKind {
    /// Carries activity records under a form type code.
    Report,
    /// Carries the authority's acknowledgment tree.
    Acknowledgment,
}

impl std::fmt::Display for BatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Report => f.write_str("REPORT"),
            Self::Acknowledgment => f.write_str("ACKNOWLEDGMENT"),
        }
    }
}

fn is_zero_i64(n: &i64) -> bool {
    *n == 0
}

fn is_zero_f64(n: &f64) -> bool {
    *n == 0.0
}

/// A batch e-filing document.
///
/// Deserialization does not derive from this type: decoding is the
/// two-phase procedure in [`crate::decode`], which needs the envelope's
/// form type code before any record can be typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchEnvelope {
    /// Tree sequence number.
    #[serde(rename = "SeqNum")]
    pub seq_num: SeqNumber,
    /// Processing status; `"A"` marks the acknowledgment state.
    #[serde(rename = "StatusCode", skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    /// Sum of every record's total amount.
    #[serde(rename = "TotalAmount", skip_serializing_if = "is_zero_f64")]
    pub total_amount: f64,
    /// Filtered party count per the form family's classifier rule.
    #[serde(rename = "PartyCount", skip_serializing_if = "is_zero_i64")]
    pub party_count: i64,
    /// Number of activity records.
    #[serde(rename = "ActivityCount", skip_serializing_if = "is_zero_i64")]
    pub activity_count: i64,
    /// Total account entries (foreign accounts family only).
    #[serde(rename = "AccountCount", skip_serializing_if = "is_zero_i64")]
    pub account_count: i64,
    /// Attachments recorded on activities.
    #[serde(rename = "ActivityAttachmentCount", skip_serializing_if = "is_zero_i64")]
    pub activity_attachment_count: i64,
    /// Attachment files in the batch.
    #[serde(rename = "AttachmentCount", skip_serializing_if = "is_zero_i64")]
    pub attachment_count: i64,
    /// Jointly-owned account owners (classifier 42).
    #[serde(rename = "JointlyOwnedOwnerCount", skip_serializing_if = "is_zero_i64")]
    pub jointly_owned_owner_count: i64,
    /// Owners with no financial interest (classifiers 43 and 44).
    #[serde(rename = "NoFIOwnerCount", skip_serializing_if = "is_zero_i64")]
    pub no_fi_owner_count: i64,
    /// Consolidated report owners.
    #[serde(rename = "ConsolidatedOwnerCount", skip_serializing_if = "is_zero_i64")]
    pub consolidated_owner_count: i64,
    /// Wire attributes not otherwise modeled, preserved from decode.
    #[serde(rename = "Attrs", skip_serializing_if = "Vec::is_empty")]
    pub extra_attrs: Vec<WireAttr>,
    /// The form type code, verbatim from the wire. Kept as a string so an
    /// unrecognized code survives decode and is reported at validation.
    #[serde(rename = "FormTypeCode", skip_serializing_if = "Option::is_none")]
    pub form_type_code: Option<String>,
    /// Activity records, in document order.
    #[serde(rename = "Activity", skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<Activity>,
    /// Acknowledgment subtree.
    #[serde(rename = "EFilingSubmissionXML", skip_serializing_if = "Option::is_none")]
    pub submission: Option<Submission>,
}

impl BatchEnvelope {
    /// An empty report envelope for the given form family.
    pub fn report(form_type: FormType) -> Self {
        Self {
            form_type_code: Some(form_type.code().to_string()),
            ..Self::default()
        }
    }

    /// An empty acknowledgment envelope.
    pub fn acknowledgment() -> Self {
        Self {
            status_code: Some(ACKNOWLEDGMENT_STATUS_CODE.to_string()),
            ..Self::default()
        }
    }

    /// The envelope state, derived from the status code.
    pub fn kind(&self) -> BatchKind {
        if self.status_code.as_deref() == Some(ACKNOWLEDGMENT_STATUS_CODE) {
            BatchKind::Acknowledgment
        } else {
            BatchKind::Report
        }
    }

    /// The form family, when the stored code is one of the five.
    pub fn form_type(&self) -> Option<FormType> {
        self.form_type_code.as_deref().and_then(FormType::from_code)
    }

    /// Append a record to the end of the record sequence.
    ///
    /// This is the single enforcement point of the cross-record
    /// discriminator invariant: the envelope must carry a recognized form
    /// type code and the record's own form type must equal it. On
    /// rejection the record sequence is left untouched.
    pub fn append_activity(&mut self, activity: Activity) -> BatchResult<()> {
        let form_type = self.form_type().ok_or_else(|| BatchError::InvalidAppend {
            reason: format!(
                "batch form type code {:?} is not a recognized report form",
                self.form_type_code.as_deref().unwrap_or("")
            ),
        })?;
        if activity.form_type() != form_type {
            return Err(BatchError::InvalidAppend {
                reason: format!(
                    "record form type {} does not match batch form type {}",
                    activity.form_type(),
                    form_type
                ),
            });
        }
        self.activities.push(activity);
        Ok(())
    }

    /// Render as the batch document element, canonical attributes
    /// injected.
    pub fn to_xml(&self) -> XmlElement {
        let mut root = XmlElement::new(BATCH_ELEMENT);
        root.push_attr("SeqNum", self.seq_num.to_string());
        if let Some(status) = &self.status_code {
            if !status.is_empty() {
                root.push_attr("StatusCode", status);
            }
        }
        push_amount_attr(&mut root, "TotalAmount", self.total_amount);
        push_count_attr(&mut root, "PartyCount", self.party_count);
        push_count_attr(&mut root, "ActivityCount", self.activity_count);
        push_count_attr(&mut root, "AccountCount", self.account_count);
        push_count_attr(&mut root, "ActivityAttachmentCount", self.activity_attachment_count);
        push_count_attr(&mut root, "AttachmentCount", self.attachment_count);
        push_count_attr(&mut root, "JointlyOwnedOwnerCount", self.jointly_owned_owner_count);
        push_count_attr(&mut root, "NoFIOwnerCount", self.no_fi_owner_count);
        push_count_attr(&mut root, "ConsolidatedOwnerCount", self.consolidated_owner_count);
        for attr in inject_canonical_attrs(&self.extra_attrs) {
            root.push_attr(attr.name, attr.value);
        }
        if let Some(code) = &self.form_type_code {
            if !code.is_empty() {
                root.push_child(XmlElement::new("FormTypeCode").with_text(code));
            }
        }
        for activity in &self.activities {
            root.push_child(activity.to_xml());
        }
        if let Some(submission) = &self.submission {
            root.push_child(submission.to_xml());
        }
        root
    }

    /// Encode as an XML document string.
    pub fn encode_xml(&self) -> BatchResult<String> {
        Ok(self.to_xml().to_document_string()?)
    }

    /// Encode as a JSON document string.
    pub fn encode_json(&self) -> BatchResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn push_count_attr(root: &mut XmlElement, name: &str, value: i64) {
    if value != 0 {
        root.push_attr(name, value.to_string());
    }
}

fn push_amount_attr(root: &mut XmlElement, name: &str, value: f64) {
    if value != 0.0 {
        root.push_attr(name, format!("{value}"));
    }
}

impl FieldValidate for BatchEnvelope {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        efile_core::validate::validate_all(&self.activities)?;
        if let Some(submission) = &self.submission {
            submission.validate_fields()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efile_forms::currency_transaction;
    use efile_forms::suspicious_activity;

    fn ctr_activity() -> Activity {
        Activity::CurrencyTransaction(currency_transaction::ActivityType::default())
    }

    #[test]
    fn test_report_constructor() {
        let batch = BatchEnvelope::report(FormType::CurrencyTransaction);
        assert_eq!(batch.kind(), BatchKind::Report);
        assert_eq!(batch.form_type(), Some(FormType::CurrencyTransaction));
        assert!(batch.activities.is_empty());
    }

    #[test]
    fn test_acknowledgment_constructor() {
        let batch = BatchEnvelope::acknowledgment();
        assert_eq!(batch.kind(), BatchKind::Acknowledgment);
        assert_eq!(batch.status_code.as_deref(), Some("A"));
    }

    #[test]
    fn test_any_other_status_is_a_report() {
        let mut batch = BatchEnvelope::default();
        assert_eq!(batch.kind(), BatchKind::Report);
        batch.status_code = Some("B".to_string());
        assert_eq!(batch.kind(), BatchKind::Report);
    }

    #[test]
    fn test_append_matching_record() {
        let mut batch = BatchEnvelope::report(FormType::CurrencyTransaction);
        batch.append_activity(ctr_activity()).unwrap();
        assert_eq!(batch.activities.len(), 1);
    }

    #[test]
    fn test_append_mismatched_record_leaves_sequence_unchanged() {
        let mut batch = BatchEnvelope::report(FormType::SuspiciousActivity);
        batch
            .append_activity(Activity::SuspiciousActivity(
                suspicious_activity::ActivityType::default(),
            ))
            .unwrap();

        let err = batch.append_activity(ctr_activity()).unwrap_err();
        assert!(matches!(err, BatchError::InvalidAppend { .. }));
        assert_eq!(batch.activities.len(), 1);
    }

    #[test]
    fn test_append_without_valid_form_type_fails() {
        let mut batch = BatchEnvelope::default();
        assert!(matches!(
            batch.append_activity(ctr_activity()),
            Err(BatchError::InvalidAppend { .. })
        ));

        batch.form_type_code = Some("NOPE".to_string());
        assert!(matches!(
            batch.append_activity(ctr_activity()),
            Err(BatchError::InvalidAppend { .. })
        ));
        assert!(batch.activities.is_empty());
    }

    #[test]
    fn test_to_xml_omits_zero_attributes() {
        let batch = BatchEnvelope::report(FormType::CurrencyTransaction);
        let root = batch.to_xml();
        assert_eq!(root.attr("SeqNum"), Some("0"));
        assert_eq!(root.attr("TotalAmount"), None);
        assert_eq!(root.attr("ActivityCount"), None);
    }

    #[test]
    fn test_to_xml_carries_canonical_attrs() {
        let root = BatchEnvelope::acknowledgment().to_xml();
        assert_eq!(
            root.attr("xmlns:xsi"),
            Some("http://www.w3.org/2001/XMLSchema-instance")
        );
        assert!(root.attr("xsi:schemaLocation").is_some());
        assert_eq!(root.attr("xsi:fc2"), Some("www.server.gov/base"));
    }

    #[test]
    fn test_json_encode_skips_absent_fields() {
        let batch = BatchEnvelope::report(FormType::ForeignAccounts);
        let json: serde_json::Value =
            serde_json::from_str(&batch.encode_json().unwrap()).unwrap();
        assert_eq!(json["FormTypeCode"], "FBARX");
        assert!(json.get("StatusCode").is_none());
        assert!(json.get("TotalAmount").is_none());
        assert!(json.get("Activity").is_none());
    }
}
