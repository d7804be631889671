//! # Two-Phase Batch Decode
//!
//! The concrete schema of a nested record is determined by the
//! *envelope's* form type code — the record element itself carries no
//! discriminator. A single-pass decode therefore cannot type the records:
//! the information needed to interpret level two does not exist until
//! level one is fully parsed. This is a deliberate double-parse, not an
//! optimization target.
//!
//! **Phase one** captures the envelope shape only: every attribute and
//! scalar field, the (non-polymorphic) acknowledgment subtree, and each
//! `Activity` child held as an untyped fragment. The primary wire format
//! is XML; on structural failure the input is retried as JSON, and if
//! that also fails the input matches neither format. Formats are never
//! mixed.
//!
//! **Phase two** resolves the registry codec for the now-known form type
//! code and promotes every fragment to its concrete record type, in
//! document order. A missing registration is `UnknownDiscriminator`, a
//! fragment that will not decode is `InvalidActivity` — either aborts the
//! whole decode; no partial envelope is returned.

use serde::Deserialize;
use thiserror::Error;

use efile_core::{SeqNumber, XmlElement, XmlError};
use efile_forms::error::FormError;
use efile_forms::registry;

use crate::attrs::WireAttr;
use crate::envelope::{BatchEnvelope, BATCH_ELEMENT};
use crate::error::{BatchError, BatchResult};
use crate::submission::Submission;

/// Envelope attributes with dedicated fields; everything else passes
/// through `extra_attrs`.
const MODELED_ATTRS: [&str; 11] = [
    "SeqNum",
    "StatusCode",
    "TotalAmount",
    "PartyCount",
    "ActivityCount",
    "AccountCount",
    "ActivityAttachmentCount",
    "AttachmentCount",
    "JointlyOwnedOwnerCount",
    "NoFIOwnerCount",
    "ConsolidatedOwnerCount",
];

/// Structural failure of one wire format; triggers the fallback, never
/// reported to callers directly.
#[derive(Error, Debug)]
enum ShapeError {
    #[error(transparent)]
    Xml(#[from] XmlError),
    #[error("unexpected root element {0:?}")]
    UnexpectedRoot(String),
    #[error(transparent)]
    Record(#[from] FormError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Raw record fragments awaiting phase two, in document order.
enum RawRecords {
    Xml(Vec<XmlElement>),
    Json(Vec<serde_json::Value>),
}

/// Shape-only capture of the envelope, records untyped.
struct RawBatch {
    seq_num: SeqNumber,
    status_code: Option<String>,
    total_amount: f64,
    party_count: i64,
    activity_count: i64,
    account_count: i64,
    activity_attachment_count: i64,
    attachment_count: i64,
    jointly_owned_owner_count: i64,
    no_fi_owner_count: i64,
    consolidated_owner_count: i64,
    extra_attrs: Vec<WireAttr>,
    form_type_code: Option<String>,
    records: RawRecords,
    submission: Option<Submission>,
}

impl BatchEnvelope {
    /// Decode a batch document from raw bytes, trying the XML format
    /// first and falling back to JSON on structural failure.
    pub fn from_bytes(input: &[u8]) -> BatchResult<Self> {
        let xml_shape = std::str::from_utf8(input)
            .ok()
            .map(shape_from_xml)
            .and_then(Result::ok);
        match xml_shape {
            Some(raw) => promote(raw),
            None => match shape_from_json(input) {
                Ok(raw) => promote(raw),
                Err(_) => Err(BatchError::ParseError),
            },
        }
    }
}

fn shape_from_xml(text: &str) -> Result<RawBatch, ShapeError> {
    let root = XmlElement::parse_document(text)?;
    if root.name != BATCH_ELEMENT {
        return Err(ShapeError::UnexpectedRoot(root.name));
    }

    let extra_attrs = root
        .attrs
        .iter()
        .filter(|(name, _)| !MODELED_ATTRS.contains(&name.as_str()))
        .map(|(name, value)| WireAttr::new(name.clone(), value.clone()))
        .collect();
    let submission = root
        .child("EFilingSubmissionXML")
        .map(Submission::from_xml)
        .transpose()?;

    Ok(RawBatch {
        seq_num: root.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default(),
        status_code: root.attr("StatusCode").map(str::to_string),
        total_amount: root.attr_f64("TotalAmount")?.unwrap_or(0.0),
        party_count: root.attr_i64("PartyCount")?.unwrap_or(0),
        activity_count: root.attr_i64("ActivityCount")?.unwrap_or(0),
        account_count: root.attr_i64("AccountCount")?.unwrap_or(0),
        activity_attachment_count: root.attr_i64("ActivityAttachmentCount")?.unwrap_or(0),
        attachment_count: root.attr_i64("AttachmentCount")?.unwrap_or(0),
        jointly_owned_owner_count: root.attr_i64("JointlyOwnedOwnerCount")?.unwrap_or(0),
        no_fi_owner_count: root.attr_i64("NoFIOwnerCount")?.unwrap_or(0),
        consolidated_owner_count: root.attr_i64("ConsolidatedOwnerCount")?.unwrap_or(0),
        extra_attrs,
        form_type_code: root.child_text("FormTypeCode").map(str::to_string),
        records: RawRecords::Xml(root.children_named("Activity").cloned().collect()),
        submission,
    })
}

/// The JSON mirror of the envelope shape; activity entries stay untyped.
#[derive(Deserialize)]
struct RawJsonBatch {
    #[serde(rename = "SeqNum", default)]
    seq_num: SeqNumber,
    #[serde(rename = "StatusCode", default)]
    status_code: Option<String>,
    #[serde(rename = "TotalAmount", default)]
    total_amount: f64,
    #[serde(rename = "PartyCount", default)]
    party_count: i64,
    #[serde(rename = "ActivityCount", default)]
    activity_count: i64,
    #[serde(rename = "AccountCount", default)]
    account_count: i64,
    #[serde(rename = "ActivityAttachmentCount", default)]
    activity_attachment_count: i64,
    #[serde(rename = "AttachmentCount", default)]
    attachment_count: i64,
    #[serde(rename = "JointlyOwnedOwnerCount", default)]
    jointly_owned_owner_count: i64,
    #[serde(rename = "NoFIOwnerCount", default)]
    no_fi_owner_count: i64,
    #[serde(rename = "ConsolidatedOwnerCount", default)]
    consolidated_owner_count: i64,
    #[serde(rename = "Attrs", default)]
    extra_attrs: Vec<WireAttr>,
    #[serde(rename = "FormTypeCode", default)]
    form_type_code: Option<String>,
    #[serde(rename = "Activity", default)]
    activities: Vec<serde_json::Value>,
    #[serde(rename = "EFilingSubmissionXML", default)]
    submission: Option<Submission>,
}

fn shape_from_json(input: &[u8]) -> Result<RawBatch, ShapeError> {
    let raw: RawJsonBatch = serde_json::from_slice(input)?;
    Ok(RawBatch {
        seq_num: raw.seq_num,
        status_code: raw.status_code,
        total_amount: raw.total_amount,
        party_count: raw.party_count,
        activity_count: raw.activity_count,
        account_count: raw.account_count,
        activity_attachment_count: raw.activity_attachment_count,
        attachment_count: raw.attachment_count,
        jointly_owned_owner_count: raw.jointly_owned_owner_count,
        no_fi_owner_count: raw.no_fi_owner_count,
        consolidated_owner_count: raw.consolidated_owner_count,
        extra_attrs: raw.extra_attrs,
        form_type_code: raw.form_type_code,
        records: RawRecords::Json(raw.activities),
        submission: raw.submission,
    })
}

/// Phase two: resolve the record codec and promote every fragment.
fn promote(raw: RawBatch) -> BatchResult<BatchEnvelope> {
    let mut envelope = BatchEnvelope {
        seq_num: raw.seq_num,
        status_code: raw.status_code,
        total_amount: raw.total_amount,
        party_count: raw.party_count,
        activity_count: raw.activity_count,
        account_count: raw.account_count,
        activity_attachment_count: raw.activity_attachment_count,
        attachment_count: raw.attachment_count,
        jointly_owned_owner_count: raw.jointly_owned_owner_count,
        no_fi_owner_count: raw.no_fi_owner_count,
        consolidated_owner_count: raw.consolidated_owner_count,
        extra_attrs: raw.extra_attrs,
        form_type_code: raw.form_type_code,
        activities: Vec::new(),
        submission: raw.submission,
    };

    let code = envelope.form_type_code.clone().unwrap_or_default();
    match raw.records {
        RawRecords::Xml(fragments) => {
            if !fragments.is_empty() {
                let codec = registry::resolve(&code)
                    .ok_or_else(|| BatchError::UnknownDiscriminator { code: code.clone() })?;
                for (index, fragment) in fragments.iter().enumerate() {
                    let activity = (codec.decode_xml)(fragment).map_err(|e| {
                        BatchError::InvalidActivity {
                            index,
                            code: code.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    envelope.activities.push(activity);
                }
            }
        }
        RawRecords::Json(values) => {
            if !values.is_empty() {
                let codec = registry::resolve(&code)
                    .ok_or_else(|| BatchError::UnknownDiscriminator { code: code.clone() })?;
                for (index, value) in values.into_iter().enumerate() {
                    let activity = (codec.decode_json)(value).map_err(|e| {
                        BatchError::InvalidActivity {
                            index,
                            code: code.clone(),
                            reason: e.to_string(),
                        }
                    })?;
                    envelope.activities.push(activity);
                }
            }
        }
    }

    Ok(envelope)
}
