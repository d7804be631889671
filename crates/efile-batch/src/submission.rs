//! # Acknowledgment Subtree
//!
//! When the receiving authority processes a filing it returns the batch
//! in the acknowledgment state: the original records are replaced by a
//! three-level ownership chain — submission → acknowledged activity →
//! error description. Each level is exclusively owned by its parent.
//!
//! The subtree is not polymorphic, so unlike activity records it decodes
//! entirely in phase one of the batch decode.

use serde::{Deserialize, Serialize};

use efile_core::{
    BoundedText, BsaId, FieldValidate, FieldViolation, SeqNumber, Text4000, Text50, Text512,
    Text525, XmlElement,
};
use efile_forms::error::{FormError, FormResult};

/// The acknowledgment tree returned by the receiving authority.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Processing status reported by the authority.
    #[serde(rename = "StatusCode", default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<String>,
    /// Acknowledged activities, one per original record.
    #[serde(rename = "EFilingActivityXML", default, skip_serializing_if = "Vec::is_empty")]
    pub activities: Vec<SubmissionActivity>,
}

/// One acknowledged activity with its tracking identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionActivity {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Tracking identifier the authority assigned to the filing.
    #[serde(rename = "BSAID", default, skip_serializing_if = "Option::is_none")]
    pub bsa_id: Option<BsaId>,
    /// Structured error descriptions, possibly empty.
    #[serde(
        rename = "EFilingActivityErrorXML",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<SubmissionActivityError>,
}

/// One processing error description. All fields are independently
/// optional; the authority fills in whatever context it has.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionActivityError {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Excerpt of the input surrounding the error.
    #[serde(rename = "ErrorContextText", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Text4000>,
    /// Wire name of the element in error.
    #[serde(
        rename = "ErrorElementNameText",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub element_name: Option<Text512>,
    /// Severity level.
    #[serde(rename = "ErrorLevelText", default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Text50>,
    /// Human-readable error message.
    #[serde(rename = "ErrorText", default, skip_serializing_if = "Option::is_none")]
    pub text: Option<Text525>,
    /// Authority-defined error type code.
    #[serde(rename = "ErrorTypeCode", default, skip_serializing_if = "Option::is_none")]
    pub type_code: Option<Text50>,
}

fn bounded_text<const MAX: usize>(
    element: &XmlElement,
    name: &'static str,
) -> FormResult<Option<BoundedText<MAX>>> {
    element
        .child_text(name)
        .map(|raw| BoundedText::new(raw).map_err(|source| FormError::Text { element: name, source }))
        .transpose()
}

impl Submission {
    /// Decode an `EFilingSubmissionXML` element.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: element.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default(),
            status_code: element.attr("StatusCode").map(str::to_string),
            activities: element
                .children_named("EFilingActivityXML")
                .map(SubmissionActivity::from_xml)
                .collect::<FormResult<Vec<_>>>()?,
        })
    }

    /// Render as an `EFilingSubmissionXML` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("EFilingSubmissionXML").with_attr("SeqNum", self.seq_num.to_string());
        if let Some(status) = &self.status_code {
            element.push_attr("StatusCode", status);
        }
        for activity in &self.activities {
            element.push_child(activity.to_xml());
        }
        element
    }
}

impl SubmissionActivity {
    /// Decode an `EFilingActivityXML` element.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        let bsa_id = element
            .child_text("BSAID")
            .map(|raw| BsaId::new(raw).map_err(|source| FormError::Text { element: "BSAID", source }))
            .transpose()?;
        Ok(Self {
            seq_num: element.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default(),
            bsa_id,
            errors: element
                .children_named("EFilingActivityErrorXML")
                .map(SubmissionActivityError::from_xml)
                .collect::<FormResult<Vec<_>>>()?,
        })
    }

    /// Render as an `EFilingActivityXML` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("EFilingActivityXML").with_attr("SeqNum", self.seq_num.to_string());
        if let Some(id) = &self.bsa_id {
            element.push_child(XmlElement::new("BSAID").with_text(id.as_str()));
        }
        for error in &self.errors {
            element.push_child(error.to_xml());
        }
        element
    }
}

impl SubmissionActivityError {
    /// Decode an `EFilingActivityErrorXML` element.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: element.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default(),
            context: bounded_text(element, "ErrorContextText")?,
            element_name: bounded_text(element, "ErrorElementNameText")?,
            level: bounded_text(element, "ErrorLevelText")?,
            text: bounded_text(element, "ErrorText")?,
            type_code: bounded_text(element, "ErrorTypeCode")?,
        })
    }

    /// Render as an `EFilingActivityErrorXML` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("EFilingActivityErrorXML")
            .with_attr("SeqNum", self.seq_num.to_string());
        let mut push = |name: &str, value: Option<&str>| {
            if let Some(value) = value {
                element.push_child(XmlElement::new(name).with_text(value));
            }
        };
        push("ErrorContextText", self.context.as_ref().map(|t| t.as_str()));
        push(
            "ErrorElementNameText",
            self.element_name.as_ref().map(|t| t.as_str()),
        );
        push("ErrorLevelText", self.level.as_ref().map(|t| t.as_str()));
        push("ErrorText", self.text.as_ref().map(|t| t.as_str()));
        push("ErrorTypeCode", self.type_code.as_ref().map(|t| t.as_str()));
        element
    }
}

impl FieldValidate for Submission {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        efile_core::validate::validate_all(&self.activities)
    }
}

impl FieldValidate for SubmissionActivity {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        if self.bsa_id.is_none() {
            return Err(FieldViolation::new("BSAID", "tracking identifier is required"));
        }
        Ok(())
    }
}
