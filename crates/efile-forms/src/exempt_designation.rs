//! # Exempt Designation Records (DOEPX)
//!
//! Designation of exempt person filings. These carry no monetary amount;
//! the record is the designation itself plus the parties it names.

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::FormResult;
use crate::party::{count_matching, parties_from_xml, Party};
use crate::record::{activity_seq, ActivityRecord};

/// An exempt designation activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Parties named by the designation.
    #[serde(rename = "Party", default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
}

impl ActivityType {
    /// Decode an `Activity` fragment as an exempt designation record.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: activity_seq(element)?,
            parties: parties_from_xml(element)?,
        })
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("Activity").with_attr("SeqNum", self.seq_num.to_string());
        for party in &self.parties {
            element.push_child(party.to_xml());
        }
        element
    }
}

impl ActivityRecord for ActivityType {
    fn form_type(&self) -> FormType {
        FormType::ExemptDesignation
    }

    // Exempt designations report no money movement.
    fn total_amount(&self) -> f64 {
        0.0
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        count_matching(&self.parties, type_codes)
    }
}

impl FieldValidate for ActivityType {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        efile_core::validate::validate_all(&self.parties)
    }
}
