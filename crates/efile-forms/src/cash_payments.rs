//! # Cash Payment Records (8300X)
//!
//! Reports of cash payments over $10,000 received in a trade or business.

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::FormResult;
use crate::party::{count_matching, parties_from_xml, Party};
use crate::record::{activity_seq, format_amount, optional_amount, ActivityRecord};

/// A cash payments activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Total cash received across the reported payments.
    #[serde(rename = "TotalCashReceivedAmount", default)]
    pub total_cash_received: f64,
    /// Parties to the payments.
    #[serde(rename = "Party", default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
}

impl ActivityType {
    /// Decode an `Activity` fragment as a cash payments record.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: activity_seq(element)?,
            total_cash_received: optional_amount(element, "TotalCashReceivedAmount")?,
            parties: parties_from_xml(element)?,
        })
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("Activity").with_attr("SeqNum", self.seq_num.to_string());
        if self.total_cash_received != 0.0 {
            element.push_child(
                XmlElement::new("TotalCashReceivedAmount")
                    .with_text(format_amount(self.total_cash_received)),
            );
        }
        for party in &self.parties {
            element.push_child(party.to_xml());
        }
        element
    }
}

impl ActivityRecord for ActivityType {
    fn form_type(&self) -> FormType {
        FormType::CashPayments
    }

    fn total_amount(&self) -> f64 {
        self.total_cash_received
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        count_matching(&self.parties, type_codes)
    }
}

impl FieldValidate for ActivityType {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        if !self.total_cash_received.is_finite() || self.total_cash_received < 0.0 {
            return Err(FieldViolation::new(
                "TotalCashReceivedAmount",
                "must be a finite, non-negative amount",
            ));
        }
        efile_core::validate::validate_all(&self.parties)
    }
}
