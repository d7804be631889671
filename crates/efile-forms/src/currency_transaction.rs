//! # Currency Transaction Records (CTRX)
//!
//! One currency transaction report: the aggregate transaction amount and
//! the parties involved. The envelope-level party count for this family
//! counts *every* party — it is the only family with no classifier
//! filter.

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::FormResult;
use crate::party::{count_matching, parties_from_xml, Party};
use crate::record::{activity_seq, format_amount, optional_amount, ActivityRecord};

/// A currency transaction activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Aggregate amount of the reported transactions.
    #[serde(rename = "TotalTransactionAmount", default)]
    pub total_transaction_amount: f64,
    /// Parties to the transactions.
    #[serde(rename = "Party", default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
}

impl ActivityType {
    /// Decode an `Activity` fragment as a currency transaction record.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: activity_seq(element)?,
            total_transaction_amount: optional_amount(element, "TotalTransactionAmount")?,
            parties: parties_from_xml(element)?,
        })
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("Activity").with_attr("SeqNum", self.seq_num.to_string());
        if self.total_transaction_amount != 0.0 {
            element.push_child(
                XmlElement::new("TotalTransactionAmount")
                    .with_text(format_amount(self.total_transaction_amount)),
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
        FormType::CurrencyTransaction
    }

    fn total_amount(&self) -> f64 {
        self.total_transaction_amount
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        count_matching(&self.parties, type_codes)
    }
}

impl FieldValidate for ActivityType {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        if !self.total_transaction_amount.is_finite() || self.total_transaction_amount < 0.0 {
            return Err(FieldViolation::new(
                "TotalTransactionAmount",
                "must be a finite, non-negative amount",
            ));
        }
        efile_core::validate::validate_all(&self.parties)
    }
}
