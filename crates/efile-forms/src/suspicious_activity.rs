//! # Suspicious Activity Records (SARX)
//!
//! Suspicious activity reports. The envelope-level party count for this
//! family counts only subjects (classifier 33).

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::FormResult;
use crate::party::{count_matching, parties_from_xml, Party};
use crate::record::{activity_seq, format_amount, optional_amount, ActivityRecord};

/// A suspicious activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Total dollar amount involved in the suspicious activity.
    #[serde(rename = "TotalSuspiciousAmount", default)]
    pub total_suspicious_amount: f64,
    /// Subjects, filers, and other parties to the report.
    #[serde(rename = "Party", default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
}

impl ActivityType {
    /// Decode an `Activity` fragment as a suspicious activity record.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: activity_seq(element)?,
            total_suspicious_amount: optional_amount(element, "TotalSuspiciousAmount")?,
            parties: parties_from_xml(element)?,
        })
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("Activity").with_attr("SeqNum", self.seq_num.to_string());
        if self.total_suspicious_amount != 0.0 {
            element.push_child(
                XmlElement::new("TotalSuspiciousAmount")
                    .with_text(format_amount(self.total_suspicious_amount)),
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
        FormType::SuspiciousActivity
    }

    fn total_amount(&self) -> f64 {
        self.total_suspicious_amount
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        count_matching(&self.parties, type_codes)
    }
}

impl FieldValidate for ActivityType {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        if !self.total_suspicious_amount.is_finite() || self.total_suspicious_amount < 0.0 {
            return Err(FieldViolation::new(
                "TotalSuspiciousAmount",
                "must be a finite, non-negative amount",
            ));
        }
        efile_core::validate::validate_all(&self.parties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_count() {
        let r = ActivityType {
            seq_num: SeqNumber(1),
            total_suspicious_amount: 9000.0,
            parties: vec![
                Party::with_code("33"),
                Party::with_code("33"),
                Party::with_code("35"),
            ],
        };
        assert_eq!(r.party_count(&["33"]), 2);
        assert_eq!(r.party_count(&[]), 3);
    }

    #[test]
    fn test_xml_round_trip() {
        let r = ActivityType {
            seq_num: SeqNumber(7),
            total_suspicious_amount: 1234.56,
            parties: vec![Party::with_code("33")],
        };
        assert_eq!(ActivityType::from_xml(&r.to_xml()).unwrap(), r);
    }
}
