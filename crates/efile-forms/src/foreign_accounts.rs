//! # Foreign Account Records (FBARX)
//!
//! Reports of foreign bank and financial accounts. This is the richest
//! family for aggregation: beyond the filtered party counts it feeds the
//! envelope's account count (every `Account` entry across all records)
//! and the jointly-owned / no-financial-interest owner counts (party
//! classifiers 42, 43, 44).

use serde::{Deserialize, Serialize};

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::{FormError, FormResult};
use crate::party::{count_matching, parties_from_xml, Party};
use crate::record::{activity_seq, format_amount, ActivityRecord};

/// One reported foreign account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Maximum value of the account during the reporting period, when known.
    #[serde(
        rename = "AccountMaximumValueAmount",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub maximum_value: Option<f64>,
}

impl AccountType {
    /// Decode an `Account` element.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        let maximum_value = match element.child_text("AccountMaximumValueAmount") {
            None => None,
            Some(raw) => Some(raw.trim().parse::<f64>().map_err(|_| {
                FormError::InvalidValue {
                    element: "AccountMaximumValueAmount",
                    value: raw.to_string(),
                }
            })?),
        };
        Ok(Self {
            seq_num: element.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default(),
            maximum_value,
        })
    }

    /// Render as an `Account` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("Account").with_attr("SeqNum", self.seq_num.to_string());
        if let Some(value) = self.maximum_value {
            element.push_child(
                XmlElement::new("AccountMaximumValueAmount").with_text(format_amount(value)),
            );
        }
        element
    }
}

/// A foreign accounts activity record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityType {
    /// Tree sequence number.
    #[serde(rename = "SeqNum", default)]
    pub seq_num: SeqNumber,
    /// Filer and owner parties.
    #[serde(rename = "Party", default, skip_serializing_if = "Vec::is_empty")]
    pub parties: Vec<Party>,
    /// The reported accounts.
    #[serde(rename = "Account", default, skip_serializing_if = "Vec::is_empty")]
    pub accounts: Vec<AccountType>,
}

impl ActivityType {
    /// Decode an `Activity` fragment as a foreign accounts record.
    pub fn from_xml(element: &XmlElement) -> FormResult<Self> {
        Ok(Self {
            seq_num: activity_seq(element)?,
            parties: parties_from_xml(element)?,
            accounts: element
                .children_named("Account")
                .map(AccountType::from_xml)
                .collect::<FormResult<Vec<_>>>()?,
        })
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        let mut element =
            XmlElement::new("Activity").with_attr("SeqNum", self.seq_num.to_string());
        for party in &self.parties {
            element.push_child(party.to_xml());
        }
        for account in &self.accounts {
            element.push_child(account.to_xml());
        }
        element
    }
}

impl ActivityRecord for ActivityType {
    fn form_type(&self) -> FormType {
        FormType::ForeignAccounts
    }

    /// Sum of the known account maxima, in account order.
    fn total_amount(&self) -> f64 {
        self.accounts
            .iter()
            .filter_map(|a| a.maximum_value)
            .sum()
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        count_matching(&self.parties, type_codes)
    }
}

impl FieldValidate for ActivityType {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        for account in &self.accounts {
            if let Some(value) = account.maximum_value {
                if !value.is_finite() || value < 0.0 {
                    return Err(FieldViolation::new(
                        "AccountMaximumValueAmount",
                        "must be a finite, non-negative amount",
                    ));
                }
            }
        }
        efile_core::validate::validate_all(&self.parties)
    }
}
