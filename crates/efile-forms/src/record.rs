//! # The Record Capability and the Sealed Activity Type
//!
//! Every compliance record family satisfies the same small contract: it
//! knows its own form type, its total monetary amount, and how to count
//! its parties under a classifier filter. The batch aggregator is written
//! entirely against this contract.
//!
//! `Activity` seals the five families into one variant type. It
//! serializes untagged — the discriminator lives on the batch envelope,
//! never on the record — and deliberately does **not** implement
//! `Deserialize`: decoding a record requires the envelope's form type and
//! goes through [`crate::registry::resolve`].

use serde::Serialize;

use efile_core::{FieldValidate, FieldViolation, FormType, SeqNumber, XmlElement};

use crate::error::{FormError, FormResult};
use crate::{
    cash_payments, currency_transaction, exempt_designation, foreign_accounts,
    suspicious_activity,
};

/// The contract every compliance record satisfies.
pub trait ActivityRecord {
    /// The form family this record belongs to.
    fn form_type(&self) -> FormType;

    /// The record's total monetary amount.
    fn total_amount(&self) -> f64;

    /// Count of this record's parties whose classifier is in `type_codes`;
    /// an empty set counts all parties.
    fn party_count(&self, type_codes: &[&str]) -> i64;
}

/// One activity record, concretely typed by form family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Activity {
    /// 8300X record.
    CashPayments(cash_payments::ActivityType),
    /// DOEPX record.
    ExemptDesignation(exempt_designation::ActivityType),
    /// CTRX record.
    CurrencyTransaction(currency_transaction::ActivityType),
    /// SARX record.
    SuspiciousActivity(suspicious_activity::ActivityType),
    /// FBARX record.
    ForeignAccounts(foreign_accounts::ActivityType),
}

impl Activity {
    /// The record's own tree sequence number.
    pub fn seq_num(&self) -> SeqNumber {
        match self {
            Self::CashPayments(a) => a.seq_num,
            Self::ExemptDesignation(a) => a.seq_num,
            Self::CurrencyTransaction(a) => a.seq_num,
            Self::SuspiciousActivity(a) => a.seq_num,
            Self::ForeignAccounts(a) => a.seq_num,
        }
    }

    /// Render as an `Activity` element.
    pub fn to_xml(&self) -> XmlElement {
        match self {
            Self::CashPayments(a) => a.to_xml(),
            Self::ExemptDesignation(a) => a.to_xml(),
            Self::CurrencyTransaction(a) => a.to_xml(),
            Self::SuspiciousActivity(a) => a.to_xml(),
            Self::ForeignAccounts(a) => a.to_xml(),
        }
    }
}

impl ActivityRecord for Activity {
    fn form_type(&self) -> FormType {
        match self {
            Self::CashPayments(a) => a.form_type(),
            Self::ExemptDesignation(a) => a.form_type(),
            Self::CurrencyTransaction(a) => a.form_type(),
            Self::SuspiciousActivity(a) => a.form_type(),
            Self::ForeignAccounts(a) => a.form_type(),
        }
    }

    fn total_amount(&self) -> f64 {
        match self {
            Self::CashPayments(a) => a.total_amount(),
            Self::ExemptDesignation(a) => a.total_amount(),
            Self::CurrencyTransaction(a) => a.total_amount(),
            Self::SuspiciousActivity(a) => a.total_amount(),
            Self::ForeignAccounts(a) => a.total_amount(),
        }
    }

    fn party_count(&self, type_codes: &[&str]) -> i64 {
        match self {
            Self::CashPayments(a) => a.party_count(type_codes),
            Self::ExemptDesignation(a) => a.party_count(type_codes),
            Self::CurrencyTransaction(a) => a.party_count(type_codes),
            Self::SuspiciousActivity(a) => a.party_count(type_codes),
            Self::ForeignAccounts(a) => a.party_count(type_codes),
        }
    }
}

impl FieldValidate for Activity {
    fn validate_fields(&self) -> Result<(), FieldViolation> {
        match self {
            Self::CashPayments(a) => a.validate_fields(),
            Self::ExemptDesignation(a) => a.validate_fields(),
            Self::CurrencyTransaction(a) => a.validate_fields(),
            Self::SuspiciousActivity(a) => a.validate_fields(),
            Self::ForeignAccounts(a) => a.validate_fields(),
        }
    }
}

/// The `SeqNum` attribute of an activity element, unassigned when absent.
pub(crate) fn activity_seq(element: &XmlElement) -> FormResult<SeqNumber> {
    Ok(element.attr_u64("SeqNum")?.map(SeqNumber).unwrap_or_default())
}

/// An optional monetary element: absent decodes as zero, present must
/// parse as a number.
pub(crate) fn optional_amount(element: &XmlElement, name: &'static str) -> FormResult<f64> {
    match element.child_text(name) {
        None => Ok(0.0),
        Some(raw) => raw.trim().parse::<f64>().map_err(|_| FormError::InvalidValue {
            element: name,
            value: raw.to_string(),
        }),
    }
}

/// Amount elements render without a trailing `.0` for whole values,
/// matching the attribute formatting on the envelope.
pub(crate) fn format_amount(value: f64) -> String {
    format!("{value}")
}
