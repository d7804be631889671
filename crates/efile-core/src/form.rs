//! # Form Type Discriminator
//!
//! The closed set of form type codes a batch can carry. The code lives on
//! the batch envelope, one level above the records it types — a record
//! never declares its own concrete schema on the wire.
//!
//! ## Design
//!
//! One enum, five variants, exhaustive `match` everywhere. Adding a form
//! family forces every consumer (aggregation rules, registry, CLI) to
//! handle it. Unrecognized codes are kept as plain strings by callers and
//! rejected at validation time, not at parse time.

use serde::{Deserialize, Serialize};

/// The five form families a report batch can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormType {
    /// Report of cash payments over $10,000 (8300).
    #[serde(rename = "8300X")]
    CashPayments,
    /// Designation of exempt person (DOEP).
    #[serde(rename = "DOEPX")]
    ExemptDesignation,
    /// Currency transaction report (CTR).
    #[serde(rename = "CTRX")]
    CurrencyTransaction,
    /// Suspicious activity report (SAR).
    #[serde(rename = "SARX")]
    SuspiciousActivity,
    /// Report of foreign bank and financial accounts (FBAR).
    #[serde(rename = "FBARX")]
    ForeignAccounts,
}

impl FormType {
    /// All form types, in wire-code order used throughout the stack.
    pub const ALL: [FormType; 5] = [
        FormType::CurrencyTransaction,
        FormType::SuspiciousActivity,
        FormType::ExemptDesignation,
        FormType::ForeignAccounts,
        FormType::CashPayments,
    ];

    /// The wire code carried in the envelope's `FormTypeCode` element.
    pub fn code(&self) -> &'static str {
        match self {
            Self::CashPayments => "8300X",
            Self::ExemptDesignation => "DOEPX",
            Self::CurrencyTransaction => "CTRX",
            Self::SuspiciousActivity => "SARX",
            Self::ForeignAccounts => "FBARX",
        }
    }

    /// Resolve a wire code to a form type. Returns `None` for anything
    /// outside the closed set.
    pub fn from_code(code: &str) -> Option<FormType> {
        match code {
            "8300X" => Some(Self::CashPayments),
            "DOEPX" => Some(Self::ExemptDesignation),
            "CTRX" => Some(Self::CurrencyTransaction),
            "SARX" => Some(Self::SuspiciousActivity),
            "FBARX" => Some(Self::ForeignAccounts),
            _ => None,
        }
    }

    /// Whether `code` is one of the five recognized wire codes.
    pub fn is_valid_code(code: &str) -> bool {
        Self::from_code(code).is_some()
    }
}

impl std::fmt::Display for FormType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
