//! # Discriminator Registry
//!
//! The immutable table mapping each form type code to the codec for its
//! concrete record type. Built into the binary as a `static`; never
//! mutated, safe for unsynchronized concurrent reads from any number of
//! decode operations.
//!
//! A failed lookup is fatal for the caller — decoding never proceeds with
//! a guessed record type.

use efile_core::{FormType, XmlElement};

use crate::error::FormResult;
use crate::record::Activity;
use crate::{
    cash_payments, currency_transaction, exempt_designation, foreign_accounts,
    suspicious_activity,
};

/// Decode constructors for one form family.
///
/// This is the factory contract of the registry: each entry produces a
/// fully typed record directly from a raw fragment in either wire format.
pub struct RecordCodec {
    /// The family this codec decodes.
    pub form_type: FormType,
    /// Decode an `Activity` XML fragment.
    pub decode_xml: fn(&XmlElement) -> FormResult<Activity>,
    /// Decode a keyed-map activity entry.
    pub decode_json: fn(serde_json::Value) -> FormResult<Activity>,
}

fn cash_payments_xml(element: &XmlElement) -> FormResult<Activity> {
    cash_payments::ActivityType::from_xml(element).map(Activity::CashPayments)
}

fn cash_payments_json(value: serde_json::Value) -> FormResult<Activity> {
    Ok(Activity::CashPayments(serde_json::from_value(value)?))
}

fn exempt_designation_xml(element: &XmlElement) -> FormResult<Activity> {
    exempt_designation::ActivityType::from_xml(element).map(Activity::ExemptDesignation)
}

fn exempt_designation_json(value: serde_json::Value) -> FormResult<Activity> {
    Ok(Activity::ExemptDesignation(serde_json::from_value(value)?))
}

fn currency_transaction_xml(element: &XmlElement) -> FormResult<Activity> {
    currency_transaction::ActivityType::from_xml(element).map(Activity::CurrencyTransaction)
}

fn currency_transaction_json(value: serde_json::Value) -> FormResult<Activity> {
    Ok(Activity::CurrencyTransaction(serde_json::from_value(value)?))
}

fn suspicious_activity_xml(element: &XmlElement) -> FormResult<Activity> {
    suspicious_activity::ActivityType::from_xml(element).map(Activity::SuspiciousActivity)
}

fn suspicious_activity_json(value: serde_json::Value) -> FormResult<Activity> {
    Ok(Activity::SuspiciousActivity(serde_json::from_value(value)?))
}

fn foreign_accounts_xml(element: &XmlElement) -> FormResult<Activity> {
    foreign_accounts::ActivityType::from_xml(element).map(Activity::ForeignAccounts)
}

fn foreign_accounts_json(value: serde_json::Value) -> FormResult<Activity> {
    Ok(Activity::ForeignAccounts(serde_json::from_value(value)?))
}

/// One codec per form family, exactly five entries.
pub static RECORD_CODECS: [RecordCodec; 5] = [
    RecordCodec {
        form_type: FormType::CurrencyTransaction,
        decode_xml: currency_transaction_xml,
        decode_json: currency_transaction_json,
    },
    RecordCodec {
        form_type: FormType::SuspiciousActivity,
        decode_xml: suspicious_activity_xml,
        decode_json: suspicious_activity_json,
    },
    RecordCodec {
        form_type: FormType::ExemptDesignation,
        decode_xml: exempt_designation_xml,
        decode_json: exempt_designation_json,
    },
    RecordCodec {
        form_type: FormType::ForeignAccounts,
        decode_xml: foreign_accounts_xml,
        decode_json: foreign_accounts_json,
    },
    RecordCodec {
        form_type: FormType::CashPayments,
        decode_xml: cash_payments_xml,
        decode_json: cash_payments_json,
    },
];

/// Resolve a form type code to its codec. `None` for any code outside the
/// closed set.
pub fn resolve(code: &str) -> Option<&'static RecordCodec> {
    let form_type = FormType::from_code(code)?;
    RECORD_CODECS.iter().find(|c| c.form_type == form_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::ActivityRecord;

    #[test]
    fn test_every_form_type_resolves() {
        for form in FormType::ALL {
            let codec = resolve(form.code()).expect("registered codec");
            assert_eq!(codec.form_type, form);
        }
    }

    #[test]
    fn test_unknown_code_is_absent() {
        assert!(resolve("BOGUS").is_none());
        assert!(resolve("").is_none());
    }

    #[test]
    fn test_xml_codec_produces_matching_variant() {
        let fragment = XmlElement::new("Activity").with_attr("SeqNum", "1");
        for form in FormType::ALL {
            let codec = resolve(form.code()).unwrap();
            let activity = (codec.decode_xml)(&fragment).unwrap();
            assert_eq!(activity.form_type(), form);
        }
    }

    #[test]
    fn test_json_codec_produces_matching_variant() {
        let fragment = serde_json::json!({ "SeqNum": 1 });
        for form in FormType::ALL {
            let codec = resolve(form.code()).unwrap();
            let activity = (codec.decode_json)(fragment.clone()).unwrap();
            assert_eq!(activity.form_type(), form);
        }
    }
}
