//! # Aggregate Attribute Reconciliation
//!
//! The nine count/amount attributes on the envelope summarize the record
//! set under per-family business rules. Computation is a pure function of
//! the form type and the records; amounts are summed in record order so
//! repeated runs over the same set produce bit-identical totals.
//!
//! Two call modes: **generate** assigns the computed bundle onto the
//! envelope before serialization; **verify** compares the stored bundle
//! field by field and reports the first mismatch by name.
//!
//! ## Party classifier rules
//!
//! | family | counted classifiers |
//! |--------|---------------------|
//! | 8300X  | 16, 23, 4, 3, 8     |
//! | DOEPX  | 3, 11, 12, 45       |
//! | CTRX   | all parties         |
//! | SARX   | 33 (subjects)       |
//! | FBARX  | 41 (filers), plus 42 → jointly-owned owners and 43/44 → no-financial-interest owners |

use efile_core::FormType;
use efile_forms::{Activity, ActivityRecord};

use crate::envelope::BatchEnvelope;
use crate::error::{BatchError, BatchResult};

const CASH_PAYMENTS_COUNTED_PARTIES: &[&str] = &["16", "23", "4", "3", "8"];
const EXEMPT_DESIGNATION_COUNTED_PARTIES: &[&str] = &["3", "11", "12", "45"];
const SAR_SUBJECT_PARTIES: &[&str] = &["33"];
const FBAR_FILER_PARTIES: &[&str] = &["41"];
const FBAR_JOINT_OWNER_PARTIES: &[&str] = &["42"];
const FBAR_NO_FI_OWNER_PARTIES: &[&str] = &["43", "44"];

/// The aggregate attribute field names, in verification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountField {
    /// Number of activity records.
    ActivityCount,
    /// Total account entries.
    AccountCount,
    /// Sum of record amounts.
    TotalAmount,
    /// Filtered party count.
    PartyCount,
    /// Attachments recorded on activities.
    ActivityAttachmentCount,
    /// Attachment files in the batch.
    AttachmentCount,
    /// Jointly-owned account owners.
    JointlyOwnedOwnerCount,
    /// Owners with no financial interest.
    NoFiOwnerCount,
    /// Consolidated report owners.
    ConsolidatedOwnerCount,
}

impl std::fmt::Display for CountField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ActivityCount => "ActivityCount",
            Self::AccountCount => "AccountCount",
            Self::TotalAmount => "TotalAmount",
            Self::PartyCount => "PartyCount",
            Self::ActivityAttachmentCount => "ActivityAttachmentCount",
            Self::AttachmentCount => "AttachmentCount",
            Self::JointlyOwnedOwnerCount => "JointlyOwnedOwnerCount",
            Self::NoFiOwnerCount => "NoFIOwnerCount",
            Self::ConsolidatedOwnerCount => "ConsolidatedOwnerCount",
        };
        f.write_str(s)
    }
}

/// The nine-field aggregate bundle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeSummary {
    /// Sum of every record's total amount.
    pub total_amount: f64,
    /// Filtered party count.
    pub party_count: i64,
    /// Number of activity records.
    pub activity_count: i64,
    /// Total account entries across foreign-accounts records.
    pub account_count: i64,
    /// Attachments recorded on activities.
    pub activity_attachment_count: i64,
    /// Attachment files in the batch.
    pub attachment_count: i64,
    /// Parties with classifier 42.
    pub jointly_owned_owner_count: i64,
    /// Parties with classifiers 43 or 44.
    pub no_fi_owner_count: i64,
    /// Consolidated report owners.
    pub consolidated_owner_count: i64,
}

impl AttributeSummary {
    /// Compute the bundle for a record set under the given form family's
    /// rules.
    ///
    /// Pure and deterministic; records are visited in order and never
    /// reordered. With no recognized form family only the record count
    /// and amount total are computable — the classifier filters are
    /// family properties.
    pub fn compute(form_type: Option<FormType>, records: &[Activity]) -> Self {
        let mut summary = Self {
            activity_count: records.len() as i64,
            ..Self::default()
        };

        for record in records {
            summary.total_amount += record.total_amount();

            let Some(form_type) = form_type else {
                continue;
            };
            match form_type {
                FormType::CashPayments => {
                    summary.party_count += record.party_count(CASH_PAYMENTS_COUNTED_PARTIES);
                }
                FormType::ExemptDesignation => {
                    summary.party_count += record.party_count(EXEMPT_DESIGNATION_COUNTED_PARTIES);
                }
                FormType::CurrencyTransaction => {
                    summary.party_count += record.party_count(&[]);
                }
                FormType::SuspiciousActivity => {
                    summary.party_count += record.party_count(SAR_SUBJECT_PARTIES);
                }
                FormType::ForeignAccounts => {
                    summary.party_count += record.party_count(FBAR_FILER_PARTIES);
                    if let Activity::ForeignAccounts(activity) = record {
                        summary.account_count += activity.accounts.len() as i64;
                    }
                    summary.jointly_owned_owner_count +=
                        record.party_count(FBAR_JOINT_OWNER_PARTIES);
                    summary.no_fi_owner_count += record.party_count(FBAR_NO_FI_OWNER_PARTIES);
                }
            }
        }

        summary
    }
}

impl BatchEnvelope {
    /// The bundle computed from this envelope's records.
    pub fn computed_summary(&self) -> AttributeSummary {
        AttributeSummary::compute(self.form_type(), &self.activities)
    }

    /// The bundle currently stored on the envelope.
    pub fn stored_summary(&self) -> AttributeSummary {
        AttributeSummary {
            total_amount: self.total_amount,
            party_count: self.party_count,
            activity_count: self.activity_count,
            account_count: self.account_count,
            activity_attachment_count: self.activity_attachment_count,
            attachment_count: self.attachment_count,
            jointly_owned_owner_count: self.jointly_owned_owner_count,
            no_fi_owner_count: self.no_fi_owner_count,
            consolidated_owner_count: self.consolidated_owner_count,
        }
    }

    /// Generate mode: assign the computed bundle onto the envelope.
    pub fn generate_attributes(&mut self) {
        let summary = self.computed_summary();
        self.total_amount = summary.total_amount;
        self.party_count = summary.party_count;
        self.activity_count = summary.activity_count;
        self.account_count = summary.account_count;
        self.activity_attachment_count = summary.activity_attachment_count;
        self.attachment_count = summary.attachment_count;
        self.jointly_owned_owner_count = summary.jointly_owned_owner_count;
        self.no_fi_owner_count = summary.no_fi_owner_count;
        self.consolidated_owner_count = summary.consolidated_owner_count;
    }

    /// Verify mode: compare the stored bundle against the computed one,
    /// field by field in a fixed order. The first mismatch is returned as
    /// a [`BatchError::CountMismatch`] naming the field.
    pub fn verify_attributes(&self) -> BatchResult<()> {
        let stored = self.stored_summary();
        let computed = self.computed_summary();

        let count_checks = [
            (CountField::ActivityCount, stored.activity_count, computed.activity_count),
            (CountField::AccountCount, stored.account_count, computed.account_count),
        ];
        for (field, stored_value, computed_value) in count_checks {
            check_count(field, stored_value, computed_value)?;
        }

        if stored.total_amount != computed.total_amount {
            return Err(BatchError::CountMismatch {
                field: CountField::TotalAmount,
                stored: format!("{}", stored.total_amount),
                computed: format!("{}", computed.total_amount),
            });
        }

        let count_checks = [
            (CountField::PartyCount, stored.party_count, computed.party_count),
            (
                CountField::ActivityAttachmentCount,
                stored.activity_attachment_count,
                computed.activity_attachment_count,
            ),
            (CountField::AttachmentCount, stored.attachment_count, computed.attachment_count),
            (
                CountField::JointlyOwnedOwnerCount,
                stored.jointly_owned_owner_count,
                computed.jointly_owned_owner_count,
            ),
            (CountField::NoFiOwnerCount, stored.no_fi_owner_count, computed.no_fi_owner_count),
            (
                CountField::ConsolidatedOwnerCount,
                stored.consolidated_owner_count,
                computed.consolidated_owner_count,
            ),
        ];
        for (field, stored_value, computed_value) in count_checks {
            check_count(field, stored_value, computed_value)?;
        }

        Ok(())
    }
}

fn check_count(field: CountField, stored: i64, computed: i64) -> BatchResult<()> {
    if stored != computed {
        return Err(BatchError::CountMismatch {
            field,
            stored: stored.to_string(),
            computed: computed.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use efile_core::SeqNumber;
    use efile_forms::foreign_accounts::AccountType;
    use efile_forms::party::Party;
    use efile_forms::{
        cash_payments, currency_transaction, exempt_designation, foreign_accounts,
        suspicious_activity,
    };

    fn ctr(amount: f64, party_codes: &[&str]) -> Activity {
        Activity::CurrencyTransaction(currency_transaction::ActivityType {
            seq_num: SeqNumber::UNASSIGNED,
            total_transaction_amount: amount,
            parties: party_codes.iter().map(|c| Party::with_code(*c)).collect(),
        })
    }

    #[test]
    fn test_ctr_counts_every_party() {
        // Two records, 100.0 and 3 unfiltered parties each.
        let records = vec![ctr(100.0, &["35", "50", "8"]), ctr(100.0, &["35", "50", "8"])];
        let summary = AttributeSummary::compute(Some(FormType::CurrencyTransaction), &records);
        assert_eq!(summary.total_amount, 200.0);
        assert_eq!(summary.activity_count, 2);
        assert_eq!(summary.party_count, 6);
    }

    #[test]
    fn test_cash_payments_filter() {
        let record = Activity::CashPayments(cash_payments::ActivityType {
            seq_num: SeqNumber::UNASSIGNED,
            total_cash_received: 12000.0,
            parties: ["16", "23", "4", "3", "8", "99"]
                .iter()
                .map(|c| Party::with_code(*c))
                .collect(),
        });
        let summary = AttributeSummary::compute(Some(FormType::CashPayments), &[record]);
        assert_eq!(summary.party_count, 5);
        assert_eq!(summary.total_amount, 12000.0);
    }

    #[test]
    fn test_exempt_designation_filter_and_zero_amount() {
        let record = Activity::ExemptDesignation(exempt_designation::ActivityType {
            seq_num: SeqNumber::UNASSIGNED,
            parties: ["3", "11", "12", "45", "45", "7"]
                .iter()
                .map(|c| Party::with_code(*c))
                .collect(),
        });
        let summary = AttributeSummary::compute(Some(FormType::ExemptDesignation), &[record]);
        assert_eq!(summary.party_count, 5);
        assert_eq!(summary.total_amount, 0.0);
    }

    #[test]
    fn test_sar_counts_subjects_only() {
        let record = Activity::SuspiciousActivity(suspicious_activity::ActivityType {
            seq_num: SeqNumber::UNASSIGNED,
            total_suspicious_amount: 800.0,
            parties: ["33", "33", "35"].iter().map(|c| Party::with_code(*c)).collect(),
        });
        let summary = AttributeSummary::compute(Some(FormType::SuspiciousActivity), &[record]);
        assert_eq!(summary.party_count, 2);
    }

    #[test]
    fn test_fbar_account_and_owner_counts_sum_across_records() {
        let record = |accounts: usize| {
            Activity::ForeignAccounts(foreign_accounts::ActivityType {
                seq_num: SeqNumber::UNASSIGNED,
                parties: ["41", "42", "43", "44"]
                    .iter()
                    .map(|c| Party::with_code(*c))
                    .collect(),
                accounts: (0..accounts)
                    .map(|_| AccountType {
                        seq_num: SeqNumber::UNASSIGNED,
                        maximum_value: Some(1000.0),
                    })
                    .collect(),
            })
        };
        let records = vec![record(2), record(3)];
        let summary = AttributeSummary::compute(Some(FormType::ForeignAccounts), &records);
        assert_eq!(summary.account_count, 5);
        assert_eq!(summary.party_count, 2);
        assert_eq!(summary.jointly_owned_owner_count, 2);
        assert_eq!(summary.no_fi_owner_count, 4);
        assert_eq!(summary.total_amount, 5000.0);
    }

    #[test]
    fn test_unknown_form_computes_base_counts_only() {
        let records = vec![ctr(50.0, &["35"])];
        let summary = AttributeSummary::compute(None, &records);
        assert_eq!(summary.activity_count, 1);
        assert_eq!(summary.total_amount, 50.0);
        assert_eq!(summary.party_count, 0);
    }

    #[test]
    fn test_generate_then_verify_round_trip() {
        let mut batch = crate::envelope::BatchEnvelope::report(FormType::CurrencyTransaction);
        batch.append_activity(ctr(100.0, &["35", "50", "8"])).unwrap();
        batch.append_activity(ctr(100.0, &["35", "50", "8"])).unwrap();

        batch.generate_attributes();
        assert_eq!(batch.total_amount, 200.0);
        assert_eq!(batch.activity_count, 2);
        assert_eq!(batch.party_count, 6);
        batch.verify_attributes().unwrap();
    }

    #[test]
    fn test_verify_names_the_mismatching_field() {
        let mut batch = crate::envelope::BatchEnvelope::report(FormType::CurrencyTransaction);
        batch.append_activity(ctr(100.0, &["35", "50", "8"])).unwrap();
        batch.append_activity(ctr(100.0, &["35", "50", "8"])).unwrap();
        batch.generate_attributes();

        batch.party_count = 5;
        match batch.verify_attributes().unwrap_err() {
            BatchError::CountMismatch { field, stored, computed } => {
                assert_eq!(field, CountField::PartyCount);
                assert_eq!(stored, "5");
                assert_eq!(computed, "6");
            }
            other => panic!("expected CountMismatch, got: {other}"),
        }
    }

    #[test]
    fn test_verify_checks_amount() {
        let mut batch = crate::envelope::BatchEnvelope::report(FormType::CurrencyTransaction);
        batch.append_activity(ctr(75.5, &[])).unwrap();
        batch.generate_attributes();
        batch.total_amount = 75.0;
        match batch.verify_attributes().unwrap_err() {
            BatchError::CountMismatch { field, .. } => {
                assert_eq!(field, CountField::TotalAmount);
            }
            other => panic!("expected CountMismatch, got: {other}"),
        }
    }

    #[test]
    fn test_verify_on_pristine_empty_envelope_passes() {
        let batch = crate::envelope::BatchEnvelope::report(FormType::SuspiciousActivity);
        batch.verify_attributes().unwrap();
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use efile_core::SeqNumber;
    use efile_forms::party::Party;
    use efile_forms::{currency_transaction, suspicious_activity};
    use proptest::prelude::*;

    fn party_codes() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[0-9]{1,2}", 0..6)
    }

    fn amounts() -> impl Strategy<Value = f64> {
        // Whole-cent amounts keep float sums exact.
        (0u32..10_000_000).prop_map(|cents| f64::from(cents) / 100.0)
    }

    fn ctr_records() -> impl Strategy<Value = Vec<Activity>> {
        prop::collection::vec(
            (amounts(), party_codes()).prop_map(|(amount, codes)| {
                Activity::CurrencyTransaction(currency_transaction::ActivityType {
                    seq_num: SeqNumber::UNASSIGNED,
                    total_transaction_amount: amount,
                    parties: codes.into_iter().map(Party::with_code).collect(),
                })
            }),
            1..8,
        )
    }

    fn sar_records() -> impl Strategy<Value = Vec<Activity>> {
        prop::collection::vec(
            (amounts(), party_codes()).prop_map(|(amount, codes)| {
                Activity::SuspiciousActivity(suspicious_activity::ActivityType {
                    seq_num: SeqNumber::UNASSIGNED,
                    total_suspicious_amount: amount,
                    parties: codes.into_iter().map(Party::with_code).collect(),
                })
            }),
            1..8,
        )
    }

    proptest! {
        /// Verify mode always accepts a bundle produced by generate mode.
        #[test]
        fn generate_verify_round_trip_ctr(records in ctr_records()) {
            let mut batch = crate::envelope::BatchEnvelope::report(FormType::CurrencyTransaction);
            batch.activities = records;
            batch.generate_attributes();
            prop_assert!(batch.verify_attributes().is_ok());
        }

        /// Same round trip under a filtered-count family.
        #[test]
        fn generate_verify_round_trip_sar(records in sar_records()) {
            let mut batch = crate::envelope::BatchEnvelope::report(FormType::SuspiciousActivity);
            batch.activities = records;
            batch.generate_attributes();
            prop_assert!(batch.verify_attributes().is_ok());
        }

        /// Computation is deterministic over the same record set.
        #[test]
        fn compute_is_deterministic(records in ctr_records()) {
            let a = AttributeSummary::compute(Some(FormType::CurrencyTransaction), &records);
            let b = AttributeSummary::compute(Some(FormType::CurrencyTransaction), &records);
            prop_assert_eq!(a, b);
        }

        /// The record count never depends on the form family.
        #[test]
        fn activity_count_is_family_independent(records in ctr_records()) {
            let n = records.len() as i64;
            for form in FormType::ALL {
                let summary = AttributeSummary::compute(Some(form), &records);
                prop_assert_eq!(summary.activity_count, n);
            }
        }
    }
}
