//! # Depth-First Sequencing
//!
//! Assigns unique, monotonically increasing sequence numbers to every
//! element of the envelope tree — the envelope itself, each record with
//! its parties and accounts, and the acknowledgment levels. Invoked on
//! demand (typically right before encoding), never automatically.

use efile_core::SeqNumber;
use efile_forms::Activity;

use crate::envelope::BatchEnvelope;

/// Walk the envelope tree depth-first, numbering from 1.
pub fn assign_sequence_numbers(batch: &mut BatchEnvelope) {
    let mut counter = 0u64;
    let mut next = move || {
        counter += 1;
        SeqNumber(counter)
    };

    batch.seq_num = next();

    for activity in &mut batch.activities {
        match activity {
            Activity::CashPayments(a) => {
                a.seq_num = next();
                for party in &mut a.parties {
                    party.seq_num = next();
                }
            }
            Activity::ExemptDesignation(a) => {
                a.seq_num = next();
                for party in &mut a.parties {
                    party.seq_num = next();
                }
            }
            Activity::CurrencyTransaction(a) => {
                a.seq_num = next();
                for party in &mut a.parties {
                    party.seq_num = next();
                }
            }
            Activity::SuspiciousActivity(a) => {
                a.seq_num = next();
                for party in &mut a.parties {
                    party.seq_num = next();
                }
            }
            Activity::ForeignAccounts(a) => {
                a.seq_num = next();
                for party in &mut a.parties {
                    party.seq_num = next();
                }
                for account in &mut a.accounts {
                    account.seq_num = next();
                }
            }
        }
    }

    if let Some(submission) = &mut batch.submission {
        submission.seq_num = next();
        for activity in &mut submission.activities {
            activity.seq_num = next();
            for error in &mut activity.errors {
                error.seq_num = next();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use efile_core::{BsaId, FormType};
    use efile_forms::foreign_accounts::{AccountType, ActivityType};
    use efile_forms::party::Party;

    use crate::submission::{Submission, SubmissionActivity, SubmissionActivityError};

    #[test]
    fn test_report_tree_numbering_is_depth_first() {
        let mut batch = BatchEnvelope::report(FormType::ForeignAccounts);
        batch
            .append_activity(Activity::ForeignAccounts(ActivityType {
                seq_num: SeqNumber::UNASSIGNED,
                parties: vec![Party::with_code("41"), Party::with_code("42")],
                accounts: vec![AccountType::default()],
            }))
            .unwrap();
        batch
            .append_activity(Activity::ForeignAccounts(ActivityType::default()))
            .unwrap();

        assign_sequence_numbers(&mut batch);

        assert_eq!(batch.seq_num, SeqNumber(1));
        let Activity::ForeignAccounts(first) = &batch.activities[0] else {
            panic!("unexpected variant");
        };
        assert_eq!(first.seq_num, SeqNumber(2));
        assert_eq!(first.parties[0].seq_num, SeqNumber(3));
        assert_eq!(first.parties[1].seq_num, SeqNumber(4));
        assert_eq!(first.accounts[0].seq_num, SeqNumber(5));
        let Activity::ForeignAccounts(second) = &batch.activities[1] else {
            panic!("unexpected variant");
        };
        assert_eq!(second.seq_num, SeqNumber(6));
    }

    #[test]
    fn test_acknowledgment_tree_is_numbered() {
        let mut batch = BatchEnvelope::acknowledgment();
        batch.submission = Some(Submission {
            seq_num: SeqNumber::UNASSIGNED,
            status_code: None,
            activities: vec![SubmissionActivity {
                seq_num: SeqNumber::UNASSIGNED,
                bsa_id: Some(BsaId::new("1").unwrap()),
                errors: vec![SubmissionActivityError::default()],
            }],
        });

        assign_sequence_numbers(&mut batch);

        let submission = batch.submission.as_ref().unwrap();
        assert_eq!(batch.seq_num, SeqNumber(1));
        assert_eq!(submission.seq_num, SeqNumber(2));
        assert_eq!(submission.activities[0].seq_num, SeqNumber(3));
        assert_eq!(submission.activities[0].errors[0].seq_num, SeqNumber(4));
    }

    #[test]
    fn test_renumbering_is_stable() {
        let mut batch = BatchEnvelope::report(FormType::ForeignAccounts);
        batch
            .append_activity(Activity::ForeignAccounts(ActivityType::default()))
            .unwrap();
        assign_sequence_numbers(&mut batch);
        let first_pass = batch.clone();
        assign_sequence_numbers(&mut batch);
        assert_eq!(batch, first_pass);
    }
}
