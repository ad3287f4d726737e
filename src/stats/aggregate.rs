use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExpectationBasis;
use crate::decimal::Money;
use crate::models::{Group, Payment};
use crate::period::Period;

/// what a period is expected to collect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExpectedAmount {
    /// head count times the per-participant amount
    PerParticipant { participants: usize, amount: Money },
    /// figure supplied by the server
    Fixed { amount: Money },
}

impl ExpectedAmount {
    pub fn total(&self) -> Money {
        match self {
            ExpectedAmount::PerParticipant { participants, amount } => amount.times(*participants),
            ExpectedAmount::Fixed { amount } => *amount,
        }
    }

    /// expectation for a group with `active_participants` members
    pub fn for_group(group: &Group, active_participants: usize, basis: ExpectationBasis) -> Self {
        match basis {
            ExpectationBasis::PerParticipant => ExpectedAmount::PerParticipant {
                participants: active_participants,
                amount: group.payment_amount,
            },
            ExpectationBasis::GroupTotal => ExpectedAmount::Fixed {
                amount: group.payment_amount,
            },
        }
    }
}

/// payment totals of one period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStats {
    pub period: Period,
    pub expected_amount: Money,
    /// every payment dated inside the period
    pub collected_amount: Money,
    /// verified payments only
    pub verified_amount: Money,
    /// expected minus collected, never below zero
    pub pending_amount: Money,
    pub verified_payments: Vec<Payment>,
    pub pending_payments: Vec<Payment>,
}

impl PeriodStats {
    pub fn payment_count(&self) -> usize {
        self.verified_payments.len() + self.pending_payments.len()
    }

    pub fn is_fully_collected(&self) -> bool {
        self.pending_amount.is_zero()
    }
}

/// fold the payments dated inside `period` into totals
///
/// Payments keep their input order within the verified and pending lists.
pub fn aggregate(payments: &[Payment], period: &Period, expected: ExpectedAmount) -> PeriodStats {
    let (verified_payments, pending_payments): (Vec<Payment>, Vec<Payment>) = payments
        .iter()
        .filter(|p| period.contains(&p.payment_date))
        .cloned()
        .partition(|p| p.is_verified);

    let verified_amount: Money = verified_payments.iter().map(|p| p.amount).sum();
    let collected_amount: Money = verified_payments
        .iter()
        .chain(&pending_payments)
        .map(|p| p.amount)
        .sum();
    let expected_amount = expected.total();
    let pending_amount = expected_amount.saturating_sub(collected_amount);

    debug!(
        period = %period.label(),
        payments = verified_payments.len() + pending_payments.len(),
        collected = %collected_amount,
        pending = %pending_amount,
        "aggregated period stats"
    );

    PeriodStats {
        period: *period,
        expected_amount,
        collected_amount,
        verified_amount,
        pending_amount,
        verified_payments,
        pending_payments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::period_for;
    use crate::types::Frequency;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn march() -> Period {
        period_for(Frequency::Monthly, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).unwrap()
    }

    fn payment(id: i64, cents: i64, day: u32, month: u32) -> Payment {
        Payment::new(
            id,
            1,
            id,
            Money::from_minor(cents),
            Utc.with_ymd_and_hms(2024, month, day, 10, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_verified_and_pending_split() {
        let payments = vec![payment(1, 1000, 5, 3).verified(), payment(2, 550, 6, 3)];
        let stats = aggregate(&payments, &march(), ExpectedAmount::Fixed { amount: Money::from_major(20) });

        assert_eq!(stats.collected_amount, Money::from_minor(1550));
        assert_eq!(stats.verified_amount, Money::from_major(10));
        assert_eq!(stats.verified_payments, vec![payments[0].clone()]);
        assert_eq!(stats.pending_payments, vec![payments[1].clone()]);
        assert_eq!(stats.pending_amount, Money::from_minor(450));
    }

    #[test]
    fn test_only_in_period_payments_count() {
        let payments = vec![
            payment(1, 1000, 29, 2),
            payment(2, 1000, 1, 3),
            payment(3, 1000, 31, 3),
            payment(4, 1000, 1, 4),
        ];
        let stats = aggregate(&payments, &march(), ExpectedAmount::Fixed { amount: Money::ZERO });

        assert_eq!(stats.payment_count(), 2);
        assert_eq!(stats.collected_amount, Money::from_major(20));
    }

    #[test]
    fn test_pending_floors_at_zero() {
        let payments = vec![payment(1, 5000, 10, 3)];
        let expected = ExpectedAmount::PerParticipant {
            participants: 3,
            amount: Money::from_major(10),
        };
        let stats = aggregate(&payments, &march(), expected);

        assert_eq!(stats.expected_amount, Money::from_major(30));
        assert_eq!(stats.pending_amount, Money::ZERO);
        assert!(stats.is_fully_collected());
    }

    #[test]
    fn test_exact_decimal_sum() {
        // a hundred payments of 0.10 sum to exactly 10.00
        let payments: Vec<_> = (1..=100).map(|id| payment(id, 10, 15, 3)).collect();
        let stats = aggregate(&payments, &march(), ExpectedAmount::Fixed { amount: Money::from_major(10) });

        assert_eq!(stats.collected_amount, Money::from_major(10));
        assert!(stats.pending_amount.is_zero());
    }

    #[test]
    fn test_sub_cent_api_amounts_sum_exactly() {
        let payments: Vec<Payment> = crate::models::from_json(
            r#"[
                {"id": 1, "group_id": 1, "participant_id": 1, "amount": "0.005", "payment_date": "2024-03-02T10:00:00", "is_verified": true},
                {"id": 2, "group_id": 1, "participant_id": 2, "amount": "0.005", "payment_date": "2024-03-03T10:00:00", "is_verified": true},
                {"id": 3, "group_id": 1, "participant_id": 3, "amount": "0.004", "payment_date": "2024-03-04T10:00:00"},
                {"id": 4, "group_id": 1, "participant_id": 4, "amount": "0.001", "payment_date": "2024-03-05T10:00:00"}
            ]"#,
        )
        .unwrap();

        let stats = aggregate(&payments, &march(), ExpectedAmount::Fixed { amount: Money::ZERO });
        assert_eq!(stats.verified_amount, Money::from_minor(1));
        // 0.015 exactly, rounded once
        assert_eq!(stats.collected_amount, Money::from_minor(2));

        let pending_only = aggregate(&payments[2..], &march(), ExpectedAmount::Fixed { amount: Money::ZERO });
        assert_eq!(pending_only.collected_amount, Money::from_minor(1));

        let mut reversed = payments.clone();
        reversed.reverse();
        let stats_reversed = aggregate(&reversed, &march(), ExpectedAmount::Fixed { amount: Money::ZERO });
        assert_eq!(stats_reversed.collected_amount, stats.collected_amount);
    }

    #[test]
    fn test_empty_input() {
        let stats = aggregate(&[], &march(), ExpectedAmount::Fixed { amount: Money::from_major(15) });

        assert!(stats.collected_amount.is_zero());
        assert_eq!(stats.pending_amount, Money::from_major(15));
        assert!(stats.verified_payments.is_empty());
        assert!(stats.pending_payments.is_empty());
    }

    #[test]
    fn test_expectation_basis() {
        let group = Group::new(1, "Flat", Money::from_major(12), Frequency::Monthly);

        let per_head = ExpectedAmount::for_group(&group, 4, ExpectationBasis::PerParticipant);
        assert_eq!(per_head.total(), Money::from_major(48));

        let shared = ExpectedAmount::for_group(&group, 4, ExpectationBasis::GroupTotal);
        assert_eq!(shared.total(), Money::from_major(12));
    }
}
