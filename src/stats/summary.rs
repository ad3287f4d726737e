use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::models::{Group, Participant, Payment};
use crate::period::{current_period, Period};
use crate::ranking::recency::days_between;
use crate::types::{Frequency, GroupId, ParticipantId, PaymentId, NEVER_PAID_DAYS};

/// display name for payments that match no known participant
pub const UNKNOWN_PAYER_NAME: &str = "Participant";

/// payment made in a closed period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastPayer {
    pub payment_id: PaymentId,
    pub participant_id: Option<ParticipantId>,
    pub name: String,
    pub amount: Money,
    pub payment_date: DateTime<Utc>,
}

/// totals per payer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub participant_id: Option<ParticipantId>,
    pub name: String,
    pub total_amount: Money,
    pub payment_count: usize,
}

/// a member's standing in one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group_id: GroupId,
    pub group_name: String,
    pub expected_amount: Money,
    pub payment_frequency: Frequency,
    pub total_paid: Money,
    pub payment_count: usize,
    pub last_payment: Option<DateTime<Utc>>,
    pub days_since_last: i64,
    /// more than one nominal cycle since the last payment
    pub is_due: bool,
    /// any payment dated inside the period containing `as_of`
    pub paid_in_current_period: bool,
}

/// participant that made the payment, if any
pub fn payer_of<'a>(participants: &'a [Participant], payment: &Payment) -> Option<&'a Participant> {
    participants.iter().find(|p| payment.belongs_to(p))
}

fn payer_identity(participants: &[Participant], payment: &Payment) -> (Option<ParticipantId>, String) {
    match payer_of(participants, payment) {
        Some(participant) => (Some(participant.id), participant.display_name()),
        None => (payment.participant_id, UNKNOWN_PAYER_NAME.to_string()),
    }
}

/// payments dated inside `period`, newest first
pub fn last_payers(participants: &[Participant], payments: &[Payment], period: &Period) -> Vec<LastPayer> {
    let mut items: Vec<LastPayer> = payments
        .iter()
        .filter(|p| period.contains(&p.payment_date))
        .map(|p| {
            let (participant_id, name) = payer_identity(participants, p);
            LastPayer {
                payment_id: p.id,
                participant_id,
                name,
                amount: p.amount,
                payment_date: p.payment_date,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        b.payment_date
            .cmp(&a.payment_date)
            .then_with(|| b.payment_id.cmp(&a.payment_id))
    });
    items
}

/// totals per payer, largest first
pub fn contributions(participants: &[Participant], payments: &[Payment]) -> Vec<Contribution> {
    let mut by_payer: HashMap<Option<ParticipantId>, (String, Vec<Money>)> = HashMap::new();

    for payment in payments {
        let (participant_id, name) = payer_identity(participants, payment);
        by_payer
            .entry(participant_id)
            .or_insert_with(|| (name, Vec::new()))
            .1
            .push(payment.amount);
    }

    let mut result: Vec<Contribution> = by_payer
        .into_iter()
        .map(|(participant_id, (name, amounts))| Contribution {
            participant_id,
            name,
            total_amount: amounts.iter().sum(),
            payment_count: amounts.len(),
        })
        .collect();
    result.sort_by(|a, b| {
        b.total_amount
            .cmp(&a.total_amount)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });
    result
}

/// how `member` stands in `group`
///
/// A member who never paid reports `NEVER_PAID_DAYS` and is due.
pub fn group_summary(
    group: &Group,
    member: &Participant,
    payments: &[Payment],
    as_of: &DateTime<Utc>,
) -> Result<GroupSummary> {
    let frequency = group.frequency()?;
    let period = current_period(frequency, as_of)?;

    let own: Vec<&Payment> = payments.iter().filter(|p| p.belongs_to(member)).collect();
    let total_paid: Money = own.iter().map(|p| p.amount).sum();
    let last_payment = own.iter().map(|p| p.payment_date).max();
    let days_since_last = last_payment
        .map(|last| days_between(&last, as_of))
        .unwrap_or(NEVER_PAID_DAYS);

    Ok(GroupSummary {
        group_id: group.id,
        group_name: group.name.clone(),
        expected_amount: group.payment_amount,
        payment_frequency: frequency,
        total_paid,
        payment_count: own.len(),
        last_payment,
        days_since_last,
        is_due: days_since_last > frequency.nominal_days(),
        paid_in_current_period: own.iter().any(|p| period.contains(&p.payment_date)),
    })
}
