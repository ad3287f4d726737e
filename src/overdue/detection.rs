use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RecencyBasis;
use crate::decimal::Money;
use crate::errors::{Result, TrackerError};
use crate::models::{Group, Participant, Payment};
use crate::ranking::recency::{days_between, RecencyIndex};
use crate::types::{Frequency, ParticipantId, NEVER_PAID_DAYS};

/// participant behind on payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueParticipant {
    pub participant_id: ParticipantId,
    pub name: String,
    pub days_overdue: i64,
    pub last_payment_date: Option<DateTime<Utc>>,
    pub amount_due: Money,
    pub never_paid: bool,
}

/// days after which a participant counts as overdue
pub fn overdue_threshold(frequency: Frequency, cycles: Decimal) -> Result<Decimal> {
    Decimal::from(frequency.nominal_days())
        .checked_mul(cycles)
        .ok_or_else(|| TrackerError::InvalidConfiguration {
            message: format!("{cycles} cycles of {frequency} overflow the overdue threshold"),
        })
}

/// active participants with no payment for more than `threshold_cycles` cycles
///
/// Members who never paid are measured from `joined_at` and listed once a full
/// cycle has passed; without a join date they get `NEVER_PAID_DAYS`.
pub fn overdue_participants(
    group: &Group,
    participants: &[Participant],
    payments: &[Payment],
    as_of: &DateTime<Utc>,
    threshold_cycles: Decimal,
    basis: RecencyBasis,
) -> Result<Vec<OverdueParticipant>> {
    let frequency = group.frequency()?;
    let threshold = overdue_threshold(frequency, threshold_cycles)?;

    let active: Vec<Participant> = participants.iter().filter(|p| p.is_active).cloned().collect();
    let index = RecencyIndex::build(&active, payments, as_of, basis);

    let mut overdue: Vec<OverdueParticipant> = active
        .iter()
        .filter_map(|participant| {
            let recency = index.get(participant.id);
            let days_overdue = match (recency.last_payment_date, participant.joined_at) {
                (Some(_), _) if Decimal::from(recency.days_since_last) > threshold => recency.days_since_last,
                (Some(_), _) => return None,
                (None, Some(joined)) => {
                    let days = days_between(&joined, as_of);
                    if days <= frequency.nominal_days() {
                        return None;
                    }
                    days
                }
                (None, None) => NEVER_PAID_DAYS,
            };

            Some(OverdueParticipant {
                participant_id: participant.id,
                name: participant.display_name(),
                days_overdue,
                last_payment_date: recency.last_payment_date,
                amount_due: group.payment_amount,
                never_paid: !recency.has_paid(),
            })
        })
        .collect();

    overdue.sort_by(|a, b| {
        b.days_overdue
            .cmp(&a.days_overdue)
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    debug!(
        group_id = group.id,
        threshold = %threshold,
        overdue = overdue.len(),
        "overdue participants detected"
    );

    Ok(overdue)
}
