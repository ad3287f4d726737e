use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RecencyBasis;
use crate::models::{Participant, Payment};
use crate::types::{ParticipantId, UserId, NEVER_PAID_DAYS};

const SECONDS_PER_DAY: i64 = 86_400;

/// how long ago a participant last paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recency {
    pub last_payment_date: Option<DateTime<Utc>>,
    /// whole days since the last payment, `NEVER_PAID_DAYS` when none
    pub days_since_last: i64,
}

impl Recency {
    pub fn never() -> Self {
        Self {
            last_payment_date: None,
            days_since_last: NEVER_PAID_DAYS,
        }
    }

    pub fn from_last(last: DateTime<Utc>, as_of: &DateTime<Utc>) -> Self {
        Self {
            last_payment_date: Some(last),
            days_since_last: days_between(&last, as_of),
        }
    }

    pub fn has_paid(&self) -> bool {
        self.last_payment_date.is_some()
    }
}

/// floor of the elapsed days from `from` to `to`, negative for future dates
pub fn days_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> i64 {
    (*to - *from).num_seconds().div_euclid(SECONDS_PER_DAY)
}

fn counts(payment: &Payment, basis: RecencyBasis) -> bool {
    match basis {
        RecencyBasis::AllPayments => true,
        RecencyBasis::VerifiedOnly => payment.is_verified,
    }
}

/// recency of one participant over every recorded payment
pub fn recency_for(participant: &Participant, payments: &[Payment], as_of: &DateTime<Utc>) -> Recency {
    recency_for_with(participant, payments, as_of, RecencyBasis::AllPayments)
}

/// recency of one participant counting only payments admitted by `basis`
pub fn recency_for_with(
    participant: &Participant,
    payments: &[Payment],
    as_of: &DateTime<Utc>,
    basis: RecencyBasis,
) -> Recency {
    payments
        .iter()
        .filter(|p| counts(p, basis) && p.belongs_to(participant))
        .map(|p| p.payment_date)
        .max()
        .map(|last| Recency::from_last(last, as_of))
        .unwrap_or_else(Recency::never)
}

/// last payment per participant, built in one pass over the payments
#[derive(Debug, Clone)]
pub struct RecencyIndex {
    as_of: DateTime<Utc>,
    last_payments: HashMap<ParticipantId, DateTime<Utc>>,
}

impl RecencyIndex {
    pub fn build(
        participants: &[Participant],
        payments: &[Payment],
        as_of: &DateTime<Utc>,
        basis: RecencyBasis,
    ) -> Self {
        let mut by_user: HashMap<UserId, Vec<ParticipantId>> = HashMap::new();
        for participant in participants {
            if let Some(user_id) = participant.user_id {
                by_user.entry(user_id).or_default().push(participant.id);
            }
        }

        let mut last_payments: HashMap<ParticipantId, DateTime<Utc>> = HashMap::new();
        let mut record = |id: ParticipantId, at: DateTime<Utc>| {
            last_payments
                .entry(id)
                .and_modify(|last| {
                    if at > *last {
                        *last = at;
                    }
                })
                .or_insert(at);
        };

        for payment in payments.iter().filter(|p| counts(p, basis)) {
            match (payment.participant_id, payment.user_id) {
                (Some(participant_id), _) => record(participant_id, payment.payment_date),
                (None, Some(user_id)) => {
                    if let Some(ids) = by_user.get(&user_id) {
                        debug!(
                            payment_id = payment.id,
                            user_id = user_id,
                            "legacy payment matched by user identity"
                        );
                        for id in ids {
                            record(*id, payment.payment_date);
                        }
                    }
                }
                (None, None) => {
                    warn!(payment_id = payment.id, "payment has neither participant nor user link");
                }
            }
        }

        Self {
            as_of: *as_of,
            last_payments,
        }
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn get(&self, participant_id: ParticipantId) -> Recency {
        self.last_payments
            .get(&participant_id)
            .map(|last| Recency::from_last(*last, &self.as_of))
            .unwrap_or_else(Recency::never)
    }
}
