use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::RecencyBasis;
use crate::models::{Participant, Payment};
use crate::ranking::recency::RecencyIndex;
use crate::ranking::{Ranking, RankingEntry};

/// next-payer ranking over every recorded payment
pub fn rank(participants: &[Participant], payments: &[Payment], as_of: &DateTime<Utc>) -> Ranking {
    rank_with(participants, payments, as_of, RecencyBasis::AllPayments)
}

/// next-payer ranking counting only payments admitted by `basis`
///
/// Active participants only, ordered by days since last payment descending and
/// then by participant id ascending.
pub fn rank_with(
    participants: &[Participant],
    payments: &[Payment],
    as_of: &DateTime<Utc>,
    basis: RecencyBasis,
) -> Ranking {
    let active: Vec<Participant> = participants.iter().filter(|p| p.is_active).cloned().collect();
    let index = RecencyIndex::build(&active, payments, as_of, basis);

    let mut entries: Vec<RankingEntry> = active
        .iter()
        .map(|participant| {
            let recency = index.get(participant.id);
            RankingEntry {
                participant_id: participant.id,
                name: participant.display_name(),
                days_since_last: recency.days_since_last,
                last_payment_date: recency.last_payment_date,
            }
        })
        .collect();

    entries.sort_by(compare_entries);

    debug!(
        participants = participants.len(),
        ranked = entries.len(),
        head = entries.first().map(|e| e.participant_id),
        "computed next-payer ranking"
    );

    Ranking::from_sorted(entries)
}

fn compare_entries(a: &RankingEntry, b: &RankingEntry) -> Ordering {
    b.days_since_last
        .cmp(&a.days_since_last)
        .then_with(|| a.participant_id.cmp(&b.participant_id))
}
