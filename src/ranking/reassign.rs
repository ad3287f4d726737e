use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SkipPolicy;
use crate::errors::{Result, TrackerError};
use crate::ranking::{Ranking, RankingEntry};
use crate::types::ParticipantId;

/// outcome of skipping a participant's turn
///
/// Nothing is persisted: the participant and their payments are untouched and
/// the skip only shapes `updated_ranking`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reassignment {
    pub skipped: RankingEntry,
    pub next: Option<RankingEntry>,
    pub updated_ranking: Ranking,
}

impl Reassignment {
    /// updated ranking with the skipped participant queued last
    pub fn rotated(&self) -> Ranking {
        let mut entries = self.updated_ranking.entries().to_vec();
        entries.push(self.skipped.clone());
        Ranking::from_sorted(entries)
    }
}

/// skip the participant at the head of the ranking
pub fn reassign(ranking: &Ranking, participant_id: ParticipantId) -> Result<Reassignment> {
    reassign_with(ranking, participant_id, SkipPolicy::HeadOnly)
}

/// skip a participant under the given policy
///
/// With `HeadOnly` only the current head may be skipped. With `AnyPosition`
/// `next` is whoever moves into the skipped slot, wrapping to the first entry
/// when the last one was skipped.
pub fn reassign_with(
    ranking: &Ranking,
    participant_id: ParticipantId,
    policy: SkipPolicy,
) -> Result<Reassignment> {
    let index = match (policy, ranking.position(participant_id)) {
        (SkipPolicy::HeadOnly, Some(0)) => 0,
        (SkipPolicy::AnyPosition, Some(index)) => index,
        (_, position) => {
            debug!(
                participant_id = participant_id,
                position = position,
                policy = ?policy,
                "participant cannot be skipped"
            );
            return Err(TrackerError::ParticipantNotFound { participant_id });
        }
    };

    let mut entries = ranking.entries().to_vec();
    let skipped = entries.remove(index);
    let next = entries.get(index).or_else(|| entries.first()).cloned();

    info!(
        skipped = skipped.participant_id,
        next = next.as_ref().map(|e| e.participant_id),
        remaining = entries.len(),
        "participant turn skipped"
    );

    Ok(Reassignment {
        skipped,
        next,
        updated_ranking: Ranking::from_sorted(entries),
    })
}
