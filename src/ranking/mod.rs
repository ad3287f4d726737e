pub mod order;
pub mod reassign;
pub mod recency;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ParticipantId;

pub use order::{rank, rank_with};
pub use reassign::{reassign, reassign_with, Reassignment};
pub use recency::{days_between, recency_for, recency_for_with, Recency, RecencyIndex};

/// one participant's place in the next-payer ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub participant_id: ParticipantId,
    pub name: String,
    pub days_since_last: i64,
    pub last_payment_date: Option<DateTime<Utc>>,
}

/// next payers, most overdue first
///
/// Built fresh on every query and never truncated; `top` is a display helper.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<RankingEntry>,
}

impl Ranking {
    pub(crate) fn from_sorted(entries: Vec<RankingEntry>) -> Self {
        Self { entries }
    }

    pub fn head(&self) -> Option<&RankingEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RankingEntry> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[RankingEntry] {
        &self.entries
    }

    pub fn position(&self, participant_id: ParticipantId) -> Option<usize> {
        self.entries.iter().position(|e| e.participant_id == participant_id)
    }

    pub fn get(&self, participant_id: ParticipantId) -> Option<&RankingEntry> {
        self.entries.iter().find(|e| e.participant_id == participant_id)
    }

    /// first `n` entries for display
    pub fn top(&self, n: usize) -> &[RankingEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn into_entries(self) -> Vec<RankingEntry> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankingEntry;
    type IntoIter = std::slice::Iter<'a, RankingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for Ranking {
    type Item = RankingEntry;
    type IntoIter = std::vec::IntoIter<RankingEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
