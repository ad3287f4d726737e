/// serializable views handed to api consumers
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::models::Group;
use crate::ranking::{Ranking, RankingEntry};
use crate::stats::PeriodStats;
use crate::types::{Frequency, GroupId};

/// public overdue board of a group, safe to show without authentication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicBoardView {
    pub group_info: GroupInfoView,
    /// full next-payer ranking, most overdue first
    pub overdue_participants: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfoView {
    pub name: String,
    pub description: Option<String>,
    pub payment_amount: Money,
    pub payment_frequency: Frequency,
    pub period_label: String,
    pub total_participants: usize,
    /// verified payments of the current period
    pub current_period_collected: Money,
    pub pending_amount: Money,
}

impl PublicBoardView {
    pub fn new(group: &Group, frequency: Frequency, stats: &PeriodStats, ranking: Ranking) -> Self {
        let overdue_participants = ranking.into_entries();
        PublicBoardView {
            group_info: GroupInfoView {
                name: group.name.clone(),
                description: group.description.clone(),
                payment_amount: group.payment_amount,
                payment_frequency: frequency,
                period_label: stats.period.label(),
                total_participants: overdue_participants.len(),
                current_period_collected: stats.verified_amount,
                pending_amount: stats.expected_amount.saturating_sub(stats.verified_amount),
            },
            overdue_participants,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// totals of one period without the payment lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodStatsView {
    pub group_id: GroupId,
    pub frequency: Frequency,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_current: bool,
    pub days_remaining: i64,
    pub expected_amount: Money,
    pub collected_amount: Money,
    pub verified_amount: Money,
    pub pending_amount: Money,
    pub verified_count: usize,
    pub pending_count: usize,
}

impl PeriodStatsView {
    pub fn from_stats(group_id: GroupId, stats: &PeriodStats, as_of: &DateTime<Utc>) -> Self {
        let period = &stats.period;
        PeriodStatsView {
            group_id,
            frequency: period.frequency,
            label: period.label(),
            start: period.start,
            end: period.end,
            is_current: period.is_current(as_of),
            days_remaining: period.days_remaining(as_of),
            expected_amount: stats.expected_amount,
            collected_amount: stats.collected_amount,
            verified_amount: stats.verified_amount,
            pending_amount: stats.pending_amount,
            verified_count: stats.verified_payments.len(),
            pending_count: stats.pending_payments.len(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Participant, Payment};
    use crate::period::period_for;
    use crate::ranking::rank;
    use crate::stats::{aggregate, ExpectedAmount};
    use chrono::TimeZone;

    #[test]
    fn test_public_board_counts_verified_only() {
        let group = Group::new(4, "Band", Money::from_major(100), Frequency::Quarterly);
        let as_of = Utc.with_ymd_and_hms(2024, 5, 10, 0, 0, 0).unwrap();
        let period = period_for(Frequency::Quarterly, as_of.date_naive()).unwrap();
        let participants = vec![Participant::guest(1, 4, "Ana"), Participant::guest(2, 4, "Leo")];
        let payments = vec![
            Payment::new(1, 4, 1, Money::from_major(30), Utc.with_ymd_and_hms(2024, 4, 2, 0, 0, 0).unwrap()).verified(),
            Payment::new(2, 4, 2, Money::from_major(50), Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()),
        ];

        let stats = aggregate(&payments, &period, ExpectedAmount::Fixed { amount: group.payment_amount });
        let board = PublicBoardView::new(&group, Frequency::Quarterly, &stats, rank(&participants, &payments, &as_of));

        assert_eq!(board.group_info.period_label, "Q2 2024");
        assert_eq!(board.group_info.total_participants, 2);
        assert_eq!(board.group_info.current_period_collected, Money::from_major(30));
        assert_eq!(board.group_info.pending_amount, Money::from_major(70));
        assert_eq!(board.overdue_participants[0].participant_id, 1);

        let json = board.to_json_pretty().unwrap();
        assert!(json.contains("\"payment_frequency\": \"quarterly\""));
        let back: PublicBoardView = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_period_stats_view() {
        let as_of = Utc.with_ymd_and_hms(2024, 2, 27, 12, 0, 0).unwrap();
        let period = period_for(Frequency::Monthly, as_of.date_naive()).unwrap();
        let payments = vec![Payment::new(1, 1, 1, Money::from_major(10), as_of)];

        let stats = aggregate(&payments, &period, ExpectedAmount::PerParticipant {
            participants: 2,
            amount: Money::from_major(10),
        });
        let view = PeriodStatsView::from_stats(1, &stats, &as_of);

        assert!(view.is_current);
        assert_eq!(view.days_remaining, 2);
        assert_eq!(view.pending_amount, Money::from_major(10));
        assert_eq!(view.pending_count, 1);
        assert_eq!(view.verified_count, 0);
    }
}
