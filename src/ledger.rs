use chrono::{DateTime, Utc};
use hourglass_rs::SafeTimeProvider;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::errors::{Result, TrackerError};
use crate::models::{from_json, Group, Participant, Payment};
use crate::overdue::{notifications, overdue_participants, Notification, OverdueParticipant};
use crate::period::{Period, PeriodCalculator};
use crate::ranking::{rank_with, reassign_with, Ranking, Reassignment, Recency, RecencyIndex};
use crate::stats::{
    aggregate, contributions, group_summary, last_payers, Contribution, ExpectedAmount,
    GroupSummary, LastPayer, PeriodStats,
};
use crate::types::{Direction, Frequency, GroupId, ParticipantId};
use crate::views::{PeriodStatsView, PublicBoardView};

/// snapshot of one group's records with the config used to read them
#[derive(Debug, Clone)]
pub struct GroupLedger {
    config: TrackerConfig,
    group: Group,
    frequency: Frequency,
    participants: Vec<Participant>,
    payments: Vec<Payment>,
}

impl GroupLedger {
    /// validate config and records and build the ledger
    pub fn new(
        config: TrackerConfig,
        group: Group,
        participants: Vec<Participant>,
        payments: Vec<Payment>,
    ) -> Result<Self> {
        config.validate()?;

        let frequency = group.frequency().map_err(|err| {
            warn!(group_id = group.id, frequency = %group.payment_frequency, "unknown payment frequency");
            err
        })?;

        if let Some(stray) = participants.iter().find(|p| p.group_id != group.id) {
            return Err(mismatch("participant", stray.id, stray.group_id, group.id));
        }
        if let Some(stray) = payments.iter().find(|p| p.group_id != group.id) {
            return Err(mismatch("payment", stray.id, stray.group_id, group.id));
        }

        debug!(
            group_id = group.id,
            frequency = %frequency,
            participants = participants.len(),
            payments = payments.len(),
            "group ledger loaded"
        );

        Ok(Self {
            config,
            group,
            frequency,
            participants,
            payments,
        })
    }

    /// build from api json: a group object and arrays of participants and payments
    pub fn from_json(
        config: TrackerConfig,
        group_json: &str,
        participants_json: &str,
        payments_json: &str,
    ) -> Result<Self> {
        let group: Group = from_json(group_json)?;
        let participants: Vec<Participant> = from_json(participants_json)?;
        let payments: Vec<Payment> = from_json(payments_json)?;
        Self::new(config, group, participants, payments)
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn group_id(&self) -> GroupId {
        self.group.id
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }

    pub fn active_participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.iter().filter(|p| p.is_active)
    }

    /// record a payment fetched after the ledger was built
    pub fn record_payment(&mut self, payment: Payment) -> Result<()> {
        if payment.group_id != self.group.id {
            return Err(mismatch("payment", payment.id, payment.group_id, self.group.id));
        }
        self.payments.push(payment);
        Ok(())
    }

    fn calculator(&self) -> PeriodCalculator {
        PeriodCalculator::new(self.frequency)
    }

    // periods

    pub fn current_period(&self, as_of: &DateTime<Utc>) -> Result<Period> {
        self.calculator().containing(as_of)
    }

    pub fn previous_period(&self, as_of: &DateTime<Utc>) -> Result<Period> {
        let current = self.current_period(as_of)?;
        self.calculator().shift(&current, Direction::Prev)
    }

    /// move one period back or forward
    pub fn navigate(&self, period: &Period, direction: Direction) -> Result<Period> {
        self.calculator().shift(period, direction)
    }

    /// last `count` periods, newest first
    pub fn history(&self, as_of: &DateTime<Utc>, count: usize) -> Result<Vec<Period>> {
        self.calculator().history(as_of, count)
    }

    // recency and ranking

    pub fn recency(&self, participant_id: ParticipantId, as_of: &DateTime<Utc>) -> Result<Recency> {
        let participant = self
            .participants
            .iter()
            .find(|p| p.id == participant_id)
            .ok_or(TrackerError::ParticipantNotFound { participant_id })?;

        let index = RecencyIndex::build(
            std::slice::from_ref(participant),
            &self.payments,
            as_of,
            self.config.recency_basis,
        );
        Ok(index.get(participant_id))
    }

    pub fn rank(&self, as_of: &DateTime<Utc>) -> Ranking {
        rank_with(&self.participants, &self.payments, as_of, self.config.recency_basis)
    }

    /// rank and skip `participant_id` under the configured skip policy
    pub fn reassign(&self, participant_id: ParticipantId, as_of: &DateTime<Utc>) -> Result<Reassignment> {
        let ranking = self.rank(as_of);
        reassign_with(&ranking, participant_id, self.config.skip_policy)
    }

    // stats

    pub fn expected_amount(&self) -> ExpectedAmount {
        ExpectedAmount::for_group(
            &self.group,
            self.active_participants().count(),
            self.config.expectation_basis,
        )
    }

    pub fn stats_for(&self, period: &Period) -> PeriodStats {
        aggregate(&self.payments, period, self.expected_amount())
    }

    pub fn current_stats(&self, as_of: &DateTime<Utc>) -> Result<PeriodStats> {
        let period = self.current_period(as_of)?;
        Ok(self.stats_for(&period))
    }

    pub fn stats_view(&self, period: &Period, as_of: &DateTime<Utc>) -> PeriodStatsView {
        PeriodStatsView::from_stats(self.group.id, &self.stats_for(period), as_of)
    }

    /// payments of the previous period, newest first
    pub fn last_payers(&self, as_of: &DateTime<Utc>) -> Result<Vec<LastPayer>> {
        let period = self.previous_period(as_of)?;
        Ok(last_payers(&self.participants, &self.payments, &period))
    }

    pub fn contributions(&self) -> Vec<Contribution> {
        contributions(&self.participants, &self.payments)
    }

    pub fn member_summary(&self, participant_id: ParticipantId, as_of: &DateTime<Utc>) -> Result<GroupSummary> {
        let member = self
            .participants
            .iter()
            .find(|p| p.id == participant_id)
            .ok_or(TrackerError::ParticipantNotFound { participant_id })?;
        group_summary(&self.group, member, &self.payments, as_of)
    }

    /// active members without any payment in the current period
    pub fn pending_members(&self, as_of: &DateTime<Utc>) -> Result<Vec<&Participant>> {
        let mut pending = Vec::new();
        for member in self.active_participants() {
            if !group_summary(&self.group, member, &self.payments, as_of)?.paid_in_current_period {
                pending.push(member);
            }
        }
        Ok(pending)
    }

    // overdue

    pub fn overdue(&self, as_of: &DateTime<Utc>) -> Result<Vec<OverdueParticipant>> {
        overdue_participants(
            &self.group,
            &self.participants,
            &self.payments,
            as_of,
            self.config.overdue_threshold_cycles,
            self.config.recency_basis,
        )
    }

    pub fn notifications(&self, as_of: &DateTime<Utc>) -> Result<Vec<Notification>> {
        notifications(&self.group, &self.participants, &self.payments, as_of, &self.config)
    }

    /// public overdue board: group info and the full ranking
    pub fn public_board(&self, as_of: &DateTime<Utc>) -> Result<PublicBoardView> {
        let stats = self.current_stats(as_of)?;
        let ranking = self.rank(as_of);
        Ok(PublicBoardView::new(&self.group, self.frequency, &stats, ranking))
    }

    // time provider variants

    pub fn current_period_now(&self, time_provider: &SafeTimeProvider) -> Result<Period> {
        self.current_period(&time_provider.now())
    }

    pub fn rank_now(&self, time_provider: &SafeTimeProvider) -> Ranking {
        self.rank(&time_provider.now())
    }

    pub fn reassign_now(&self, participant_id: ParticipantId, time_provider: &SafeTimeProvider) -> Result<Reassignment> {
        self.reassign(participant_id, &time_provider.now())
    }

    pub fn current_stats_now(&self, time_provider: &SafeTimeProvider) -> Result<PeriodStats> {
        self.current_stats(&time_provider.now())
    }

    pub fn last_payers_now(&self, time_provider: &SafeTimeProvider) -> Result<Vec<LastPayer>> {
        self.last_payers(&time_provider.now())
    }

    pub fn overdue_now(&self, time_provider: &SafeTimeProvider) -> Result<Vec<OverdueParticipant>> {
        self.overdue(&time_provider.now())
    }

    pub fn notifications_now(&self, time_provider: &SafeTimeProvider) -> Result<Vec<Notification>> {
        self.notifications(&time_provider.now())
    }

    pub fn public_board_now(&self, time_provider: &SafeTimeProvider) -> Result<PublicBoardView> {
        self.public_board(&time_provider.now())
    }
}

fn mismatch(kind: &str, id: i64, found: GroupId, expected: GroupId) -> TrackerError {
    warn!(record = kind, id, found, expected, "record belongs to another group");
    TrackerError::RecordMismatch {
        message: format!("{kind} {id} belongs to group {found}, expected {expected}"),
    }
}
