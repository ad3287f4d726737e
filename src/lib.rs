pub mod config;
pub mod decimal;
pub mod errors;
pub mod ledger;
pub mod models;
pub mod overdue;
pub mod period;
pub mod ranking;
pub mod stats;
pub mod types;
pub mod views;

// re-export key types
pub use config::{ExpectationBasis, RecencyBasis, SkipPolicy, TrackerConfig};
pub use decimal::Money;
pub use errors::{Result, TrackerError};
pub use ledger::GroupLedger;
pub use models::{from_json, parse_api_datetime, Group, Participant, Payment, User};
pub use overdue::{notifications, overdue_participants, Notification, OverdueParticipant};
pub use period::{current_period, period_for, previous_period, shift, Period, PeriodCalculator};
pub use ranking::{
    rank, rank_with, reassign, reassign_with, recency_for, Ranking, RankingEntry, Reassignment,
    Recency, RecencyIndex,
};
pub use stats::{aggregate, ExpectedAmount, PeriodStats};
pub use types::{
    Direction, Frequency, GroupId, NotificationKind, ParticipantId, PaymentId, Priority, UserId,
    NEVER_PAID_DAYS,
};
pub use views::{GroupInfoView, PeriodStatsView, PublicBoardView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
