use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TrackerConfig;
use crate::errors::Result;
use crate::models::{Group, Participant, Payment};
use crate::overdue::detection::overdue_threshold;
use crate::ranking::order::rank_with;
use crate::ranking::recency::days_between;
use crate::types::{GroupId, NotificationKind, Priority};

/// dashboard notification for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub group_id: GroupId,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
}

/// deadline and overdue notifications for a group
pub fn notifications(
    group: &Group,
    participants: &[Participant],
    payments: &[Payment],
    as_of: &DateTime<Utc>,
    config: &TrackerConfig,
) -> Result<Vec<Notification>> {
    let frequency = group.frequency()?;
    let cycle = frequency.nominal_days();
    let mut result = Vec::new();

    let last_group_payment = payments
        .iter()
        .filter(|p| p.group_id == group.id)
        .map(|p| p.payment_date)
        .max();

    if let Some(last) = last_group_payment {
        let days_until_next = cycle - days_between(&last, as_of);
        if (0..=config.deadline_warning_days).contains(&days_until_next) {
            result.push(Notification {
                id: format!("deadline_{}", group.id),
                kind: NotificationKind::DeadlineApproaching,
                title: "Payment due soon".to_string(),
                message: format!(
                    "{} day(s) left until the next payment in {}",
                    days_until_next, group.name
                ),
                group_id: group.id,
                priority: Priority::High,
                created_at: *as_of,
            });
        }
    }

    let threshold = overdue_threshold(frequency, config.alert_threshold_cycles)?;
    let ranking = rank_with(participants, payments, as_of, config.recency_basis);
    let names: Vec<&str> = ranking
        .iter()
        .filter(|e| Decimal::from(e.days_since_last) > threshold)
        .take(config.notification_top_n)
        .map(|e| e.name.as_str())
        .collect();

    if !names.is_empty() {
        result.push(Notification {
            id: format!("overdue_{}", group.id),
            kind: NotificationKind::OverduePayments,
            title: "Members with overdue payments".to_string(),
            message: format!(
                "In {}: {} have had pending payments for a long time",
                group.name,
                names.join(", ")
            ),
            group_id: group.id,
            priority: Priority::High,
            created_at: *as_of,
        });
    }

    debug!(group_id = group.id, notifications = result.len(), "built notifications");
    Ok(result)
}
