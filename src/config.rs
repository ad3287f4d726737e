use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, TrackerError};

/// tracker configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub recency_basis: RecencyBasis,
    #[serde(default)]
    pub skip_policy: SkipPolicy,
    #[serde(default)]
    pub expectation_basis: ExpectationBasis,
    /// cycles without payment before a participant is listed as overdue
    #[serde(default = "default_overdue_cycles")]
    pub overdue_threshold_cycles: Decimal,
    /// cycles without payment before a participant shows up in alerts
    #[serde(default = "default_alert_cycles")]
    pub alert_threshold_cycles: Decimal,
    /// days before the next contribution when a deadline warning is raised
    #[serde(default = "default_deadline_days")]
    pub deadline_warning_days: i64,
    /// members named in a single overdue alert
    #[serde(default = "default_top_n")]
    pub notification_top_n: usize,
}

/// which payments count towards a participant's last payment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RecencyBasis {
    /// every recorded payment
    #[default]
    AllPayments,
    /// only payments verified by the group owner
    VerifiedOnly,
}

/// which ranking members may be skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SkipPolicy {
    /// only the participant whose turn it is
    #[default]
    HeadOnly,
    /// any participant in the ranking
    AnyPosition,
}

/// how the expected amount of a period is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpectationBasis {
    /// active participants times the group payment amount
    #[default]
    PerParticipant,
    /// the group payment amount is the target for the whole group
    GroupTotal,
}

/// upper bound for both threshold cycle settings
pub const MAX_THRESHOLD_CYCLES: Decimal = dec!(1000);

fn default_overdue_cycles() -> Decimal {
    dec!(1.5)
}

fn default_alert_cycles() -> Decimal {
    dec!(2)
}

fn default_deadline_days() -> i64 {
    2
}

fn default_top_n() -> usize {
    4
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            recency_basis: RecencyBasis::default(),
            skip_policy: SkipPolicy::default(),
            expectation_basis: ExpectationBasis::default(),
            overdue_threshold_cycles: default_overdue_cycles(),
            alert_threshold_cycles: default_alert_cycles(),
            deadline_warning_days: default_deadline_days(),
            notification_top_n: default_top_n(),
        }
    }
}

impl TrackerConfig {
    /// member dashboard: verified payments drive the turn order
    pub fn dashboard() -> Self {
        Self {
            recency_basis: RecencyBasis::VerifiedOnly,
            ..Self::default()
        }
    }

    /// public overdue board: the group amount is one shared target
    pub fn public_board() -> Self {
        Self {
            recency_basis: RecencyBasis::VerifiedOnly,
            expectation_basis: ExpectationBasis::GroupTotal,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, cycles) in [
            ("overdue_threshold_cycles", self.overdue_threshold_cycles),
            ("alert_threshold_cycles", self.alert_threshold_cycles),
        ] {
            if cycles <= Decimal::ZERO || cycles > MAX_THRESHOLD_CYCLES {
                return Err(TrackerError::InvalidConfiguration {
                    message: format!(
                        "{name} must be in (0, {MAX_THRESHOLD_CYCLES}], got {cycles}"
                    ),
                });
            }
        }
        if self.deadline_warning_days < 0 {
            return Err(TrackerError::InvalidConfiguration {
                message: format!(
                    "deadline_warning_days must not be negative, got {}",
                    self.deadline_warning_days
                ),
            });
        }
        if self.notification_top_n == 0 {
            return Err(TrackerError::InvalidConfiguration {
                message: "notification_top_n must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// parse and validate a json configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TrackerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
