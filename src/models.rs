//! Records delivered by the remote api.
//!
//! These are taken as already validated: amounts may be negative and dates may
//! lie in the future, both pass through untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{Result, TrackerError};
use crate::types::{Frequency, GroupId, ParticipantId, PaymentId, UserId};

/// display name used for participants without user or guest name
pub const GUEST_FALLBACK_NAME: &str = "Guest";

/// registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// group with a fixed payment frequency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub payment_amount: Money,
    /// raw frequency as stored by the api, parsed on use
    pub payment_frequency: String,
    pub public_id: Uuid,
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default, with = "api_datetime::option")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Group {
    pub fn new(id: GroupId, name: &str, payment_amount: Money, frequency: Frequency) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: None,
            payment_amount,
            payment_frequency: frequency.as_str().to_string(),
            public_id: Uuid::new_v4(),
            owner_id: None,
            created_at: None,
            is_active: true,
        }
    }

    /// parsed payment frequency
    pub fn frequency(&self) -> Result<Frequency> {
        Frequency::parse(&self.payment_frequency)
    }
}

/// member of a group, registered or guest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub group_id: GroupId,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub guest_email: Option<String>,
    #[serde(default, with = "api_datetime::option")]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl Participant {
    /// guest participant not linked to a user account
    pub fn guest(id: ParticipantId, group_id: GroupId, name: &str) -> Self {
        Self {
            id,
            group_id,
            user_id: None,
            guest_name: Some(name.to_string()),
            guest_email: None,
            joined_at: None,
            is_active: true,
            user: None,
        }
    }

    /// participant linked to a registered user
    pub fn member(id: ParticipantId, group_id: GroupId, user: User) -> Self {
        Self {
            id,
            group_id,
            user_id: Some(user.id),
            guest_name: None,
            guest_email: None,
            joined_at: None,
            is_active: true,
            user: Some(user),
        }
    }

    pub fn joined(mut self, at: DateTime<Utc>) -> Self {
        self.joined_at = Some(at);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.full_name.clone())
            .or_else(|| self.guest_name.clone())
            .unwrap_or_else(|| GUEST_FALLBACK_NAME.to_string())
    }
}

/// recorded contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub group_id: GroupId,
    #[serde(default)]
    pub participant_id: Option<ParticipantId>,
    /// legacy records reference the paying user directly
    #[serde(default)]
    pub user_id: Option<UserId>,
    pub amount: Money,
    #[serde(with = "api_datetime")]
    pub payment_date: DateTime<Utc>,
    #[serde(default)]
    pub receipt_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl Payment {
    pub fn new(
        id: PaymentId,
        group_id: GroupId,
        participant_id: ParticipantId,
        amount: Money,
        payment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            participant_id: Some(participant_id),
            user_id: None,
            amount,
            payment_date,
            receipt_url: None,
            notes: None,
            is_verified: false,
        }
    }

    /// legacy payment linked to a user instead of a participant
    pub fn legacy(
        id: PaymentId,
        group_id: GroupId,
        user_id: UserId,
        amount: Money,
        payment_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            group_id,
            participant_id: None,
            user_id: Some(user_id),
            amount,
            payment_date,
            receipt_url: None,
            notes: None,
            is_verified: false,
        }
    }

    pub fn verified(mut self) -> Self {
        self.is_verified = true;
        self
    }

    pub fn is_legacy(&self) -> bool {
        self.participant_id.is_none()
    }

    /// whether this payment was made by the participant
    pub fn belongs_to(&self, participant: &Participant) -> bool {
        match self.participant_id {
            Some(id) => id == participant.id,
            None => self.user_id.is_some() && self.user_id == participant.user_id,
        }
    }
}

/// parse a json document of api records
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// parse api timestamps: rfc 3339, naive iso-8601 (taken as utc) or a bare date
pub fn parse_api_datetime(raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc());
        }
    }
    Err(TrackerError::InvalidDate {
        message: format!("unrecognized timestamp {raw:?}"),
    })
}

fn default_true() -> bool {
    true
}

mod api_datetime {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&dt.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_api_datetime(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
            match dt {
                Some(dt) => s.serialize_some(&dt.to_rfc3339()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(d)? {
                Some(raw) => super::super::parse_api_datetime(&raw)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_payment_from_api_json() {
        let json = r#"{
            "id": 7,
            "group_id": 1,
            "participant_id": 3,
            "amount": 5.5,
            "payment_date": "2024-02-15T10:30:00",
            "is_verified": true
        }"#;
        let payment: Payment = from_json(json).unwrap();

        assert_eq!(payment.amount, Money::from_minor(550));
        assert_eq!(payment.payment_date, Utc.with_ymd_and_hms(2024, 2, 15, 10, 30, 0).unwrap());
        assert!(payment.is_verified);
        assert_eq!(payment.user_id, None);
    }

    #[test]
    fn test_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap();
        assert_eq!(parse_api_datetime("2024-01-10T08:00:00Z").unwrap(), expected);
        assert_eq!(parse_api_datetime("2024-01-10T09:00:00+01:00").unwrap(), expected);
        assert_eq!(parse_api_datetime("2024-01-10T08:00:00.000000").unwrap(), expected);
        assert_eq!(parse_api_datetime("2024-01-10 08:00:00").unwrap(), expected);
        assert_eq!(
            parse_api_datetime("2024-01-10").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap()
        );
        assert!(matches!(
            parse_api_datetime("yesterday"),
            Err(TrackerError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_group_keeps_raw_frequency() {
        let json = r#"{
            "id": 1,
            "name": "Flat",
            "payment_amount": "20.00",
            "payment_frequency": "biweekly",
            "public_id": "6f1c1f6e-3a43-4f0e-9f5e-0c1d2e3f4a5b"
        }"#;
        let group: Group = from_json(json).unwrap();

        assert!(group.is_active);
        assert!(matches!(group.frequency(), Err(TrackerError::InvalidFrequency { .. })));
    }

    #[test]
    fn test_display_names() {
        let user = User { id: 10, full_name: "Ana Ruiz".to_string(), email: None };
        assert_eq!(Participant::member(1, 1, user).display_name(), "Ana Ruiz");
        assert_eq!(Participant::guest(2, 1, "Leo").display_name(), "Leo");

        let mut nameless = Participant::guest(3, 1, "x");
        nameless.guest_name = None;
        assert_eq!(nameless.display_name(), GUEST_FALLBACK_NAME);
    }

    #[test]
    fn test_payment_ownership() {
        let user = User { id: 10, full_name: "Ana".to_string(), email: None };
        let ana = Participant::member(1, 1, user);
        let guest = Participant::guest(2, 1, "Leo");
        let when = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        let linked = Payment::new(1, 1, 1, Money::from_major(5), when);
        assert!(linked.belongs_to(&ana));
        assert!(!linked.belongs_to(&guest));

        let legacy = Payment::legacy(2, 1, 10, Money::from_major(5), when);
        assert!(legacy.is_legacy());
        assert!(legacy.belongs_to(&ana));
        assert!(!legacy.belongs_to(&guest));

        // a participant link wins over a matching user id
        let mut relinked = Payment::new(3, 1, 2, Money::from_major(5), when);
        relinked.user_id = Some(10);
        assert!(!relinked.belongs_to(&ana));
    }
}
