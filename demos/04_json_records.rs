/// json records - load api records and print the public overdue board
use chrono::{TimeZone, Utc};
use paycontrol_ledger::{GroupLedger, TrackerConfig};
use tracing_subscriber::EnvFilter;

const GROUP: &str = r#"{
    "id": 3,
    "name": "Climbing gym",
    "description": "quarterly membership",
    "payment_amount": "240.00",
    "payment_frequency": "quarterly",
    "public_id": "0b3e7f52-1c4a-4f0e-8d7b-6a2c9e1f5d30"
}"#;

const PARTICIPANTS: &str = r#"[
    {"id": 1, "group_id": 3, "user_id": 10, "user": {"id": 10, "full_name": "Ana Vidal"}},
    {"id": 2, "group_id": 3, "guest_name": "Leo"},
    {"id": 3, "group_id": 3, "guest_name": "Mia", "joined_at": "2024-01-15T00:00:00"}
]"#;

const PAYMENTS: &str = r#"[
    {"id": 1, "group_id": 3, "participant_id": 1, "amount": "80.00", "payment_date": "2024-04-03T10:00:00", "is_verified": true},
    {"id": 2, "group_id": 3, "user_id": 10, "amount": "80.00", "payment_date": "2024-05-03T10:00:00", "is_verified": true},
    {"id": 3, "group_id": 3, "participant_id": 2, "amount": "80.00", "payment_date": "2024-05-20T08:00:00", "is_verified": false}
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== json records ===\n");

    let ledger = GroupLedger::from_json(TrackerConfig::public_board(), GROUP, PARTICIPANTS, PAYMENTS)?;
    let as_of = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    println!("public board");
    println!("------------");
    println!("{}\n", ledger.public_board(&as_of)?.to_json_pretty()?);

    println!("contributions");
    println!("-------------");
    for contribution in ledger.contributions() {
        println!("{:<10} {:>8} ({} payments)", contribution.name, contribution.total_amount, contribution.payment_count);
    }

    println!("\nconfig");
    println!("------");
    println!("{}", ledger.config().to_json_pretty()?);

    Ok(())
}
