/// quick start - minimal example to get started
use chrono::{TimeZone, Utc};
use paycontrol_ledger::{Frequency, Group, GroupLedger, Money, Participant, Payment, TrackerConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // a monthly group with three members
    let group = Group::new(1, "Flat expenses", Money::from_major(120), Frequency::Monthly);
    let participants = vec![
        Participant::guest(1, 1, "Ana"),
        Participant::guest(2, 1, "Leo"),
        Participant::guest(3, 1, "Mia"),
    ];
    let payments = vec![
        Payment::new(1, 1, 1, Money::from_major(120), Utc.with_ymd_and_hms(2024, 1, 28, 9, 0, 0).unwrap()).verified(),
        Payment::new(2, 1, 3, Money::from_major(120), Utc.with_ymd_and_hms(2024, 2, 6, 9, 0, 0).unwrap()),
    ];

    let ledger = GroupLedger::new(TrackerConfig::default(), group, participants, payments)?;
    let as_of = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();

    // who pays next
    for entry in &ledger.rank(&as_of) {
        println!("{:<4} {:>4} days", entry.name, entry.days_since_last);
    }

    // this month's totals
    println!("{}", ledger.stats_view(&ledger.current_period(&as_of)?, &as_of).to_json_pretty()?);

    Ok(())
}
