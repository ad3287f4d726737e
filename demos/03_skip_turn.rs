/// skip turn - pass over the next payer without recording a payment
use chrono::{Duration, TimeZone, Utc};
use paycontrol_ledger::{
    reassign_with, Frequency, Group, GroupLedger, Money, Participant, Payment, SkipPolicy,
    TrackerConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== skip turn ===\n");

    let as_of = Utc.with_ymd_and_hms(2024, 5, 20, 18, 0, 0).unwrap();
    let group = Group::new(2, "Team lunch", Money::from_major(60), Frequency::Weekly);
    let participants = vec![
        Participant::guest(1, 2, "Ana"),
        Participant::guest(2, 2, "Leo"),
        Participant::guest(3, 2, "Mia"),
        Participant::guest(4, 2, "Noa"),
    ];
    let payments = vec![
        Payment::new(1, 2, 1, Money::from_major(60), as_of - Duration::days(21)),
        Payment::new(2, 2, 2, Money::from_major(60), as_of - Duration::days(14)),
        Payment::new(3, 2, 3, Money::from_major(60), as_of - Duration::days(7)),
    ];
    let ledger = GroupLedger::new(TrackerConfig::default(), group, participants, payments)?;

    let ranking = ledger.rank(&as_of);
    println!("ranking: {:?}", ranking.iter().map(|e| e.name.as_str()).collect::<Vec<_>>());

    // only the head can be skipped by default
    let head = ranking.head().ok_or("empty ranking")?.participant_id;
    let skip = ledger.reassign(head, &as_of)?;
    println!("skipped {}, next up {:?}", skip.skipped.name, skip.next.as_ref().map(|e| &e.name));
    println!("next round: {:?}", skip.rotated().iter().map(|e| e.name.as_str()).collect::<Vec<_>>());

    if let Err(e) = ledger.reassign(3, &as_of) {
        println!("skipping mia: {e}");
    }

    // any member can be skipped under the relaxed policy
    let skip = reassign_with(&ranking, 2, SkipPolicy::AnyPosition)?;
    println!("skipped {}, next up {:?}", skip.skipped.name, skip.next.map(|e| e.name));

    Ok(())
}
