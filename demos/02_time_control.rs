/// time control - deterministic rankings with controlled time
use chrono::{Duration, TimeZone, Utc};
use paycontrol_ledger::{
    Frequency, Group, GroupLedger, Money, Participant, Payment, SafeTimeProvider, TimeSource,
    TrackerConfig,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("paycontrol_ledger=debug".parse()?))
        .init();

    println!("=== time control example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();

    let group = Group::new(7, "Coffee fund", Money::from_major(5), Frequency::Weekly);
    let participants = vec![
        Participant::guest(1, 7, "Ana").joined(time.now() - Duration::days(30)),
        Participant::guest(2, 7, "Leo").joined(time.now() - Duration::days(30)),
    ];
    let payments = vec![Payment::new(1, 7, 1, Money::from_major(5), time.now() - Duration::days(1))];
    let ledger = GroupLedger::new(TrackerConfig::default(), group, participants, payments)?;

    for _week in 0..3 {
        println!("{} ({})", time.now().format("%Y-%m-%d"), ledger.current_period_now(&time)?.label());
        for entry in &ledger.rank_now(&time) {
            println!("  {:<4} {:>4} days", entry.name, entry.days_since_last);
        }
        for overdue in ledger.overdue_now(&time)? {
            println!("  overdue: {} ({} days)", overdue.name, overdue.days_overdue);
        }
        for notification in ledger.notifications_now(&time)? {
            println!("  [{:?}] {}", notification.priority, notification.message);
        }

        controller.advance(Duration::days(7));
    }

    Ok(())
}
