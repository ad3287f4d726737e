/// period navigation - walk back and forth through payment periods
use chrono::NaiveDate;
use paycontrol_ledger::{period_for, shift, Direction, Frequency};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== period navigation ===\n");

    let anchor = NaiveDate::from_ymd_opt(2024, 12, 30).ok_or("bad anchor")?;

    for frequency in Frequency::ALL {
        let current = period_for(frequency, anchor)?;
        let prev = shift(&current, frequency, Direction::Prev)?;
        let next = shift(&current, frequency, Direction::Next)?;

        println!("{frequency}:");
        println!("  previous  {:<14} {} .. {}", prev.label(), prev.start, prev.end);
        println!("  current   {:<14} {} .. {}", current.label(), current.start, current.end);
        println!("  next      {:<14} {} .. {}", next.label(), next.start, next.end);
    }

    // unknown frequencies are rejected, never defaulted
    match Frequency::parse("biweekly") {
        Ok(f) => println!("\nparsed {f}"),
        Err(e) => println!("\nerror: {e}"),
    }

    Ok(())
}
