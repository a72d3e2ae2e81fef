//! Multiple shortfalls on the same trading day.
//!
//! Two peak-margin snapshots short against the same available margin,
//! each with its own deadline, assessed independently and totalled.

use chrono::NaiveDate;
use margin_penalty::core::input::{MarginInput, PenaltyRate};
use margin_penalty::core::money::{format_rupees, Grouping};
use margin_penalty::penalty::calculator::PenaltyCalculator;
use margin_penalty::penalty::combined::{ShortfallEntry, ShortfallSet};
use margin_penalty::penalty::report::CombinedReport;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔════════════════════════════════════════════╗");
    println!("║  margin-penalty: Multiple Shortfalls Check  ║");
    println!("╚════════════════════════════════════════════╝\n");

    let available = dec!(368578.89);
    let day = NaiveDate::from_ymd_opt(2025, 1, 10).ok_or("invalid date")?;
    let next_day = day.succ_opt().ok_or("invalid date")?;

    let mut set = ShortfallSet::new();
    set.add(
        ShortfallEntry::new(MarginInput::new(
            available,
            dec!(5361689.21),
            PenaltyRate::Standard,
        )?)
        .with_label("Shortfall #1")
        .with_deadline(day.and_hms_opt(23, 59, 0).ok_or("invalid time")?),
    );
    set.add(
        ShortfallEntry::new(MarginInput::new(
            available,
            dec!(5163317.05),
            PenaltyRate::Standard,
        )?)
        .with_label("Shortfall #2")
        .with_deadline(next_day.and_hms_opt(9, 14, 0).ok_or("invalid time")?),
    );

    let grouping = Grouping::Indian;
    println!("Margin Available: {}\n", format_rupees(available, grouping));

    let combined = PenaltyCalculator::assess_all(&set)?;
    println!("{}", CombinedReport::new(&combined, grouping));

    println!(
        "Total combined penalty payable: {}",
        format_rupees(combined.grand_total(), grouping)
    );

    Ok(())
}
