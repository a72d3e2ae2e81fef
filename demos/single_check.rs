//! Single shortfall penalty check.
//!
//! Walks through the three outcomes of an assessment: safe, within
//! limits, and penalty applicable, plus rate escalation for repeat
//! violations.

use margin_penalty::core::input::{MarginInput, PenaltyRate};
use margin_penalty::core::money::{format_rupees, Grouping};
use margin_penalty::penalty::calculator::PenaltyCalculator;
use margin_penalty::penalty::report::AssessmentReport;
use rust_decimal_macros::dec;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("╔══════════════════════════════════════════╗");
    println!("║  margin-penalty: Single Shortfall Check  ║");
    println!("╚══════════════════════════════════════════╝\n");

    let grouping = Grouping::Indian;

    // --- Scenario 1: Margin covers the requirement ---
    println!("━━━ Scenario 1: Sufficient Margin ━━━\n");
    let input = MarginInput::new(dec!(600000), dec!(550000), PenaltyRate::Standard)?;
    let result = PenaltyCalculator::assess(&input);
    println!("{}", AssessmentReport::new(&input, &result, grouping));

    // --- Scenario 2: Small shortfall below both thresholds ---
    println!("━━━ Scenario 2: Within Limits ━━━\n");
    let input = MarginInput::new(dec!(910000), dec!(1000000), PenaltyRate::Standard)?;
    let result = PenaltyCalculator::assess(&input);
    println!("{}", AssessmentReport::new(&input, &result, grouping));

    // --- Scenario 3: Peak margin shortfall ---
    println!("━━━ Scenario 3: Penalty Applicable ━━━\n");
    let input = MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard)?;
    let result = PenaltyCalculator::assess(&input);
    println!("{}", AssessmentReport::new(&input, &result, grouping));

    // --- Scenario 4: Same shortfall, fourth consecutive day ---
    println!("━━━ Scenario 4: Repeat Violation ━━━\n");
    let repeat = input.with_consecutive_days(4)?;
    let escalated = PenaltyCalculator::assess(&repeat);
    println!("{}", AssessmentReport::new(&repeat, &escalated, grouping));
    println!(
        "Escalation adds {} to the payable amount.",
        format_rupees(escalated.total_penalty() - result.total_penalty(), grouping)
    );

    Ok(())
}
