use crate::core::input::MarginInput;
use crate::core::money::{format_percent, format_rupees, Grouping};
use crate::penalty::breakdown::BreakdownTable;
use crate::penalty::calculator::{PenaltyResult, PenaltyStatus};
use crate::penalty::combined::CombinedAssessment;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How an assessment is written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Raised when an output format name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown output format '{0}', expected 'text' or 'json'")]
pub struct ParseReportFormatError(String);

impl FromStr for ReportFormat {
    type Err = ParseReportFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            _ => Err(ParseReportFormatError(s.to_string())),
        }
    }
}

/// Text report of one assessment, every amount in a single grouping.
///
/// # Examples
///
/// ```
/// use margin_penalty::core::input::{MarginInput, PenaltyRate};
/// use margin_penalty::core::money::Grouping;
/// use margin_penalty::penalty::calculator::PenaltyCalculator;
/// use margin_penalty::penalty::report::AssessmentReport;
/// use rust_decimal_macros::dec;
///
/// let input = MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard).unwrap();
/// let result = PenaltyCalculator::assess(&input);
/// let text = AssessmentReport::new(&input, &result, Grouping::Indian).to_string();
///
/// assert!(text.contains("₹53,61,689.21"));
/// ```
pub struct AssessmentReport<'a> {
    input: &'a MarginInput,
    result: &'a PenaltyResult,
    grouping: Grouping,
}

impl<'a> AssessmentReport<'a> {
    pub fn new(input: &'a MarginInput, result: &'a PenaltyResult, grouping: Grouping) -> Self {
        Self {
            input,
            result,
            grouping,
        }
    }
}

impl fmt::Display for AssessmentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (input, result, g) = (self.input, self.result, self.grouping);
        let rate = input.base_penalty_rate();

        writeln!(f, "=== Penalty Assessment ===")?;
        writeln!(f, "Margin Required:  {}", format_rupees(input.margin_required(), g))?;
        writeln!(f, "Margin Available: {}", format_rupees(input.margin_available(), g))?;
        writeln!(f, "Shortfall:        {}", format_rupees(result.shortfall(), g))?;
        writeln!(f, "Shortfall %:      {}", format_percent(result.shortfall_pct()))?;
        writeln!(f, "Base Rate:        {} - {}", rate, rate.description())?;
        if let Some(cause) = result.escalation() {
            writeln!(f, "Penalty rate automatically increased to 5% due to {}", cause)?;
        }
        writeln!(f)?;
        writeln!(f, "{}", result.status())?;

        match result.status() {
            PenaltyStatus::Safe => {
                writeln!(f, "Your margin is sufficient. No shortfall detected.")?;
            }
            PenaltyStatus::WithinLimits => {
                writeln!(
                    f,
                    "Shortfall: {} ({})",
                    format_rupees(result.shortfall(), g),
                    format_percent(result.shortfall_pct())
                )?;
                writeln!(
                    f,
                    "Reason: Shortfall is below both thresholds (< ₹1 lakh AND < 10%)"
                )?;
            }
            PenaltyStatus::Applicable => {
                writeln!(f, "Trigger Condition(s):")?;
                for reason in result.trigger_reasons() {
                    writeln!(f, "  - {}", reason.describe(g))?;
                }
                if let Some(table) = BreakdownTable::from_assessment(input, result, g) {
                    writeln!(f)?;
                    write!(f, "{}", table)?;
                }
            }
        }
        Ok(())
    }
}

/// Text report of a combined assessment: each shortfall in full, then
/// the totals.
pub struct CombinedReport<'a> {
    combined: &'a CombinedAssessment,
    grouping: Grouping,
}

impl<'a> CombinedReport<'a> {
    pub fn new(combined: &'a CombinedAssessment, grouping: Grouping) -> Self {
        Self { combined, grouping }
    }
}

impl fmt::Display for CombinedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (combined, g) = (self.combined, self.grouping);

        for (n, a) in combined.assessments().iter().enumerate() {
            match a.entry.label() {
                Some(label) => writeln!(f, "━━━ {} ━━━", label)?,
                None => writeln!(f, "━━━ Shortfall #{} ━━━", n + 1)?,
            }
            if let Some(deadline) = a.entry.deadline() {
                writeln!(f, "Deadline: {}", deadline.format("%Y-%m-%d %I:%M %p"))?;
            }
            write!(f, "{}", AssessmentReport::new(a.entry.input(), &a.result, g))?;
            writeln!(f)?;
        }

        writeln!(f, "=== Combined Penalty ===")?;
        writeln!(f, "Shortfalls:      {}", combined.assessments().len())?;
        writeln!(f, "With Penalty:    {}", combined.applicable_count())?;
        writeln!(f, "Total Shortfall: {}", format_rupees(combined.total_shortfall(), g))?;
        writeln!(f, "Total Penalty:   {}", format_rupees(combined.total_penalty_amount(), g))?;
        writeln!(f, "Total GST:       {}", format_rupees(combined.total_gst(), g))?;
        writeln!(f, "Grand Total:     {}", format_rupees(combined.grand_total(), g))
    }
}
