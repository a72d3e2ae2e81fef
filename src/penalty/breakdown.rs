use crate::core::input::MarginInput;
use crate::core::money::{format_percent, format_rupees, Grouping};
use crate::core::policy::{GST_PERCENT, GST_RATE, ONE_HUNDRED};
use crate::penalty::calculator::PenaltyResult;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary breakdown of an applicable penalty.
///
/// All amounts are exact decimals; rounding happens only on display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyBreakdown {
    /// Rate applied to the shortfall, in percent.
    pub rate_percent: Decimal,
    /// Penalty on the shortfall before tax.
    pub penalty_amount: Decimal,
    /// GST levied on the penalty.
    pub gst_amount: Decimal,
    /// Penalty plus GST.
    pub total_penalty: Decimal,
}

impl PenaltyBreakdown {
    /// Compute penalty, GST and total for a shortfall at the given rate.
    pub fn compute(rate_percent: Decimal, shortfall: Decimal) -> Self {
        let penalty_amount = rate_percent / ONE_HUNDRED * shortfall;
        let gst_amount = penalty_amount * GST_RATE;
        Self {
            rate_percent,
            penalty_amount,
            gst_amount,
            total_penalty: penalty_amount + gst_amount,
        }
    }
}

/// One line of the detailed breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub description: String,
    pub amount: String,
}

/// Detailed, display-ready breakdown of an applicable penalty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakdownTable {
    pub rows: Vec<BreakdownRow>,
}

impl BreakdownTable {
    /// Build the table for an assessment. Returns `None` when no penalty
    /// applies.
    pub fn from_assessment(
        input: &MarginInput,
        result: &PenaltyResult,
        grouping: Grouping,
    ) -> Option<Self> {
        let breakdown = result.breakdown()?;

        let row = |description: String, amount: String| BreakdownRow {
            description,
            amount,
        };
        let rows = vec![
            row(
                "Margin Required".into(),
                format_rupees(input.margin_required(), grouping),
            ),
            row(
                "Margin Available".into(),
                format_rupees(input.margin_available(), grouping),
            ),
            row(
                "Shortfall Amount".into(),
                format_rupees(result.shortfall(), grouping),
            ),
            row(
                "Shortfall Percentage".into(),
                format_percent(result.shortfall_pct()),
            ),
            row(
                format!("{}% Penalty on Shortfall", breakdown.rate_percent),
                format_rupees(breakdown.penalty_amount, grouping),
            ),
            row(
                format!("{}% GST on Penalty", GST_PERCENT),
                format_rupees(breakdown.gst_amount, grouping),
            ),
            row(
                "Total Penalty".into(),
                format_rupees(breakdown.total_penalty, grouping),
            ),
        ];

        Some(Self { rows })
    }
}

impl std::fmt::Display for BreakdownTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let width = self
            .rows
            .iter()
            .map(|r| r.description.chars().count())
            .max()
            .unwrap_or(0);

        writeln!(f, "=== Detailed Breakdown ===")?;
        for r in &self.rows {
            writeln!(f, "{:<width$}  {}", r.description, r.amount, width = width)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::PenaltyRate;
    use crate::penalty::calculator::PenaltyCalculator;
    use rust_decimal_macros::dec;

    #[test]
    fn test_breakdown_compute() {
        let b = PenaltyBreakdown::compute(dec!(1.0), dec!(4993110.32));
        assert_eq!(b.penalty_amount, dec!(49931.1032));
        assert_eq!(b.gst_amount, dec!(8987.598576));
        assert_eq!(b.total_penalty, dec!(58918.701776));
    }

    #[test]
    fn test_breakdown_minor_rate() {
        let b = PenaltyBreakdown::compute(dec!(0.5), dec!(200000));
        assert_eq!(b.penalty_amount, dec!(1000));
        assert_eq!(b.gst_amount, dec!(180));
        assert_eq!(b.total_penalty, dec!(1180));
    }

    #[test]
    fn test_table_rows() {
        let input =
            MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard).unwrap();
        let result = PenaltyCalculator::assess(&input);
        let table = BreakdownTable::from_assessment(&input, &result, Grouping::Western).unwrap();

        assert_eq!(table.rows.len(), 7);
        assert_eq!(table.rows[0].amount, "₹5,361,689.21");
        assert_eq!(table.rows[2].amount, "₹4,993,110.32");
        assert_eq!(table.rows[3].amount, "93.13%");
        assert_eq!(table.rows[4].description, "1.0% Penalty on Shortfall");
        assert_eq!(table.rows[4].amount, "₹49,931.10");
        assert_eq!(table.rows[5].description, "18% GST on Penalty");
        assert_eq!(table.rows[5].amount, "₹8,987.60");
        assert_eq!(table.rows[6].amount, "₹58,918.70");
    }

    #[test]
    fn test_table_indian_grouping() {
        let input =
            MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard).unwrap();
        let result = PenaltyCalculator::assess(&input);
        let table = BreakdownTable::from_assessment(&input, &result, Grouping::Indian).unwrap();
        assert_eq!(table.rows[0].amount, "₹53,61,689.21");

        let rendered = table.to_string();
        assert!(rendered.contains("Total Penalty"));
        assert!(rendered.contains("₹58,918.70"));
    }

    #[test]
    fn test_no_table_without_penalty() {
        let input = MarginInput::new(dec!(910000), dec!(1000000), PenaltyRate::Standard).unwrap();
        let result = PenaltyCalculator::assess(&input);
        assert!(BreakdownTable::from_assessment(&input, &result, Grouping::Western).is_none());
    }
}
