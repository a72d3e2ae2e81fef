use crate::core::input::{MarginInput, PenaltyRate};
use crate::core::money::{format_percent, format_rupees, Grouping};
use crate::core::policy::{
    ESCALATED_RATE_PERCENT, ESCALATION_CONSECUTIVE_DAYS, ESCALATION_MONTHLY_INSTANCES,
    ONE_HUNDRED, PENALTY_AMOUNT_THRESHOLD, PENALTY_PERCENT_THRESHOLD,
};
use crate::penalty::breakdown::PenaltyBreakdown;
use crate::penalty::combined::{AssessedShortfall, CombinedAssessment, ShortfallSet, TotalOverflow};
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome class of an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyStatus {
    /// Margin covers the requirement.
    Safe,
    /// Shortfall exists but is below both thresholds.
    WithinLimits,
    /// Shortfall meets at least one threshold.
    Applicable,
}

impl PenaltyStatus {
    pub fn headline(&self) -> &'static str {
        match self {
            PenaltyStatus::Safe => "No Penalty - Safe!",
            PenaltyStatus::WithinLimits => "No Penalty - Within Limits!",
            PenaltyStatus::Applicable => "PENALTY APPLICABLE",
        }
    }
}

impl fmt::Display for PenaltyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.headline())
    }
}

/// Threshold that made a penalty applicable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerReason {
    /// Shortfall reached ₹1 lakh.
    ShortfallAmount { shortfall: Decimal },
    /// Shortfall reached 10% of required margin.
    ShortfallPercentage { shortfall_pct: Decimal },
}

impl TriggerReason {
    /// Reason text with the shortfall amount in the given grouping.
    pub fn describe(&self, grouping: Grouping) -> String {
        match self {
            TriggerReason::ShortfallAmount { shortfall } => {
                format!("Shortfall ≥ ₹1 lakh ({})", format_rupees(*shortfall, grouping))
            }
            TriggerReason::ShortfallPercentage { shortfall_pct } => {
                format!("Shortfall ≥ 10% ({})", format_percent(*shortfall_pct))
            }
        }
    }
}

impl fmt::Display for TriggerReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe(Grouping::Western))
    }
}

/// Why the rate was escalated to 5%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationCause {
    /// More than 3 consecutive days of shortfall.
    ConsecutiveDays,
    /// More than 5 shortfall instances this month.
    MonthlyInstances,
}

impl fmt::Display for EscalationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EscalationCause::ConsecutiveDays => f.write_str("consecutive violations"),
            EscalationCause::MonthlyInstances => f.write_str("multiple monthly instances"),
        }
    }
}

/// Result of assessing one [`MarginInput`].
///
/// Derived entirely from its input and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PenaltyResult {
    shortfall: Decimal,
    shortfall_pct: Decimal,
    status: PenaltyStatus,
    penalty_applicable: bool,
    trigger_reasons: Vec<TriggerReason>,
    effective_rate: Decimal,
    escalation: Option<EscalationCause>,
    breakdown: Option<PenaltyBreakdown>,
}

impl PenaltyResult {
    /// Shortfall of available against required margin, never negative.
    pub fn shortfall(&self) -> Decimal {
        self.shortfall
    }

    /// Shortfall as a percentage of required margin, in [0, 100].
    pub fn shortfall_pct(&self) -> Decimal {
        self.shortfall_pct
    }

    /// Shortfall percentage as `f64`, for display.
    pub fn shortfall_pct_f64(&self) -> f64 {
        self.shortfall_pct.to_string().parse::<f64>().unwrap_or(0.0)
    }

    pub fn status(&self) -> PenaltyStatus {
        self.status
    }

    pub fn is_safe(&self) -> bool {
        self.status == PenaltyStatus::Safe
    }

    pub fn is_penalty_applicable(&self) -> bool {
        self.penalty_applicable
    }

    /// Reasons a penalty applies, amount threshold first. Empty unless
    /// the status is [`PenaltyStatus::Applicable`].
    pub fn trigger_reasons(&self) -> &[TriggerReason] {
        &self.trigger_reasons
    }

    /// Trigger reasons rendered as text.
    pub fn trigger_messages(&self) -> Vec<String> {
        self.trigger_reasons.iter().map(|r| r.to_string()).collect()
    }

    /// Rate in percent after escalation.
    pub fn effective_rate(&self) -> Decimal {
        self.effective_rate
    }

    pub fn escalation(&self) -> Option<EscalationCause> {
        self.escalation
    }

    pub fn breakdown(&self) -> Option<&PenaltyBreakdown> {
        self.breakdown.as_ref()
    }

    /// Penalty before tax; zero when no penalty applies.
    pub fn penalty_amount(&self) -> Decimal {
        self.breakdown
            .as_ref()
            .map_or(Decimal::ZERO, |b| b.penalty_amount)
    }

    /// GST on the penalty; zero when no penalty applies.
    pub fn gst_amount(&self) -> Decimal {
        self.breakdown.as_ref().map_or(Decimal::ZERO, |b| b.gst_amount)
    }

    /// Total payable; zero when no penalty applies.
    pub fn total_penalty(&self) -> Decimal {
        self.breakdown
            .as_ref()
            .map_or(Decimal::ZERO, |b| b.total_penalty)
    }
}

/// The penalty rule set.
///
/// Every operation is a pure function of its arguments.
pub struct PenaltyCalculator;

impl PenaltyCalculator {
    /// `max(0, required - available)`.
    pub fn shortfall(input: &MarginInput) -> Decimal {
        (input.margin_required() - input.margin_available()).max(Decimal::ZERO)
    }

    /// Shortfall as a percentage of `required`; zero when nothing is required.
    ///
    /// Divides first: the ratio never exceeds 1, so the result stays in
    /// range for any representable requirement.
    pub fn shortfall_percent(shortfall: Decimal, required: Decimal) -> Decimal {
        if required > Decimal::ZERO {
            shortfall / required * ONE_HUNDRED
        } else {
            Decimal::ZERO
        }
    }

    /// Escalation cause, if the violation history forces the 5% rate.
    ///
    /// Independent of whether the shortfall itself is penalised.
    pub fn escalation(input: &MarginInput) -> Option<EscalationCause> {
        if input.consecutive_days() > ESCALATION_CONSECUTIVE_DAYS {
            Some(EscalationCause::ConsecutiveDays)
        } else if input.monthly_instances() > ESCALATION_MONTHLY_INSTANCES {
            Some(EscalationCause::MonthlyInstances)
        } else {
            None
        }
    }

    /// Rate in percent after escalation.
    pub fn effective_rate(input: &MarginInput) -> Decimal {
        match Self::escalation(input) {
            Some(_) => ESCALATED_RATE_PERCENT,
            None => input.base_penalty_rate().percent(),
        }
    }

    /// Assess one shortfall.
    ///
    /// # Algorithm
    ///
    /// 1. Shortfall and its percentage of required margin.
    /// 2. Applicable when the shortfall is at least ₹1 lakh or at least
    ///    10%. Either is enough; both are reported.
    /// 3. More than 3 consecutive days or more than 5 monthly instances
    ///    force a 5% rate.
    /// 4. Applicable shortfalls pay `rate% x shortfall` plus 18% GST.
    ///
    /// # Examples
    ///
    /// ```
    /// use margin_penalty::core::input::{MarginInput, PenaltyRate};
    /// use margin_penalty::penalty::calculator::{PenaltyCalculator, PenaltyStatus};
    /// use rust_decimal_macros::dec;
    ///
    /// let input = MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard).unwrap();
    /// let result = PenaltyCalculator::assess(&input);
    ///
    /// assert_eq!(result.status(), PenaltyStatus::Applicable);
    /// assert_eq!(result.shortfall(), dec!(4993110.32));
    /// assert_eq!(result.penalty_amount(), dec!(49931.1032));
    /// ```
    pub fn assess(input: &MarginInput) -> PenaltyResult {
        let shortfall = Self::shortfall(input);
        let shortfall_pct = Self::shortfall_percent(shortfall, input.margin_required());

        let by_amount = shortfall >= PENALTY_AMOUNT_THRESHOLD;
        let by_percentage = shortfall_pct >= PENALTY_PERCENT_THRESHOLD;
        let penalty_applicable = by_amount || by_percentage;

        let escalation = Self::escalation(input);
        let effective_rate = Self::effective_rate(input);
        if let Some(cause) = escalation {
            if input.base_penalty_rate() != PenaltyRate::Severe {
                warn!(
                    "penalty rate raised from {} to {}% due to {}",
                    input.base_penalty_rate(),
                    effective_rate,
                    cause
                );
            }
        }

        debug!(
            "shortfall={} pct={} by_amount={} by_percentage={}",
            shortfall, shortfall_pct, by_amount, by_percentage
        );

        let (status, trigger_reasons, breakdown) = if shortfall.is_zero() {
            (PenaltyStatus::Safe, Vec::new(), None)
        } else if !penalty_applicable {
            (PenaltyStatus::WithinLimits, Vec::new(), None)
        } else {
            let mut reasons = Vec::with_capacity(2);
            if by_amount {
                reasons.push(TriggerReason::ShortfallAmount { shortfall });
            }
            if by_percentage {
                reasons.push(TriggerReason::ShortfallPercentage { shortfall_pct });
            }
            (
                PenaltyStatus::Applicable,
                reasons,
                Some(PenaltyBreakdown::compute(effective_rate, shortfall)),
            )
        };

        PenaltyResult {
            shortfall,
            shortfall_pct,
            status,
            penalty_applicable,
            trigger_reasons,
            effective_rate,
            escalation,
            breakdown,
        }
    }

    /// Assess every shortfall in a set independently and total them.
    ///
    /// Fails only when a total exceeds the range of [`Decimal`].
    pub fn assess_all(set: &ShortfallSet) -> Result<CombinedAssessment, TotalOverflow> {
        let assessments = set
            .entries()
            .iter()
            .map(|entry| AssessedShortfall {
                entry: entry.clone(),
                result: Self::assess(entry.input()),
            })
            .collect();
        CombinedAssessment::new(assessments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(available: Decimal, required: Decimal) -> MarginInput {
        MarginInput::new(available, required, PenaltyRate::Standard).unwrap()
    }

    #[test]
    fn test_no_shortfall_is_safe() {
        let result = PenaltyCalculator::assess(&input(dec!(500000), dec!(400000)));
        assert_eq!(result.status(), PenaltyStatus::Safe);
        assert!(result.is_safe());
        assert_eq!(result.shortfall(), Decimal::ZERO);
        assert_eq!(result.shortfall_pct(), Decimal::ZERO);
        assert!(!result.is_penalty_applicable());
        assert!(result.trigger_reasons().is_empty());
        assert!(result.breakdown().is_none());
        assert_eq!(result.total_penalty(), Decimal::ZERO);
    }

    #[test]
    fn test_zero_required_does_not_divide() {
        let result = PenaltyCalculator::assess(&input(Decimal::ZERO, Decimal::ZERO));
        assert_eq!(result.shortfall_pct(), Decimal::ZERO);
        assert!(result.is_safe());
    }

    #[test]
    fn test_amount_threshold_is_inclusive() {
        // 100000 short of 10,000,000 is 1%, so only the amount trips.
        let result = PenaltyCalculator::assess(&input(dec!(9900000), dec!(10000000)));
        assert_eq!(result.shortfall(), dec!(100000));
        assert!(result.is_penalty_applicable());
        assert_eq!(
            result.trigger_reasons(),
            &[TriggerReason::ShortfallAmount {
                shortfall: dec!(100000)
            }]
        );
    }

    #[test]
    fn test_percentage_threshold_is_inclusive() {
        let result = PenaltyCalculator::assess(&input(dec!(90000), dec!(100000)));
        assert_eq!(result.shortfall(), dec!(10000));
        assert_eq!(result.shortfall_pct(), dec!(10));
        assert!(result.is_penalty_applicable());
        assert_eq!(result.trigger_messages(), vec!["Shortfall ≥ 10% (10.00%)"]);
    }

    #[test]
    fn test_both_thresholds_reported_in_order() {
        let result = PenaltyCalculator::assess(&input(Decimal::ZERO, dec!(100000)));
        assert_eq!(result.shortfall(), dec!(100000));
        assert_eq!(result.shortfall_pct(), dec!(100));
        assert_eq!(
            result.trigger_messages(),
            vec![
                "Shortfall ≥ ₹1 lakh (₹100,000.00)".to_string(),
                "Shortfall ≥ 10% (100.00%)".to_string(),
            ]
        );
    }

    #[test]
    fn test_within_limits() {
        let result = PenaltyCalculator::assess(&input(dec!(910000), dec!(1000000)));
        assert_eq!(result.shortfall(), dec!(90000));
        assert_eq!(result.shortfall_pct(), dec!(9));
        assert_eq!(result.status(), PenaltyStatus::WithinLimits);
        assert!(!result.is_penalty_applicable());
        assert!(result.trigger_reasons().is_empty());
        assert_eq!(result.penalty_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_escalation_by_days() {
        let i = MarginInput::new(Decimal::ZERO, dec!(200000), PenaltyRate::Minor)
            .unwrap()
            .with_consecutive_days(4)
            .unwrap();
        let result = PenaltyCalculator::assess(&i);
        assert_eq!(result.effective_rate(), dec!(5.0));
        assert_eq!(result.escalation(), Some(EscalationCause::ConsecutiveDays));
        assert_eq!(result.penalty_amount(), dec!(10000));
        assert_eq!(result.gst_amount(), dec!(1800));
        assert_eq!(result.total_penalty(), dec!(11800));
    }

    #[test]
    fn test_escalation_by_instances() {
        let i = input(Decimal::ZERO, dec!(1000))
            .with_monthly_instances(6)
            .unwrap();
        assert_eq!(
            PenaltyCalculator::escalation(&i),
            Some(EscalationCause::MonthlyInstances)
        );
        assert_eq!(PenaltyCalculator::effective_rate(&i), dec!(5.0));
    }

    #[test]
    fn test_escalation_days_take_precedence() {
        let i = input(Decimal::ZERO, dec!(1000))
            .with_consecutive_days(5)
            .unwrap()
            .with_monthly_instances(9)
            .unwrap();
        assert_eq!(
            PenaltyCalculator::escalation(&i),
            Some(EscalationCause::ConsecutiveDays)
        );
    }

    #[test]
    fn test_escalation_boundaries_do_not_fire() {
        let i = input(Decimal::ZERO, dec!(1000))
            .with_consecutive_days(3)
            .unwrap()
            .with_monthly_instances(5)
            .unwrap();
        assert_eq!(PenaltyCalculator::escalation(&i), None);
        assert_eq!(PenaltyCalculator::effective_rate(&i), dec!(1.0));
    }

    #[test]
    fn test_escalation_does_not_force_applicability() {
        let i = input(dec!(910000), dec!(1000000))
            .with_consecutive_days(7)
            .unwrap();
        let result = PenaltyCalculator::assess(&i);
        assert_eq!(result.effective_rate(), dec!(5.0));
        assert_eq!(result.status(), PenaltyStatus::WithinLimits);
        assert!(result.breakdown().is_none());
    }

    #[test]
    fn test_worked_scenario() {
        let result = PenaltyCalculator::assess(&input(dec!(368578.89), dec!(5361689.21)));
        assert_eq!(result.shortfall(), dec!(4993110.32));
        assert_eq!(result.shortfall_pct().round_dp(2), dec!(93.13));
        assert_eq!(result.penalty_amount(), dec!(49931.1032));
        assert_eq!(result.gst_amount(), dec!(8987.598576));
        assert_eq!(result.total_penalty().round_dp(2), dec!(58918.70));
        assert_eq!(result.trigger_reasons().len(), 2);
    }

    #[test]
    fn test_largest_requirement_does_not_overflow() {
        let result = PenaltyCalculator::assess(&input(Decimal::ZERO, Decimal::MAX));
        assert_eq!(result.shortfall(), Decimal::MAX);
        assert_eq!(result.shortfall_pct(), dec!(100));
        assert_eq!(result.status(), PenaltyStatus::Applicable);
        assert_eq!(result.trigger_reasons().len(), 2);
        assert!(result.total_penalty() > result.penalty_amount());
    }

    #[test]
    fn test_trigger_reason_grouping() {
        let reason = TriggerReason::ShortfallAmount {
            shortfall: dec!(4993110.32),
        };
        assert_eq!(reason.to_string(), "Shortfall ≥ ₹1 lakh (₹4,993,110.32)");
        assert_eq!(
            reason.describe(Grouping::Indian),
            "Shortfall ≥ ₹1 lakh (₹49,93,110.32)"
        );
    }

    #[test]
    fn test_huge_requirement_with_partial_cover() {
        let required = Decimal::from_i128_with_scale(10i128.pow(27), 0);
        let available = required * dec!(0.9);
        let result = PenaltyCalculator::assess(&input(available, required));
        assert_eq!(result.shortfall(), required / dec!(10));
        assert_eq!(result.shortfall_pct(), dec!(10));
        assert!(result.is_penalty_applicable());
    }
}
