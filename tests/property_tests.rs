use approx::assert_relative_eq;
use margin_penalty::core::input::{MarginInput, PenaltyRate};
use margin_penalty::core::policy::GST_RATE;
use margin_penalty::penalty::calculator::{PenaltyCalculator, PenaltyStatus};
use margin_penalty::penalty::combined::{ShortfallEntry, ShortfallSet};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Generate a random 2-decimal amount (0 to 100 crore).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (0i64..=100_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Generate a random base rate.
fn arb_rate() -> impl Strategy<Value = PenaltyRate> {
    prop::sample::select(PenaltyRate::ALL.to_vec())
}

/// Generate a random valid input.
fn arb_input() -> impl Strategy<Value = MarginInput> {
    (arb_amount(), arb_amount(), arb_rate(), 0u32..=10, 0u32..=30).prop_map(
        |(available, required, rate, days, instances)| {
            MarginInput::new(available, required, rate)
                .and_then(|i| i.with_consecutive_days(days))
                .and_then(|i| i.with_monthly_instances(instances))
                .unwrap()
        },
    )
}

proptest! {
    // ===================================================================
    // INVARIANT 1: Shortfall is max(0, required - available), never
    // more than required.
    // ===================================================================
    #[test]
    fn shortfall_is_clamped_difference(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        let expected = (input.margin_required() - input.margin_available()).max(Decimal::ZERO);
        prop_assert_eq!(result.shortfall(), expected);
        prop_assert!(result.shortfall() <= input.margin_required());
    }

    // ===================================================================
    // INVARIANT 2: Covered margin is always safe with nothing payable.
    // ===================================================================
    #[test]
    fn covered_margin_is_safe(required in arb_amount(), extra in arb_amount(), rate in arb_rate()) {
        let input = MarginInput::new(required + extra, required, rate).unwrap();
        let result = PenaltyCalculator::assess(&input);
        prop_assert_eq!(result.status(), PenaltyStatus::Safe);
        prop_assert_eq!(result.shortfall(), Decimal::ZERO);
        prop_assert!(result.breakdown().is_none());
        prop_assert!(result.trigger_reasons().is_empty());
    }

    // ===================================================================
    // INVARIANT 3: Shortfall percentage stays within [0, 100].
    // ===================================================================
    #[test]
    fn shortfall_pct_in_range(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        prop_assert!(result.shortfall_pct() >= Decimal::ZERO);
        prop_assert!(result.shortfall_pct() <= dec!(100));
    }

    // ===================================================================
    // INVARIANT 4: Assessment is deterministic.
    // ===================================================================
    #[test]
    fn assessment_is_deterministic(input in arb_input()) {
        let first = PenaltyCalculator::assess(&input);
        let second = PenaltyCalculator::assess(&input);
        prop_assert_eq!(first, second);
    }

    // ===================================================================
    // INVARIANT 5: GST is exactly 18% of the penalty and the total is
    // exactly 1.18x the penalty.
    // ===================================================================
    #[test]
    fn gst_relation_is_exact(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        if let Some(b) = result.breakdown() {
            prop_assert_eq!(b.gst_amount, b.penalty_amount * GST_RATE);
            prop_assert_eq!(b.total_penalty, b.penalty_amount * dec!(1.18));
            prop_assert_eq!(
                b.penalty_amount,
                result.effective_rate() / dec!(100) * result.shortfall()
            );
        }
    }

    // ===================================================================
    // INVARIANT 6: Status agrees with the thresholds.
    // ===================================================================
    #[test]
    fn status_matches_thresholds(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        let expected_applicable =
            result.shortfall() >= dec!(100000) || result.shortfall_pct() >= dec!(10);
        prop_assert_eq!(result.is_penalty_applicable(), expected_applicable);

        let expected_status = if result.shortfall().is_zero() {
            PenaltyStatus::Safe
        } else if expected_applicable {
            PenaltyStatus::Applicable
        } else {
            PenaltyStatus::WithinLimits
        };
        prop_assert_eq!(result.status(), expected_status);
        prop_assert_eq!(result.breakdown().is_some(), expected_status == PenaltyStatus::Applicable);
    }

    // ===================================================================
    // INVARIANT 7: Escalation forces 5% exactly when history demands it.
    // ===================================================================
    #[test]
    fn escalation_forces_severe_rate(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        let escalated = input.consecutive_days() > 3 || input.monthly_instances() > 5;
        if escalated {
            prop_assert_eq!(result.effective_rate(), dec!(5.0));
            prop_assert!(result.escalation().is_some());
        } else {
            prop_assert_eq!(result.effective_rate(), input.base_penalty_rate().percent());
            prop_assert!(result.escalation().is_none());
        }
    }

    // ===================================================================
    // INVARIANT 8: Grand total equals the sum of individual totals.
    // ===================================================================
    #[test]
    fn grand_total_sums_entries(inputs in prop::collection::vec(arb_input(), 0..20)) {
        let set: ShortfallSet = inputs.iter().cloned().map(ShortfallEntry::new).collect();
        let combined = PenaltyCalculator::assess_all(&set).unwrap();

        let manual: Decimal = inputs
            .iter()
            .map(|i| PenaltyCalculator::assess(i).total_penalty())
            .sum();
        prop_assert_eq!(combined.grand_total(), manual);
        prop_assert_eq!(combined.assessments().len(), inputs.len());
    }

    // ===================================================================
    // INVARIANT 9: The f64 display percentage tracks the exact value.
    // ===================================================================
    #[test]
    fn display_pct_tracks_decimal(input in arb_input()) {
        let result = PenaltyCalculator::assess(&input);
        let exact: f64 = result.shortfall_pct().round_dp(6).to_string().parse().unwrap();
        assert_relative_eq!(result.shortfall_pct_f64(), exact, epsilon = 1e-5);
    }
}
