//! Random shortfall scenarios.
//!
//! Generates valid margin inputs spread across safe, within-limits and
//! penalised outcomes, for benchmarks and demo files.

use crate::core::input::{InputError, MarginInput, PenaltyRate};
use crate::core::policy::{MAX_CONSECUTIVE_DAYS, MAX_MONTHLY_INSTANCES};
use crate::penalty::combined::{ShortfallEntry, ShortfallSet};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Configuration for generating random shortfalls.
#[derive(Debug, Clone)]
pub struct ScenarioConfig {
    /// Number of shortfalls to generate.
    pub count: usize,
    /// Smallest required margin.
    pub min_required: Decimal,
    /// Largest required margin.
    pub max_required: Decimal,
    /// Available margin tops out at this fraction of the requirement.
    pub max_cover_ratio: Decimal,
    /// Base rates to draw from.
    pub rates: Vec<PenaltyRate>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            count: 10,
            min_required: Decimal::from(10_000),
            max_required: Decimal::from(10_000_000),
            max_cover_ratio: Decimal::new(12, 1),
            rates: PenaltyRate::ALL.to_vec(),
        }
    }
}

/// Generate random shortfalls with 2-decimal amounts.
pub fn generate_random_scenarios(config: &ScenarioConfig) -> Result<ShortfallSet, InputError> {
    let mut rng = rand::thread_rng();
    let mut set = ShortfallSet::new();

    let min_cents = to_cents(config.min_required);
    let max_cents = to_cents(config.max_required).max(min_cents);

    for i in 0..config.count {
        let required_cents = rng.gen_range(min_cents..=max_cents);
        let cover_cents = to_cents(Decimal::new(required_cents, 2) * config.max_cover_ratio);
        let available_cents = rng.gen_range(0..=cover_cents.max(0));

        let rate = if config.rates.is_empty() {
            PenaltyRate::default()
        } else {
            config.rates[rng.gen_range(0..config.rates.len())]
        };

        let input = MarginInput::new(
            Decimal::new(available_cents, 2),
            Decimal::new(required_cents, 2),
            rate,
        )?
        .with_consecutive_days(rng.gen_range(0..=MAX_CONSECUTIVE_DAYS))?
        .with_monthly_instances(rng.gen_range(0..=MAX_MONTHLY_INSTANCES))?;

        set.add(ShortfallEntry::new(input).with_label(format!("SCENARIO-{:03}", i)));
    }

    Ok(set)
}

fn to_cents(amount: Decimal) -> i64 {
    (amount.round_dp(2) * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .unwrap_or(0)
}
