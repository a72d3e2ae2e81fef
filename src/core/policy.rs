//! Fixed exchange policy constants for margin shortfall penalties.
//!
//! These are regulatory values, not tunables. Changing one changes the
//! outcome of every assessment.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Shortfall amount (in rupees) at or above which a penalty applies.
pub const PENALTY_AMOUNT_THRESHOLD: Decimal = dec!(100000);

/// Shortfall percentage of required margin at or above which a penalty applies.
pub const PENALTY_PERCENT_THRESHOLD: Decimal = dec!(10);

/// GST levied on the penalty, as a fraction.
pub const GST_RATE: Decimal = dec!(0.18);

/// GST rate as a percentage, for labels.
pub const GST_PERCENT: Decimal = dec!(18);

/// Rate (percent) applied once a shortfall is escalated.
pub const ESCALATED_RATE_PERCENT: Decimal = dec!(5.0);

/// Escalation fires when consecutive shortfall days exceed this.
pub const ESCALATION_CONSECUTIVE_DAYS: u32 = 3;

/// Escalation fires when shortfall instances in the month exceed this.
pub const ESCALATION_MONTHLY_INSTANCES: u32 = 5;

/// Largest accepted consecutive-day counter.
pub const MAX_CONSECUTIVE_DAYS: u32 = 10;

/// Largest accepted monthly-instance counter.
pub const MAX_MONTHLY_INSTANCES: u32 = 30;

pub(crate) const ONE_HUNDRED: Decimal = dec!(100);
