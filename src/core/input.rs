use crate::core::policy::{MAX_CONSECUTIVE_DAYS, MAX_MONTHLY_INSTANCES};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Input field names, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputField {
    MarginAvailable,
    MarginRequired,
    BasePenaltyRate,
    ConsecutiveDays,
    MonthlyInstances,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::MarginAvailable => "margin_available",
            InputField::MarginRequired => "margin_required",
            InputField::BasePenaltyRate => "base_penalty_rate",
            InputField::ConsecutiveDays => "consecutive_days",
            InputField::MonthlyInstances => "monthly_instances",
        };
        f.write_str(name)
    }
}

/// Out-of-range input, rejected before any computation runs.
///
/// Values are never clamped into range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{field} must be non-negative, got {value}")]
    NegativeAmount { field: InputField, value: Decimal },
    #[error("{field} must be between 0 and {max}, got {value}")]
    CounterOutOfRange {
        field: InputField,
        value: u32,
        max: u32,
    },
    #[error("penalty rate must be one of 0.5, 1.0 or 5.0 percent, got {rate}")]
    UnsupportedRate { rate: Decimal },
}

/// Base penalty rate chosen by the caller.
///
/// Rates are percentages of the shortfall, not fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub enum PenaltyRate {
    /// 0.5%
    Minor,
    /// 1.0%
    #[default]
    Standard,
    /// 5.0%
    Severe,
}

impl PenaltyRate {
    pub const ALL: [PenaltyRate; 3] = [PenaltyRate::Minor, PenaltyRate::Standard, PenaltyRate::Severe];

    /// The rate as a percentage.
    pub fn percent(&self) -> Decimal {
        match self {
            PenaltyRate::Minor => dec!(0.5),
            PenaltyRate::Standard => dec!(1.0),
            PenaltyRate::Severe => dec!(5.0),
        }
    }

    /// Kind of violation this rate is meant for.
    pub fn description(&self) -> &'static str {
        match self {
            PenaltyRate::Minor => "Minor violations",
            PenaltyRate::Standard => "Standard violations",
            PenaltyRate::Severe => "Severe/Repeated violations (>3 days or >5 instances/month)",
        }
    }
}

impl TryFrom<Decimal> for PenaltyRate {
    type Error = InputError;

    fn try_from(rate: Decimal) -> Result<Self, Self::Error> {
        PenaltyRate::ALL
            .into_iter()
            .find(|r| r.percent() == rate)
            .ok_or(InputError::UnsupportedRate { rate })
    }
}

impl From<PenaltyRate> for Decimal {
    fn from(rate: PenaltyRate) -> Self {
        rate.percent()
    }
}

impl fmt::Display for PenaltyRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Margin figures and violation history for a single shortfall check.
///
/// A `MarginInput` can only exist in a valid state: amounts are
/// non-negative, the counters are within their maxima and the rate is one
/// of the supported values. Deserialization runs the same checks.
///
/// # Examples
///
/// ```
/// use margin_penalty::core::input::{MarginInput, PenaltyRate};
/// use rust_decimal_macros::dec;
///
/// let input = MarginInput::new(dec!(368578.89), dec!(5361689.21), PenaltyRate::Standard)
///     .unwrap()
///     .with_consecutive_days(2)
///     .unwrap();
///
/// assert_eq!(input.consecutive_days(), 2);
/// assert!(MarginInput::new(dec!(-1), dec!(100), PenaltyRate::Minor).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMarginInput")]
pub struct MarginInput {
    margin_available: Decimal,
    margin_required: Decimal,
    base_penalty_rate: PenaltyRate,
    consecutive_days: u32,
    monthly_instances: u32,
}

impl MarginInput {
    /// Create an input with no violation history.
    pub fn new(
        margin_available: Decimal,
        margin_required: Decimal,
        base_penalty_rate: PenaltyRate,
    ) -> Result<Self, InputError> {
        check_amount(InputField::MarginAvailable, margin_available)?;
        check_amount(InputField::MarginRequired, margin_required)?;
        Ok(Self {
            margin_available,
            margin_required,
            base_penalty_rate,
            consecutive_days: 0,
            monthly_instances: 0,
        })
    }

    /// Set the number of consecutive days the shortfall has persisted.
    pub fn with_consecutive_days(mut self, days: u32) -> Result<Self, InputError> {
        check_counter(InputField::ConsecutiveDays, days, MAX_CONSECUTIVE_DAYS)?;
        self.consecutive_days = days;
        Ok(self)
    }

    /// Set the number of shortfall instances in the current month.
    pub fn with_monthly_instances(mut self, instances: u32) -> Result<Self, InputError> {
        check_counter(InputField::MonthlyInstances, instances, MAX_MONTHLY_INSTANCES)?;
        self.monthly_instances = instances;
        Ok(self)
    }

    // --- Accessors ---

    pub fn margin_available(&self) -> Decimal {
        self.margin_available
    }

    pub fn margin_required(&self) -> Decimal {
        self.margin_required
    }

    pub fn base_penalty_rate(&self) -> PenaltyRate {
        self.base_penalty_rate
    }

    pub fn consecutive_days(&self) -> u32 {
        self.consecutive_days
    }

    pub fn monthly_instances(&self) -> u32 {
        self.monthly_instances
    }
}

fn check_amount(field: InputField, value: Decimal) -> Result<(), InputError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(InputError::NegativeAmount { field, value });
    }
    Ok(())
}

fn check_counter(field: InputField, value: u32, max: u32) -> Result<(), InputError> {
    if value > max {
        return Err(InputError::CounterOutOfRange { field, value, max });
    }
    Ok(())
}

/// Wire shape of [`MarginInput`] before validation.
#[derive(Debug, Deserialize)]
struct RawMarginInput {
    margin_available: Decimal,
    margin_required: Decimal,
    #[serde(default = "default_rate")]
    base_penalty_rate: Decimal,
    #[serde(default)]
    consecutive_days: u32,
    #[serde(default)]
    monthly_instances: u32,
}

fn default_rate() -> Decimal {
    PenaltyRate::default().percent()
}

impl TryFrom<RawMarginInput> for MarginInput {
    type Error = InputError;

    fn try_from(raw: RawMarginInput) -> Result<Self, Self::Error> {
        let rate = PenaltyRate::try_from(raw.base_penalty_rate)?;
        MarginInput::new(raw.margin_available, raw.margin_required, rate)?
            .with_consecutive_days(raw.consecutive_days)?
            .with_monthly_instances(raw.monthly_instances)
    }
}
