use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rupee sign used for every displayed amount.
pub const RUPEE_SIGN: &str = "₹";

/// Digit grouping style for thousands separators.
///
/// `Western` groups by thousands (`4,993,110.32`). `Indian` groups the
/// last three digits and then pairs (`49,93,110.32`), matching lakh and
/// crore notation.
///
/// # Examples
///
/// ```
/// use margin_penalty::core::money::{format_amount, Grouping};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(5361689.21), Grouping::Western), "5,361,689.21");
/// assert_eq!(format_amount(dec!(5361689.21), Grouping::Indian), "53,61,689.21");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grouping {
    #[default]
    Western,
    Indian,
}

/// Raised when a grouping name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown digit grouping '{0}', expected 'western' or 'indian'")]
pub struct ParseGroupingError(String);

impl FromStr for Grouping {
    type Err = ParseGroupingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "western" => Ok(Grouping::Western),
            "indian" => Ok(Grouping::Indian),
            _ => Err(ParseGroupingError(s.to_string())),
        }
    }
}

impl fmt::Display for Grouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grouping::Western => write!(f, "western"),
            Grouping::Indian => write!(f, "indian"),
        }
    }
}

/// Round to two decimals, midpoint away from zero.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with two decimals and thousands separators.
pub fn format_amount(value: Decimal, grouping: Grouping) -> String {
    let rounded = round_currency(value);
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, group_digits(int_part, grouping), frac_part)
}

/// Format an amount as rupees, e.g. `₹4,993,110.32`.
pub fn format_rupees(value: Decimal, grouping: Grouping) -> String {
    let formatted = format_amount(value, grouping);
    match formatted.strip_prefix('-') {
        Some(unsigned) => format!("-{}{}", RUPEE_SIGN, unsigned),
        None => format!("{}{}", RUPEE_SIGN, formatted),
    }
}

/// Format a percentage with two decimals, e.g. `93.13%`.
pub fn format_percent(value: Decimal) -> String {
    format!("{:.2}%", round_currency(value))
}

fn group_digits(digits: &str, grouping: Grouping) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 2);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && is_group_boundary(len - i, grouping) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// True when a separator belongs before a digit with `remaining` digits
/// left (itself included).
fn is_group_boundary(remaining: usize, grouping: Grouping) -> bool {
    match grouping {
        Grouping::Western => remaining % 3 == 0,
        Grouping::Indian => remaining == 3 || (remaining > 3 && (remaining - 3) % 2 == 0),
    }
}
