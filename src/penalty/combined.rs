use crate::core::input::MarginInput;
use crate::penalty::calculator::PenaltyResult;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One shortfall in a combined check.
///
/// The label and deadline are carried for display only and never affect
/// the assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    /// Time by which the shortfall must be covered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deadline: Option<NaiveDateTime>,
    #[serde(flatten)]
    input: MarginInput,
}

impl ShortfallEntry {
    pub fn new(input: MarginInput) -> Self {
        Self {
            label: None,
            deadline: None,
            input,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_deadline(mut self, deadline: NaiveDateTime) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.deadline
    }

    pub fn input(&self) -> &MarginInput {
        &self.input
    }
}

/// Ordered, independent shortfalls to be assessed together.
///
/// # Examples
///
/// ```
/// use margin_penalty::core::input::{MarginInput, PenaltyRate};
/// use margin_penalty::penalty::calculator::PenaltyCalculator;
/// use margin_penalty::penalty::combined::{ShortfallEntry, ShortfallSet};
/// use rust_decimal_macros::dec;
///
/// let mut set = ShortfallSet::new();
/// for required in [dec!(5361689.21), dec!(5163317.05)] {
///     let input = MarginInput::new(dec!(368578.89), required, PenaltyRate::Standard).unwrap();
///     set.add(ShortfallEntry::new(input));
/// }
///
/// let combined = PenaltyCalculator::assess_all(&set).unwrap();
/// assert_eq!(combined.applicable_count(), 2);
/// assert_eq!(combined.grand_total().round_dp(2), dec!(115496.61));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortfallSet {
    shortfalls: Vec<ShortfallEntry>,
}

impl ShortfallSet {
    pub fn new() -> Self {
        Self {
            shortfalls: Vec::new(),
        }
    }

    pub fn add(&mut self, entry: ShortfallEntry) {
        self.shortfalls.push(entry);
    }

    pub fn entries(&self) -> &[ShortfallEntry] {
        &self.shortfalls
    }

    pub fn len(&self) -> usize {
        self.shortfalls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

impl FromIterator<ShortfallEntry> for ShortfallSet {
    fn from_iter<T: IntoIterator<Item = ShortfallEntry>>(iter: T) -> Self {
        Self {
            shortfalls: iter.into_iter().collect(),
        }
    }
}

/// A shortfall paired with its assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessedShortfall {
    pub entry: ShortfallEntry,
    pub result: PenaltyResult,
}

/// A combined total that does not fit in a [`Decimal`].
///
/// Each shortfall is assessed exactly; only their sum can exceed the
/// representable range.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("combined {total} exceeds the largest representable amount")]
pub struct TotalOverflow {
    pub total: &'static str,
}

/// Per-shortfall results and their totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedAssessment {
    assessments: Vec<AssessedShortfall>,
    total_shortfall: Decimal,
    total_penalty_amount: Decimal,
    total_gst: Decimal,
    grand_total: Decimal,
}

impl CombinedAssessment {
    pub(crate) fn new(assessments: Vec<AssessedShortfall>) -> Result<Self, TotalOverflow> {
        let sum = |total: &'static str, f: fn(&PenaltyResult) -> Decimal| {
            assessments
                .iter()
                .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(f(&a.result)))
                .ok_or(TotalOverflow { total })
        };
        let total_shortfall = sum("shortfall", PenaltyResult::shortfall)?;
        let total_penalty_amount = sum("penalty", PenaltyResult::penalty_amount)?;
        let total_gst = sum("GST", PenaltyResult::gst_amount)?;
        let grand_total = sum("total payable", PenaltyResult::total_penalty)?;

        Ok(Self {
            assessments,
            total_shortfall,
            total_penalty_amount,
            total_gst,
            grand_total,
        })
    }

    pub fn assessments(&self) -> &[AssessedShortfall] {
        &self.assessments
    }

    pub fn total_shortfall(&self) -> Decimal {
        self.total_shortfall
    }

    pub fn total_penalty_amount(&self) -> Decimal {
        self.total_penalty_amount
    }

    pub fn total_gst(&self) -> Decimal {
        self.total_gst
    }

    /// Sum of every shortfall's total payable.
    pub fn grand_total(&self) -> Decimal {
        self.grand_total
    }

    /// Number of shortfalls that attract a penalty.
    pub fn applicable_count(&self) -> usize {
        self.assessments
            .iter()
            .filter(|a| a.result.is_penalty_applicable())
            .count()
    }
}
