//! # margin-penalty
//!
//! Margin shortfall penalty calculator for exchange-traded securities
//! accounts.
//!
//! Given the margin available and the margin required, this crate decides
//! whether the shortfall attracts a penalty, escalates the rate for repeat
//! violations and computes the penalty, GST and total payable.
//!
//! ## Architecture
//!
//! - **core**: Validated inputs, policy constants, amount formatting
//! - **penalty**: The penalty rule set, breakdown tables, combined shortfalls,
//!   text reports
//! - **simulation**: Random scenario generation for benchmarks and demos

pub mod core;
pub mod penalty;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::input::{InputError, MarginInput, PenaltyRate};
    pub use crate::core::money::Grouping;
    pub use crate::penalty::breakdown::{BreakdownTable, PenaltyBreakdown};
    pub use crate::penalty::calculator::{
        EscalationCause, PenaltyCalculator, PenaltyResult, PenaltyStatus, TriggerReason,
    };
    pub use crate::penalty::combined::{
        CombinedAssessment, ShortfallEntry, ShortfallSet, TotalOverflow,
    };
    pub use crate::penalty::report::{AssessmentReport, CombinedReport, ReportFormat};
}
