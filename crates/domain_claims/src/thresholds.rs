//! Scoring weights and contradiction thresholds
//!
//! These are fixed by underwriting guidance rather than configuration, so
//! they live here as constants. The low-confidence threshold is shared with
//! extraction and is defined in `core_kernel`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub use core_kernel::LOW_CONFIDENCE_THRESHOLD;

/// Weight of the critical evidence tier
pub const TIER_1_WEIGHT: Decimal = dec!(0.6);
/// Weight of the important evidence tier
pub const TIER_2_WEIGHT: Decimal = dec!(0.3);
/// Weight of the supporting evidence tier
pub const TIER_3_WEIGHT: Decimal = dec!(0.1);

/// A critical-severity claim below this cost is contradictory
pub const CRITICAL_MIN_COST: Decimal = dec!(5000);
/// A severe-severity claim below this cost is contradictory
pub const SEVERE_MIN_COST: Decimal = dec!(1000);
/// A minor-severity claim above this cost is contradictory
pub const MINOR_MAX_COST: Decimal = dec!(50000);
/// Above this cost a liability assessment is expected
pub const HIGH_COST_ASSESSMENT_THRESHOLD: Decimal = dec!(25000);

/// Incidents older than this are flagged (two years)
pub const MAX_INCIDENT_AGE_DAYS: i64 = 730;

/// The checker never recommends more than this many questions
pub const MAX_RECOMMENDED_QUESTIONS: usize = 3;
