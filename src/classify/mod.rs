//! Record classification building blocks
//!
//! Leaf components of the pipeline, each a set of pure functions:
//! - [`normalize`] - identifier and status cleanup
//! - [`validity`] - "is this cell present" predicates
//! - [`parse`] - dates, durations, numbers into typed cells
//! - [`stage`] - which operational stage a record occupies
//! - [`severity`] - stage-specific tiering of a metric
//! - [`aggregate`] - severity-first ordering and counts

pub mod aggregate;
pub mod normalize;
pub mod parse;
pub mod severity;
pub mod stage;
pub mod validity;

#[cfg(test)]
pub mod tests;

pub use aggregate::{aggregate, order_by_severity};
pub use normalize::{normalize, normalize_header};
pub use parse::{parse_clock_time, parse_date, parse_duration, parse_number, parse_timestamp};
pub use severity::{
    Limit, SeverityBasis, ThresholdConfig, TierThresholds, classify_severity, tier,
};
pub use stage::classify_stage;
pub use validity::{is_present_value, is_present_with};
