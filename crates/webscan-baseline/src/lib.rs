//! WebScan Baseline Data
//!
//! Support-tier database and the resolved feature model shared by the
//! HTML and CSS scanners. The database maps feature ids and BCD-style
//! dotted keys to Baseline availability tiers ("high", "low" or `false`);
//! everything downstream works in terms of [`BaselineFeature`] records.

mod db;
mod feature;
mod merge;

pub use db::{BaselineTier, DbEntry, DbStatus, SupportDb, TierLevel, format_feature_name};
pub use feature::{BaselineFeature, BaselineStatus, BaselineSummary, summarize};
pub use merge::merge_features;

/// Support database error
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("invalid support database JSON: {0}")]
    InvalidDatabase(#[from] serde_json::Error),
}
