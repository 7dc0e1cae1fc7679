//! Resolved feature model
//!
//! The canonical output unit of a scan, plus the per-scan summary fold.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Cross-browser availability tier of a detected feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaselineStatus {
    #[serde(rename = "Widely available")]
    WidelyAvailable,
    #[serde(rename = "Newly available")]
    NewlyAvailable,
    #[serde(rename = "Limited availability")]
    LimitedAvailability,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl BaselineStatus {
    /// Display label, matching the scan report strings.
    pub fn label(self) -> &'static str {
        match self {
            BaselineStatus::WidelyAvailable => "Widely available",
            BaselineStatus::NewlyAvailable => "Newly available",
            BaselineStatus::LimitedAvailability => "Limited availability",
            BaselineStatus::Unknown => "Unknown",
        }
    }

    /// Highlight marker token for the annotator. `Unknown` carries none.
    pub fn highlight_class(self) -> Option<&'static str> {
        match self {
            BaselineStatus::WidelyAvailable => Some("highlight-widely-available"),
            BaselineStatus::NewlyAvailable => Some("highlight-newly-available"),
            BaselineStatus::LimitedAvailability => Some("highlight-limited-availability"),
            BaselineStatus::Unknown => None,
        }
    }
}

impl fmt::Display for BaselineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A detected web-platform feature, resolved against the support database.
///
/// `selector` is present only for HTML-origin features and is used by the
/// annotator to re-locate matching nodes. `highlight_class` is absent when
/// the status is `Unknown`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineFeature {
    pub name: String,
    pub status: BaselineStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_class: Option<String>,
}

/// Per-scan tally of resolved features by availability tier.
///
/// `total` is the list length. `Unknown` entries count toward `total` but
/// toward no bucket, so the three counters sum to at most `total`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineSummary {
    pub widely_available: usize,
    pub newly_available: usize,
    pub limited_availability: usize,
    pub total: usize,
}

/// Fold a resolved feature list into its summary.
pub fn summarize(features: &[BaselineFeature]) -> BaselineSummary {
    let mut summary = BaselineSummary {
        total: features.len(),
        ..BaselineSummary::default()
    };

    for feature in features {
        match feature.status {
            BaselineStatus::WidelyAvailable => summary.widely_available += 1,
            BaselineStatus::NewlyAvailable => summary.newly_available += 1,
            BaselineStatus::LimitedAvailability => summary.limited_availability += 1,
            BaselineStatus::Unknown => {}
        }
    }

    summary
}
