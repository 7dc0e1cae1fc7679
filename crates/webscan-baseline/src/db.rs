//! Support database
//!
//! Read-only lookup of Baseline availability data, keyed by feature id
//! (HTML catalog entries) or BCD-style dotted key (CSS constructs). Loaded
//! once per process from an embedded JSON snapshot; tests inject small
//! fixtures through [`SupportDb::from_json`].

use crate::feature::{BaselineFeature, BaselineStatus};
use crate::BaselineError;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

static EMBEDDED: LazyLock<SupportDb> = LazyLock::new(|| {
    SupportDb::from_json(include_str!("../data/web_features.json"))
        .expect("embedded support database is valid JSON")
});

/// Baseline tier level as published in support data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierLevel {
    High,
    Low,
}

/// Raw `baseline` field of a database entry: `"high"`, `"low"` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum BaselineTier {
    Flag(bool),
    Level(TierLevel),
}

impl BaselineTier {
    /// Map a tier to a status. `true` is not a published tier value and
    /// maps to nothing.
    pub fn status(self) -> Option<BaselineStatus> {
        match self {
            BaselineTier::Level(TierLevel::High) => Some(BaselineStatus::WidelyAvailable),
            BaselineTier::Level(TierLevel::Low) => Some(BaselineStatus::NewlyAvailable),
            BaselineTier::Flag(false) => Some(BaselineStatus::LimitedAvailability),
            BaselineTier::Flag(true) => None,
        }
    }
}

/// Status sub-record of a database entry.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DbStatus {
    #[serde(default)]
    pub baseline: Option<BaselineTier>,
}

/// One support database entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DbEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub status: Option<DbStatus>,
}

impl DbEntry {
    fn tier_status(&self) -> Option<BaselineStatus> {
        self.status.as_ref()?.baseline?.status()
    }
}

/// Read-only support database.
#[derive(Debug, Default)]
pub struct SupportDb {
    entries: HashMap<String, DbEntry>,
}

impl SupportDb {
    /// The snapshot embedded in the crate, parsed once per process.
    pub fn embedded() -> &'static SupportDb {
        &EMBEDDED
    }

    /// Load a database from a JSON object of `key -> entry`.
    pub fn from_json(json: &str) -> Result<Self, BaselineError> {
        let entries: HashMap<String, DbEntry> = serde_json::from_str(json)?;
        tracing::debug!("loaded support database with {} entries", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&DbEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve an HTML catalog feature key.
    ///
    /// A missing key yields nothing. An entry without tier information
    /// still yields a feature with `Unknown` status and no highlight
    /// class; this path is the only source of `Unknown` entries.
    pub fn resolve_feature_key(
        &self,
        key: &str,
        selector: Option<&str>,
    ) -> Option<BaselineFeature> {
        let entry = self.get(key)?;
        let status = entry.tier_status().unwrap_or(BaselineStatus::Unknown);

        Some(BaselineFeature {
            name: entry.name.clone().unwrap_or_else(|| key.to_string()),
            status,
            description: entry
                .description_html
                .clone()
                .or_else(|| entry.description.clone()),
            selector: selector.map(str::to_owned),
            highlight_class: status.highlight_class().map(str::to_owned),
        })
    }

    /// Resolve a BCD-style dotted CSS lookup key.
    ///
    /// Unlike the HTML path this requires tier information to be present:
    /// an entry without a `baseline` field yields nothing, so CSS-origin
    /// features never carry `Unknown` status. The feature name is derived
    /// from the last dotted segment of the key.
    pub fn resolve_css_key(&self, key: &str) -> Option<BaselineFeature> {
        let entry = self.get(key)?;
        let status = entry.tier_status()?;
        let segment = key.rsplit('.').next().unwrap_or(key);

        Some(BaselineFeature {
            name: format_feature_name(segment),
            status,
            description: Some(format!("CSS feature: {key}")),
            selector: None,
            highlight_class: status.highlight_class().map(str::to_owned),
        })
    }
}

/// Format a key segment as a human-readable name: hyphens become spaces,
/// camelCase boundaries split, everything lower-cased, first letter
/// capitalized (`backdrop-filter` -> "Backdrop filter").
pub fn format_feature_name(segment: &str) -> String {
    let mut spaced = String::with_capacity(segment.len());
    let mut prev_lower = false;

    for ch in segment.chars() {
        if ch == '-' {
            spaced.push(' ');
            prev_lower = false;
            continue;
        }
        if prev_lower && ch.is_ascii_uppercase() {
            spaced.push(' ');
        }
        prev_lower = ch.is_ascii_lowercase();
        spaced.push(ch.to_ascii_lowercase());
    }

    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => spaced,
    }
}
