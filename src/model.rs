// SPDX-License-Identifier: PMPL-1.0-or-later
//! Core data model: WCAG levels, impact categories, raw audit documents
//! and the normalized violation records the report is built from.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum WcagLevel {
    /// Level A - minimum conformance
    A,
    /// Level AA - standard conformance
    AA,
    /// Level AAA - enhanced conformance
    AAA,
}

impl WcagLevel {
    /// All levels in ascending strictness.
    pub const ALL: [WcagLevel; 3] = [WcagLevel::A, WcagLevel::AA, WcagLevel::AAA];

    /// The axe-core run tag selecting this level's rules.
    pub fn axe_tag(&self) -> &'static str {
        match self {
            WcagLevel::A => "wcag2a",
            WcagLevel::AA => "wcag2aa",
            WcagLevel::AAA => "wcag2aaa",
        }
    }

    /// Position in [`WcagLevel::ALL`].
    pub fn index(&self) -> usize {
        match self {
            WcagLevel::A => 0,
            WcagLevel::AA => 1,
            WcagLevel::AAA => 2,
        }
    }

    /// Review order of the detail table: strictest level first.
    pub fn review_rank(&self) -> usize {
        match self {
            WcagLevel::AAA => 0,
            WcagLevel::AA => 1,
            WcagLevel::A => 2,
        }
    }
}

impl std::fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

impl std::str::FromStr for WcagLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "a" | "wcag2a" => Ok(WcagLevel::A),
            "aa" | "wcag2aa" => Ok(WcagLevel::AA),
            "aaa" | "wcag2aaa" => Ok(WcagLevel::AAA),
            other => Err(format!(
                "Invalid WCAG level: {}. Expected one of A, AA, AAA (or wcag2a, wcag2aa, wcag2aaa)",
                other
            )),
        }
    }
}

impl TryFrom<String> for WcagLevel {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Recognised impact categories reported by axe-core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
}

impl Impact {
    /// Fixed column order used by the summary table and charts.
    pub const ALL: [Impact; 4] = [Impact::Critical, Impact::Serious, Impact::Moderate, Impact::Minor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "Critical",
            Impact::Serious => "Serious",
            Impact::Moderate => "Moderate",
            Impact::Minor => "Minor",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Impact::Critical => 0,
            Impact::Serious => 1,
            Impact::Moderate => 2,
            Impact::Minor => 3,
        }
    }

    fn from_canonical(s: &str) -> Option<Self> {
        Impact::ALL.into_iter().find(|i| i.as_str() == s)
    }
}

impl std::fmt::Display for Impact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Impact of a normalized violation.
///
/// Values outside the recognised set are kept verbatim (capitalised) so
/// they reach the detail table and the unclassified tally.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImpactClass {
    Recognized(Impact),
    Unclassified(String),
}

impl ImpactClass {
    /// Classify a raw, case-variable impact value.
    pub fn classify(raw: Option<&str>) -> Self {
        let canonical = capitalize(raw.unwrap_or(""));
        match Impact::from_canonical(&canonical) {
            Some(impact) => ImpactClass::Recognized(impact),
            None => ImpactClass::Unclassified(canonical),
        }
    }

    pub fn recognized(&self) -> Option<Impact> {
        match self {
            ImpactClass::Recognized(impact) => Some(*impact),
            ImpactClass::Unclassified(_) => None,
        }
    }
}

impl std::fmt::Display for ImpactClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImpactClass::Recognized(impact) => f.write_str(impact.as_str()),
            ImpactClass::Unclassified(raw) if raw.is_empty() => f.write_str("Unspecified"),
            ImpactClass::Unclassified(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for ImpactClass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Uppercase the first letter and lowercase the remainder.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// One DOM node affected by a violation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawNode {
    #[serde(default)]
    pub html: Option<String>,
}

/// A rule failure as reported by the audit tool
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawViolation {
    /// Rule identifier (e.g., "image-alt")
    pub id: String,
    /// Impact category, case-variable and possibly absent
    #[serde(default)]
    pub impact: Option<String>,
    /// Affected nodes in document order
    #[serde(default, deserialize_with = "null_as_empty")]
    pub nodes: Vec<RawNode>,
}

/// One audit run's output for one (page, WCAG level) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditResultDocument {
    pub level: WcagLevel,
    pub page_url: String,
    pub violations: Vec<RawViolation>,
}

/// The canonical unit of the report: one row per raw violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedViolation {
    pub rule_id: String,
    pub level: WcagLevel,
    pub impact: ImpactClass,
    /// Trimmed HTML of the first affected node, or the sentinel text
    pub html: String,
    pub page_url: String,
}

/// Treat an explicit JSON `null` the same as a missing list.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
