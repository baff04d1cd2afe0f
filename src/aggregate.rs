// SPDX-License-Identifier: PMPL-1.0-or-later
//! Aggregation of normalized violations into per-(level, impact) counts.
//!
//! The summary has a fixed shape: every level carries a count for every
//! recognised impact plus an unclassified slot, all starting at zero.

use crate::model::{Impact, ImpactClass, NormalizedViolation, WcagLevel};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

/// Counts for a single WCAG level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    counts: [usize; 4],
    unclassified: usize,
}

impl LevelCounts {
    pub fn get(&self, impact: Impact) -> usize {
        self.counts[impact.index()]
    }

    pub fn unclassified(&self) -> usize {
        self.unclassified
    }

    /// Sum over recognised impacts.
    pub fn classified_total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Every violation at this level, unclassified included.
    pub fn total(&self) -> usize {
        self.classified_total() + self.unclassified
    }
}

impl Serialize for LevelCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Impact::ALL.len() + 1))?;
        for impact in Impact::ALL {
            map.serialize_entry(impact.as_str(), &self.get(impact))?;
        }
        map.serialize_entry("Unclassified", &self.unclassified)?;
        map.end()
    }
}

/// Violation counts by WCAG level and impact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    levels: [LevelCounts; 3],
}

impl AggregateSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally one violation.
    pub fn record(&mut self, level: WcagLevel, impact: &ImpactClass) {
        let cell = &mut self.levels[level.index()];
        match impact.recognized() {
            Some(impact) => cell.counts[impact.index()] += 1,
            None => cell.unclassified += 1,
        }
    }

    pub fn level(&self, level: WcagLevel) -> &LevelCounts {
        &self.levels[level.index()]
    }

    pub fn get(&self, level: WcagLevel, impact: Impact) -> usize {
        self.level(level).get(impact)
    }

    pub fn unclassified(&self, level: WcagLevel) -> usize {
        self.level(level).unclassified()
    }

    /// Column total for one impact across all levels.
    pub fn impact_total(&self, impact: Impact) -> usize {
        self.levels.iter().map(|l| l.get(impact)).sum()
    }

    pub fn unclassified_total(&self) -> usize {
        self.levels.iter().map(|l| l.unclassified).sum()
    }

    /// Recognised violations across all levels.
    pub fn classified_total(&self) -> usize {
        self.levels.iter().map(LevelCounts::classified_total).sum()
    }

    pub fn grand_total(&self) -> usize {
        self.classified_total() + self.unclassified_total()
    }
}

impl Serialize for AggregateSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Levels<'a>(&'a AggregateSummary);

        impl Serialize for Levels<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(WcagLevel::ALL.len()))?;
                for level in WcagLevel::ALL {
                    map.serialize_entry(&level.to_string(), self.0.level(level))?;
                }
                map.end()
            }
        }

        let mut state = serializer.serialize_struct("AggregateSummary", 3)?;
        state.serialize_field("levels", &Levels(self))?;
        state.serialize_field("unclassified_total", &self.unclassified_total())?;
        state.serialize_field("total", &self.grand_total())?;
        state.end()
    }
}

/// Count violations per (level, impact); order-independent.
pub fn aggregate<'a>(
    violations: impl IntoIterator<Item = &'a NormalizedViolation>,
) -> AggregateSummary {
    let mut summary = AggregateSummary::new();
    for violation in violations {
        summary.record(violation.level, &violation.impact);
    }
    summary
}
