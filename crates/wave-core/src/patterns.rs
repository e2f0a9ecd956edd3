//! Ranked transition patterns.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;
use crate::enums::PatternKind;
use crate::matrix::percentage;

/// A distinct `(category_from, category_to)` transition and its frequency.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PatternRecord {
    pub category_from: String,
    pub category_to: String,
    pub count: u64,
    /// Share of all transitions, 0–100.
    pub percentage: f64,
    pub classification: PatternKind,
    /// Classification color, set by the orchestration layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<HexColor>,
}

impl PatternRecord {
    /// `"{from} -> {to}"`, the label used by bar-chart renderers.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} -> {}", self.category_from, self.category_to)
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.classification == PatternKind::Stable
    }
}

/// Stable/changed totals over a full (untruncated) pattern list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PatternSummary {
    pub total_transitions: u64,
    pub unique_patterns: usize,
    pub stable_count: u64,
    pub changed_count: u64,
    pub stable_percentage: f64,
    pub changed_percentage: f64,
}

impl PatternSummary {
    #[must_use]
    pub fn from_records(records: &[PatternRecord]) -> Self {
        let (stable_count, changed_count) =
            records
                .iter()
                .fold((0, 0), |(stable, changed), record| match record.classification {
                    PatternKind::Stable => (stable + record.count, changed),
                    PatternKind::Changed => (stable, changed + record.count),
                });
        let total_transitions = stable_count + changed_count;
        Self {
            total_transitions,
            unique_patterns: records.len(),
            stable_count,
            changed_count,
            stable_percentage: percentage(stable_count, total_transitions),
            changed_percentage: percentage(changed_count, total_transitions),
        }
    }
}
