//! Payloads handed to rendering collaborators.
//!
//! Each payload is self-contained: it echoes the request, carries coverage
//! diagnostics and warnings, and never references engine state.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::FlowGraph;
use crate::matrix::{TransitionMatrix, percentage};
use crate::patterns::{PatternRecord, PatternSummary};
use crate::waves::WaveTransitionRequest;

/// How many respondents reached the matrix, and why the rest did not.
///
/// Exclusion reasons are counted in precedence order: dropped, missing at
/// `wave_from`, missing at `wave_to`, filtered out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Coverage {
    pub eligible: u64,
    pub dropped: u64,
    pub missing_from: u64,
    pub missing_to: u64,
    pub filtered_out: u64,
    pub included: u64,
}

impl Coverage {
    #[must_use]
    pub const fn excluded(&self) -> u64 {
        self.eligible.saturating_sub(self.included)
    }

    #[must_use]
    pub fn inclusion_rate(&self) -> f64 {
        percentage(self.included, self.eligible)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.included == 0
    }
}

/// Non-fatal conditions surfaced alongside a successful result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransitionWarning {
    /// No respondent survived intersection and filtering.
    EmptyResult,
}

/// Flow graph payload for Sankey rendering.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AlluvialData {
    pub request: WaveTransitionRequest,
    pub title: String,
    pub graph: FlowGraph,
    /// Link opacity configured for this engine.
    pub link_opacity: f64,
    pub summary: PatternSummary,
    pub stability_rate: f64,
    pub coverage: Coverage,
    pub warnings: Vec<TransitionWarning>,
}

/// Matrix payload for heatmap rendering.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct HeatmapData {
    pub request: WaveTransitionRequest,
    pub title: String,
    pub matrix: TransitionMatrix,
    pub row_percentages: BTreeMap<String, BTreeMap<String, f64>>,
    pub diagonal_stability: BTreeMap<String, f64>,
    pub overall_stability: f64,
    pub coverage: Coverage,
    pub warnings: Vec<TransitionWarning>,
}

/// Ranked pattern payload for bar-chart rendering.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PatternData {
    pub request: WaveTransitionRequest,
    pub title: String,
    /// Top-N records, already truncated.
    pub patterns: Vec<PatternRecord>,
    /// Totals over every pattern, not just the truncated list.
    pub summary: PatternSummary,
    pub coverage: Coverage,
    pub warnings: Vec<TransitionWarning>,
}
