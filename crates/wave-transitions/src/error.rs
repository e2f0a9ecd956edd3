//! Error types for wave-transitions.
//!
//! Every variant is a structural or configuration defect: nothing here is
//! retried, and no partial result accompanies an error. An empty result is
//! not an error; see [`wave_core::TransitionWarning`].

use wave_config::ConfigError;
use wave_core::{CoreError, MissingStrategy};

/// Errors from registry lookups, rule validation, and transition requests.
#[derive(Debug, thiserror::Error)]
pub enum TransitionError {
    /// The wave id is not registered.
    #[error("unknown wave '{wave}' (registered: {known:?})")]
    UnknownWave { wave: String, known: Vec<String> },

    /// Two definitions share a wave id.
    #[error("duplicate wave id '{wave}'")]
    DuplicateWave { wave: String },

    /// A resolved column is absent from the dataset.
    #[error("column '{column}' not found in dataset")]
    ColumnNotFound { column: String },

    /// The same wave appears on both sides without explicit allowance.
    #[error("wave '{wave}' cannot transition to itself unless self-transition is allowed")]
    SameWaveTransition { wave: String },

    /// A `w<N>_to_w<M>` shorthand could not be parsed.
    #[error("invalid wave configuration '{config}': {reason}")]
    InvalidWaveConfig { config: String, reason: String },

    /// Two merge rules send one source value to different targets.
    #[error(
        "ambiguous merge rules for '{variable}': '{source_value}' maps to both '{first_target}' and '{second_target}'"
    )]
    AmbiguousMergeRule {
        variable: String,
        source_value: String,
        first_target: String,
        second_target: String,
    },

    /// Merge rules form a cycle.
    #[error("cyclic merge rules for '{variable}': {}", .cycle.join(" -> "))]
    CyclicMergeRule { variable: String, cycle: Vec<String> },

    /// A rule lacks a field its strategy needs.
    #[error("incomplete {strategy} rule for '{variable}': {reason}")]
    IncompleteRule {
        variable: String,
        strategy: MissingStrategy,
        reason: String,
    },

    /// An arithmetic imputation met a value that is not a number.
    #[error("{strategy} on '{variable}' needs numeric values, found '{value}'")]
    NonNumericImputation {
        variable: String,
        strategy: MissingStrategy,
        value: String,
    },

    /// Respondent ids must be unique within a table.
    #[error("duplicate respondent id '{respondent_id}'")]
    DuplicateRespondent { respondent_id: String },

    /// A column does not have one value per respondent.
    #[error("column '{column}' has {actual} values, expected {expected}")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T, E = TransitionError> = std::result::Result<T, E>;
