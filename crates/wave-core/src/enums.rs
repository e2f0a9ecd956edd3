//! Missing-value strategies, unlabeled-code handling and pattern classifications.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`,
//! which is also the spelling used in configuration files.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// MissingStrategy
// ---------------------------------------------------------------------------

/// What to do with a raw value captured by a missing-value rule.
///
/// ```text
/// mark_unknown   → MISSING (or the rule's custom label)
/// drop_rows      → respondent contributes no observation
/// impute_*       → column-level fill value
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    MarkUnknown,
    DropRows,
    ImputeMode,
    ImputeMean,
    ImputeMedian,
    ImputeMin,
    ImputeMax,
    ImputeCustom,
}

impl MissingStrategy {
    /// Whether the strategy is resolved by a column-level fill value.
    #[must_use]
    pub const fn is_imputation(self) -> bool {
        matches!(
            self,
            Self::ImputeMode
                | Self::ImputeMean
                | Self::ImputeMedian
                | Self::ImputeMin
                | Self::ImputeMax
                | Self::ImputeCustom
        )
    }

    /// Whether the fill value is computed arithmetically and therefore
    /// needs a numeric column.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::ImputeMean | Self::ImputeMedian | Self::ImputeMin | Self::ImputeMax
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MarkUnknown => "mark_unknown",
            Self::DropRows => "drop_rows",
            Self::ImputeMode => "impute_mode",
            Self::ImputeMean => "impute_mean",
            Self::ImputeMedian => "impute_median",
            Self::ImputeMin => "impute_min",
            Self::ImputeMax => "impute_max",
            Self::ImputeCustom => "impute_custom",
        }
    }
}

impl fmt::Display for MissingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UnlabeledStrategy
// ---------------------------------------------------------------------------

/// What to do with a raw code that has no entry in a variable's value labels.
///
/// Only consulted when the variable has at least one value label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UnlabeledStrategy {
    /// Keep the raw code as the category.
    #[default]
    KeepOriginal,
    /// Replace the code with the `Unknown` category.
    MarkMissing,
    /// Respondent contributes no observation.
    Drop,
}

impl UnlabeledStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::KeepOriginal => "keep_original",
            Self::MarkMissing => "mark_missing",
            Self::Drop => "drop",
        }
    }
}

impl fmt::Display for UnlabeledStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PatternKind
// ---------------------------------------------------------------------------

/// Classification of a transition pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    /// Same category at both waves.
    Stable,
    /// Category changed between the waves.
    Changed,
}

impl PatternKind {
    /// Classify a transition by plain string equality of the cleaned values.
    #[must_use]
    pub fn classify(category_from: &str, category_to: &str) -> Self {
        if category_from == category_to {
            Self::Stable
        } else {
            Self::Changed
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
