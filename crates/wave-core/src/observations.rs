//! Cleaned per-respondent values.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The outcome of cleaning a single raw cell.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum CleanedValue {
    Category(String),
    Missing,
}

impl CleanedValue {
    pub fn category(value: impl Into<String>) -> Self {
        Self::Category(value.into())
    }

    #[must_use]
    pub fn as_category(&self) -> Option<&str> {
        match self {
            Self::Category(value) => Some(value),
            Self::Missing => None,
        }
    }

    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }
}

impl fmt::Display for CleanedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(value) => f.write_str(value),
            Self::Missing => f.write_str("MISSING"),
        }
    }
}

/// One respondent's cleaned value for one variable at one wave.
///
/// Derived on every request from raw data and rules; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CleanedObservation {
    pub respondent_id: String,
    pub wave: String,
    pub variable: String,
    pub value: CleanedValue,
}
