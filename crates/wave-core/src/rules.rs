//! Cleaning rule variants.
//!
//! Rules are scoped to a variable base-name and apply identically at every
//! wave of that variable. They arrive already resolved (from configuration
//! or an interactive session) and are validated once by the cleaning engine
//! before any respondent data is touched.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::MissingStrategy;

/// A single cleaning rule for one variable.
///
/// Serialized with a `kind` tag:
///
/// ```toml
/// [[variables.PID.rules]]
/// kind = "merge"
/// source_value = "Something else"
/// target_value = "Independent"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CleaningRule {
    MissingValue(MissingValueRule),
    Merge(MergeRule),
}

impl CleaningRule {
    pub fn merge(source_value: impl Into<String>, target_value: impl Into<String>) -> Self {
        Self::Merge(MergeRule {
            source_value: source_value.into(),
            target_value: target_value.into(),
        })
    }

    pub fn missing<I, S>(strategy: MissingStrategy, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingValue(MissingValueRule::new(strategy, values))
    }

    #[must_use]
    pub const fn as_merge(&self) -> Option<&MergeRule> {
        match self {
            Self::Merge(rule) => Some(rule),
            Self::MissingValue(_) => None,
        }
    }

    #[must_use]
    pub const fn as_missing(&self) -> Option<&MissingValueRule> {
        match self {
            Self::MissingValue(rule) => Some(rule),
            Self::Merge(_) => None,
        }
    }
}

impl From<MergeRule> for CleaningRule {
    fn from(rule: MergeRule) -> Self {
        Self::Merge(rule)
    }
}

impl From<MissingValueRule> for CleaningRule {
    fn from(rule: MissingValueRule) -> Self {
        Self::MissingValue(rule)
    }
}

/// Treatment of raw values that count as missing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MissingValueRule {
    pub strategy: MissingStrategy,
    /// Raw codes captured by this rule, compared by exact string equality.
    /// Absent or blank cells are always captured.
    #[serde(default)]
    pub values: Vec<String>,
    /// Category emitted by `mark_unknown` instead of MISSING.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_label: Option<String>,
    /// Fill value for `impute_custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impute_value: Option<String>,
}

impl MissingValueRule {
    pub fn new<I, S>(strategy: MissingStrategy, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strategy,
            values: values.into_iter().map(Into::into).collect(),
            custom_label: None,
            impute_value: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.custom_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_impute_value(mut self, value: impl Into<String>) -> Self {
        self.impute_value = Some(value.into());
        self
    }

    /// Whether this rule captures the raw cell.
    #[must_use]
    pub fn matches(&self, raw: Option<&str>) -> bool {
        match raw {
            None => true,
            Some(value) if value.trim().is_empty() => true,
            Some(value) => self.values.iter().any(|code| code == value),
        }
    }
}

/// Many-to-one recoding of one category value into another.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MergeRule {
    pub source_value: String,
    pub target_value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_rule_matches_codes_and_blanks() {
        let rule = MissingValueRule::new(MissingStrategy::MarkUnknown, ["99", "Refused"]);
        assert!(rule.matches(None));
        assert!(rule.matches(Some("  ")));
        assert!(rule.matches(Some("99")));
        assert!(rule.matches(Some("Refused")));
        assert!(!rule.matches(Some("99.0")));
        assert!(!rule.matches(Some("1")));
    }

    #[test]
    fn rules_deserialize_from_kind_tag() {
        let json = r#"[
            {"kind": "merge", "source_value": "9", "target_value": "2"},
            {"kind": "missing_value", "strategy": "impute_custom", "values": ["-1"], "impute_value": "0"}
        ]"#;
        let rules: Vec<CleaningRule> = serde_json::from_str(json).unwrap();
        assert_eq!(
            rules,
            vec![
                CleaningRule::merge("9", "2"),
                MissingValueRule::new(MissingStrategy::ImputeCustom, ["-1"])
                    .with_impute_value("0")
                    .into(),
            ]
        );
    }

    #[test]
    fn accessors_split_variants() {
        let merge = CleaningRule::merge("a", "b");
        assert!(merge.as_merge().is_some());
        assert!(merge.as_missing().is_none());
        let missing = CleaningRule::missing(MissingStrategy::DropRows, ["x"]);
        assert_eq!(missing.as_missing().unwrap().strategy, MissingStrategy::DropRows);
    }
}
