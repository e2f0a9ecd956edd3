//! Per-variable value labels, cleaning rules and color mappings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wave_core::{CleaningRule, HexColor, UnlabeledStrategy};

/// Settings for one variable base-name, shared by every wave of it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct VariableConfig {
    /// Raw code → label. Missing-value rules match the raw code; merge rules
    /// see the label.
    #[serde(default)]
    pub value_labels: BTreeMap<String, String>,

    /// Handling of codes missing from `value_labels`.
    #[serde(default)]
    pub unlabeled: UnlabeledStrategy,

    /// Missing-value and merge rules, in declaration order.
    #[serde(default)]
    pub rules: Vec<CleaningRule>,

    /// Exact category value → color mappings.
    #[serde(default)]
    pub colors: BTreeMap<String, HexColor>,
}

impl VariableConfig {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value_labels.is_empty() && self.rules.is_empty() && self.colors.is_empty()
    }
}
