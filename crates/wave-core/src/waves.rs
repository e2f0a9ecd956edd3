//! Wave definitions and transition requests.

use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A survey collection round and the prefix applied to its columns.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WaveDefinition {
    /// Wave identifier, e.g. `Wave1`.
    pub id: String,
    /// Column-name prefix, e.g. `W1_`.
    pub column_prefix: String,
    #[serde(default)]
    pub description: String,
}

impl WaveDefinition {
    /// Build a validated definition.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWaveDefinition`] if the id or prefix is blank.
    pub fn new(
        id: impl Into<String>,
        column_prefix: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, CoreError> {
        let definition = Self {
            id: id.into(),
            column_prefix: column_prefix.into(),
            description: description.into(),
        };
        definition.validate()?;
        Ok(definition)
    }

    /// Check that both the id and the column prefix are non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWaveDefinition`] naming the blank field.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::InvalidWaveDefinition {
                id: self.id.clone(),
                reason: "wave id is blank".to_string(),
            });
        }
        if self.column_prefix.trim().is_empty() {
            return Err(CoreError::InvalidWaveDefinition {
                id: self.id.clone(),
                reason: "column prefix is blank".to_string(),
            });
        }
        Ok(())
    }

    /// Full column name for a wave-prefix-free variable name.
    #[must_use]
    pub fn column_for(&self, base_name: &str) -> String {
        format!("{}{base_name}", self.column_prefix)
    }

    /// Prefix without trailing underscores, upper-cased (`W1_` → `W1`).
    #[must_use]
    pub fn short_label(&self) -> String {
        self.column_prefix.trim_end_matches('_').to_uppercase()
    }

    /// First run of digits in the wave id (`Wave12` → 12).
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        let digits: String = self
            .id
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

/// Restricts a transition to respondents whose cleaned filter value is in
/// an accepted set.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RowFilter {
    /// Column base-name. Wave-prefixed when `wave` is set, otherwise the
    /// literal name of a wave-independent column.
    pub column: String,
    #[serde(default)]
    pub wave: Option<String>,
    pub values: BTreeSet<String>,
}

impl RowFilter {
    pub fn new<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            column: column.into(),
            wave: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Read the filter column from a specific wave.
    #[must_use]
    pub fn at_wave(mut self, wave_id: impl Into<String>) -> Self {
        self.wave = Some(wave_id.into());
        self
    }

    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        self.values.contains(value)
    }
}

/// An ordered pair of waves and the variable whose transitions are wanted.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct WaveTransitionRequest {
    pub wave_from: String,
    pub wave_to: String,
    /// Wave-prefix-free variable name.
    pub variable: String,
    #[serde(default)]
    pub filter: Option<RowFilter>,
    /// Permit `wave_from == wave_to` for stability analysis.
    #[serde(default)]
    pub allow_self_transition: bool,
    /// Replaces the generated chart title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl WaveTransitionRequest {
    pub fn new(
        wave_from: impl Into<String>,
        wave_to: impl Into<String>,
        variable: impl Into<String>,
    ) -> Self {
        Self {
            wave_from: wave_from.into(),
            wave_to: wave_to.into(),
            variable: variable.into(),
            filter: None,
            allow_self_transition: false,
            title: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: RowFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn allowing_self_transition(mut self) -> Self {
        self.allow_self_transition = true;
        self
    }

    #[must_use]
    pub fn is_self_transition(&self) -> bool {
        self.wave_from == self.wave_to
    }

    /// Check that the variable and filter column names are non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.variable.trim().is_empty() {
            return Err(CoreError::Validation("request variable is blank".to_string()));
        }
        if self
            .filter
            .as_ref()
            .is_some_and(|filter| filter.column.trim().is_empty())
        {
            return Err(CoreError::Validation("filter column is blank".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_prefix_is_rejected() {
        let err = WaveDefinition::new("Wave1", " ", "").unwrap_err();
        assert!(err.to_string().contains("column prefix is blank"));
    }

    #[test]
    fn column_and_label_come_from_prefix() {
        let wave = WaveDefinition::new("Wave1", "w1_", "baseline").unwrap();
        assert_eq!(wave.column_for("HFClust"), "w1_HFClust");
        assert_eq!(wave.short_label(), "W1");
    }

    #[test]
    fn number_is_first_digit_run() {
        let wave = WaveDefinition::new("Wave12b3", "W12_", "").unwrap();
        assert_eq!(wave.number(), Some(12));
        let unnumbered = WaveDefinition::new("Baseline", "B_", "").unwrap();
        assert_eq!(unnumbered.number(), None);
    }

    #[test]
    fn request_builder_sets_flags() {
        let request = WaveTransitionRequest::new("Wave1", "Wave1", "PID")
            .with_filter(RowFilter::new("Region", ["North"]))
            .allowing_self_transition();
        assert!(request.is_self_transition());
        assert!(request.allow_self_transition);
        assert!(request.filter.as_ref().unwrap().accepts("North"));
        assert!(!request.filter.unwrap().accepts("South"));
    }

    #[test]
    fn blank_names_fail_validation() {
        assert!(WaveTransitionRequest::new("Wave1", "Wave2", "PID").validate().is_ok());
        let err = WaveTransitionRequest::new("Wave1", "Wave2", "  ").validate().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        let err = WaveTransitionRequest::new("Wave1", "Wave2", "PID")
            .with_filter(RowFilter::new("", ["x"]))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Validation error: filter column is blank");
    }
}
