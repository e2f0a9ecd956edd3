//! Cleaning rule engine.
//!
//! Per raw value, in fixed order:
//! 1. the first missing-value rule that captures the value decides its fate
//!    (`mark_unknown` → MISSING or the rule's label, `drop_rows` → no
//!    observation, `impute_*` → deferred to the column pass);
//! 2. otherwise value labels turn the raw code into its label, with codes
//!    missing from a non-empty label map handled by the variable's
//!    [`UnlabeledStrategy`];
//! 3. merge rules map the result to its final category.
//!
//! Imputation fills are computed once per column from the non-missing
//! cleaned values of that column, then substituted for deferred cells.

pub mod impute;
mod merge;

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};

use wave_config::WaveflowConfig;
use wave_core::{
    CleanedValue, CleaningRule, MissingStrategy, MissingValueRule, UnlabeledStrategy,
};

pub use merge::MergeMap;

use crate::error::{Result, TransitionError};

/// Result of the per-value pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellOutcome {
    Value(CleanedValue),
    /// Captured by a `drop_rows` rule.
    Dropped,
    /// Captured by the imputation rule at this index; filled by the column pass.
    Impute { rule: usize },
}

/// Validated rules for one variable base-name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableRules {
    variable: String,
    missing: Vec<MissingValueRule>,
    labels: BTreeMap<String, String>,
    unlabeled: UnlabeledStrategy,
    merges: MergeMap,
}

/// Category given to codes without a label under [`UnlabeledStrategy::MarkMissing`].
pub const UNLABELED_CATEGORY: &str = "Unknown";

impl VariableRules {
    /// Validate a rule list eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AmbiguousMergeRule`],
    /// [`TransitionError::CyclicMergeRule`], or
    /// [`TransitionError::IncompleteRule`] for an `impute_custom` rule
    /// without an `impute_value`.
    pub fn compile(variable: &str, rules: &[CleaningRule]) -> Result<Self> {
        let missing: Vec<MissingValueRule> = rules
            .iter()
            .filter_map(CleaningRule::as_missing)
            .cloned()
            .collect();
        if let Some(rule) = missing
            .iter()
            .find(|rule| rule.strategy == MissingStrategy::ImputeCustom && rule.impute_value.is_none())
        {
            return Err(TransitionError::IncompleteRule {
                variable: variable.to_string(),
                strategy: rule.strategy,
                reason: "impute_value is required".to_string(),
            });
        }
        let merges = MergeMap::compile(variable, rules.iter().filter_map(CleaningRule::as_merge))?;
        Ok(Self {
            variable: variable.to_string(),
            missing,
            merges,
            ..Self::default()
        })
    }

    /// Attach code → label mappings applied ahead of merge rules.
    #[must_use]
    pub fn with_labels(
        mut self,
        labels: BTreeMap<String, String>,
        unlabeled: UnlabeledStrategy,
    ) -> Self {
        self.labels = labels;
        self.unlabeled = unlabeled;
        self
    }

    /// Rules that leave every present value untouched.
    #[must_use]
    pub fn empty(variable: &str) -> Self {
        Self {
            variable: variable.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    #[must_use]
    pub const fn merges(&self) -> &MergeMap {
        &self.merges
    }

    /// Per-value pass.
    #[must_use]
    pub fn classify(&self, raw: Option<&str>) -> CellOutcome {
        let captured = self
            .missing
            .iter()
            .enumerate()
            .find(|(_, rule)| rule.matches(raw));
        match (captured, raw) {
            (Some((index, rule)), _) => match rule.strategy {
                MissingStrategy::MarkUnknown => CellOutcome::Value(
                    rule.custom_label
                        .as_deref()
                        .map_or(CleanedValue::Missing, |label| {
                            CleanedValue::category(self.merges.resolve(label))
                        }),
                ),
                MissingStrategy::DropRows => CellOutcome::Dropped,
                _ => CellOutcome::Impute { rule: index },
            },
            (None, Some(value)) if !value.trim().is_empty() => self.label(value),
            (None, _) => CellOutcome::Value(CleanedValue::Missing),
        }
    }

    fn label(&self, code: &str) -> CellOutcome {
        let labeled = match self.labels.get(code) {
            Some(label) => label.as_str(),
            None if self.labels.is_empty() => code,
            None => match self.unlabeled {
                UnlabeledStrategy::KeepOriginal => code,
                UnlabeledStrategy::MarkMissing => UNLABELED_CATEGORY,
                UnlabeledStrategy::Drop => return CellOutcome::Dropped,
            },
        };
        CellOutcome::Value(CleanedValue::category(self.merges.resolve(labeled)))
    }

    /// Clean a single value without column context.
    ///
    /// Dropped and to-be-imputed cells come back as MISSING; use
    /// [`Self::clean_column`] to resolve them.
    #[must_use]
    pub fn clean(&self, raw: Option<&str>) -> CleanedValue {
        match self.classify(raw) {
            CellOutcome::Value(value) => value,
            CellOutcome::Dropped | CellOutcome::Impute { .. } => CleanedValue::Missing,
        }
    }

    /// Clean a whole column. `None` marks a row removed by `drop_rows`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NonNumericImputation`] when an arithmetic
    /// imputation runs over non-numeric categories.
    pub fn clean_column(&self, raw: &[Option<String>]) -> Result<Vec<Option<CleanedValue>>> {
        let outcomes: Vec<CellOutcome> = raw
            .iter()
            .map(|value| self.classify(value.as_deref()))
            .collect();

        let pending: BTreeSet<usize> = outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                CellOutcome::Impute { rule } => Some(*rule),
                _ => None,
            })
            .collect();

        let mut fills: BTreeMap<usize, Option<String>> = BTreeMap::new();
        if !pending.is_empty() {
            let observed: Vec<&str> = outcomes
                .iter()
                .filter_map(|outcome| match outcome {
                    CellOutcome::Value(CleanedValue::Category(value)) => Some(value.as_str()),
                    _ => None,
                })
                .collect();
            for index in pending {
                let rule = &self.missing[index];
                let fill = impute::fill_value(
                    &self.variable,
                    rule.strategy,
                    rule.impute_value.as_deref(),
                    &observed,
                )?
                .map(|value| self.merges.resolve(&value).to_string());
                tracing::debug!(
                    variable = %self.variable,
                    strategy = %rule.strategy,
                    fill = fill.as_deref().unwrap_or("<none>"),
                    "computed imputation fill"
                );
                fills.insert(index, fill);
            }
        }

        Ok(outcomes
            .into_iter()
            .map(|outcome| match outcome {
                CellOutcome::Value(value) => Some(value),
                CellOutcome::Dropped => None,
                CellOutcome::Impute { rule } => Some(
                    fills
                        .get(&rule)
                        .cloned()
                        .flatten()
                        .map_or(CleanedValue::Missing, CleanedValue::Category),
                ),
            })
            .collect())
    }
}

/// Validated rules for every configured variable.
#[derive(Debug, Clone, Default)]
pub struct RuleBook {
    variables: BTreeMap<String, VariableRules>,
}

impl RuleBook {
    /// Validate every variable's rules before any data is touched.
    ///
    /// # Errors
    ///
    /// Returns the first validation error in variable-name order.
    pub fn compile<'a, I>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a [CleaningRule])>,
    {
        let mut variables = BTreeMap::new();
        let mut pending: Vec<(&str, &[CleaningRule])> = rules.into_iter().collect();
        pending.sort_by_key(|(variable, _)| *variable);
        for (variable, rules) in pending {
            variables.insert(variable.to_string(), VariableRules::compile(variable, rules)?);
        }
        Ok(Self { variables })
    }

    /// # Errors
    ///
    /// Same as [`Self::compile`].
    pub fn from_config(config: &WaveflowConfig) -> Result<Self> {
        let mut book = Self::compile(
            config
                .variables
                .iter()
                .map(|(name, settings)| (name.as_str(), settings.rules.as_slice())),
        )?;
        for (name, settings) in &config.variables {
            if settings.value_labels.is_empty() {
                continue;
            }
            if let Some(rules) = book.variables.remove(name) {
                book.variables.insert(
                    name.clone(),
                    rules.with_labels(settings.value_labels.clone(), settings.unlabeled),
                );
            }
        }
        Ok(book)
    }

    /// Rules for a variable; an unconfigured variable gets empty rules.
    #[must_use]
    pub fn rules_for(&self, variable: &str) -> Cow<'_, VariableRules> {
        self.variables
            .get(variable)
            .map_or_else(|| Cow::Owned(VariableRules::empty(variable)), Cow::Borrowed)
    }

    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.variables.keys().map(String::as_str)
    }
}
