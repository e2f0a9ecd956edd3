//! Category color resolution.
//!
//! Lookup order for `(variable, value)`:
//! 1. explicit mapping for that variable,
//! 2. palette slot assigned to the value for the current category set,
//! 3. neutral gray.

use std::collections::{BTreeMap, BTreeSet};

use wave_config::{AnalysisConfig, WaveflowConfig};
use wave_core::{HexColor, PatternKind};

#[derive(Debug, Clone)]
pub struct ColorResolver {
    mappings: BTreeMap<String, BTreeMap<String, HexColor>>,
    palette: Vec<HexColor>,
    neutral: HexColor,
    stable: HexColor,
    changed: HexColor,
    assigned: BTreeMap<String, BTreeMap<String, HexColor>>,
}

impl ColorResolver {
    #[must_use]
    pub fn new(analysis: &AnalysisConfig) -> Self {
        Self {
            mappings: BTreeMap::new(),
            palette: analysis.palette.clone(),
            neutral: analysis.neutral_color.clone(),
            stable: analysis.stable_color.clone(),
            changed: analysis.changed_color.clone(),
            assigned: BTreeMap::new(),
        }
    }

    /// Resolver with every configured per-variable mapping.
    #[must_use]
    pub fn from_config(config: &WaveflowConfig) -> Self {
        config
            .variables
            .iter()
            .fold(Self::new(&config.analysis), |resolver, (name, settings)| {
                resolver.with_mappings(name, settings.colors.clone())
            })
    }

    /// Add explicit `value → color` mappings for a variable. Later mappings
    /// for the same value replace earlier ones.
    #[must_use]
    pub fn with_mappings(
        mut self,
        variable: &str,
        mappings: impl IntoIterator<Item = (String, HexColor)>,
    ) -> Self {
        self.mappings
            .entry(variable.to_string())
            .or_default()
            .extend(mappings);
        self
    }

    /// Assign palette slots to the unmapped values of `categories`.
    ///
    /// Values are sorted before assignment so the same category set always
    /// gets the same colors regardless of input order. Slots wrap when there
    /// are more values than palette entries.
    #[must_use]
    pub fn with_categories<'a>(
        mut self,
        variable: &str,
        categories: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        if self.palette.is_empty() {
            return self;
        }
        let mapped = self.mappings.get(variable);
        let unmapped: BTreeSet<&str> = categories
            .into_iter()
            .filter(|value| mapped.is_none_or(|colors| !colors.contains_key(*value)))
            .collect();
        let assigned: BTreeMap<String, HexColor> = unmapped
            .into_iter()
            .zip(self.palette.iter().cycle())
            .map(|(value, color)| (value.to_string(), color.clone()))
            .collect();
        self.assigned.insert(variable.to_string(), assigned);
        self
    }

    /// Never fails.
    #[must_use]
    pub fn color_for(&self, variable: &str, value: &str) -> HexColor {
        self.mappings
            .get(variable)
            .and_then(|colors| colors.get(value))
            .or_else(|| {
                self.assigned
                    .get(variable)
                    .and_then(|colors| colors.get(value))
            })
            .unwrap_or(&self.neutral)
            .clone()
    }

    #[must_use]
    pub const fn classification_color(&self, kind: PatternKind) -> &HexColor {
        match kind {
            PatternKind::Stable => &self.stable,
            PatternKind::Changed => &self.changed,
        }
    }

    #[must_use]
    pub const fn neutral(&self) -> &HexColor {
        &self.neutral
    }
}
