//! Wave id → column prefix lookup.
//!
//! Lookups are exact: there is no fuzzy matching of wave names. The
//! `w<N>_to_w<M>` shorthand is the only indirection, and it resolves through
//! the number embedded in each registered wave id.

use std::collections::HashMap;

use wave_config::WaveflowConfig;
use wave_core::{WaveDefinition, WaveTransitionRequest};

use crate::error::{Result, TransitionError};
use crate::table::ColumnSchema;

/// Immutable, ordered set of wave definitions.
#[derive(Debug, Clone)]
pub struct WaveRegistry {
    waves: Vec<WaveDefinition>,
    index: HashMap<String, usize>,
}

impl WaveRegistry {
    /// Build a registry from definitions in display order.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::DuplicateWave`] for a repeated id, or
    /// [`TransitionError::Core`] for a blank id or prefix.
    pub fn new(waves: impl IntoIterator<Item = WaveDefinition>) -> Result<Self> {
        let waves: Vec<WaveDefinition> = waves.into_iter().collect();
        let mut index = HashMap::with_capacity(waves.len());
        for (position, wave) in waves.iter().enumerate() {
            wave.validate()?;
            if index.insert(wave.id.clone(), position).is_some() {
                return Err(TransitionError::DuplicateWave {
                    wave: wave.id.clone(),
                });
            }
        }
        Ok(Self { waves, index })
    }

    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_config(config: &WaveflowConfig) -> Result<Self> {
        Self::new(config.waves.iter().cloned())
    }

    #[must_use]
    pub fn waves(&self) -> &[WaveDefinition] {
        &self.waves
    }

    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`] if `wave_id` is not registered.
    pub fn definition(&self, wave_id: &str) -> Result<&WaveDefinition> {
        self.index
            .get(wave_id)
            .map(|&position| &self.waves[position])
            .ok_or_else(|| self.unknown(wave_id))
    }

    /// Column prefix for a wave.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`] if `wave_id` is not registered.
    pub fn resolve(&self, wave_id: &str) -> Result<&str> {
        self.definition(wave_id)
            .map(|wave| wave.column_prefix.as_str())
    }

    /// `{prefix}{base_name}`, checked against the dataset schema.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`] or
    /// [`TransitionError::ColumnNotFound`].
    pub fn column_for(
        &self,
        wave_id: &str,
        base_name: &str,
        schema: &impl ColumnSchema,
    ) -> Result<String> {
        let column = self.definition(wave_id)?.column_for(base_name);
        if schema.has_column(&column) {
            Ok(column)
        } else {
            Err(TransitionError::ColumnNotFound { column })
        }
    }

    /// Display label for a wave (`W1_` → `W1`).
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`] if `wave_id` is not registered.
    pub fn short_label(&self, wave_id: &str) -> Result<String> {
        self.definition(wave_id).map(WaveDefinition::short_label)
    }

    /// Check that both waves are registered and that a self-transition was
    /// asked for explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Core`] for blank names,
    /// [`TransitionError::UnknownWave`], or
    /// [`TransitionError::SameWaveTransition`].
    pub fn validate_request(&self, request: &WaveTransitionRequest) -> Result<()> {
        request.validate()?;
        self.definition(&request.wave_from)?;
        self.definition(&request.wave_to)?;
        if request.is_self_transition() && !request.allow_self_transition {
            return Err(TransitionError::SameWaveTransition {
                wave: request.wave_from.clone(),
            });
        }
        Ok(())
    }

    /// Resolve `w<N>_to_w<M>` (case-insensitive) or `all_waves` to a pair of
    /// wave ids.
    ///
    /// `all_waves` pairs the lowest and highest numbered waves.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::InvalidWaveConfig`] for malformed input,
    /// [`TransitionError::SameWaveTransition`] when both numbers match, and
    /// [`TransitionError::UnknownWave`] when a number has no wave.
    pub fn parse_transition(&self, config: &str) -> Result<(String, String)> {
        let normalized = config.trim().to_ascii_lowercase();
        let invalid = |reason: &str| TransitionError::InvalidWaveConfig {
            config: config.to_string(),
            reason: reason.to_string(),
        };

        if normalized == "all_waves" {
            let mut numbered: Vec<(u32, &WaveDefinition)> = self
                .waves
                .iter()
                .filter_map(|wave| wave.number().map(|n| (n, wave)))
                .collect();
            numbered.sort_by_key(|(n, _)| *n);
            return match (numbered.first(), numbered.last()) {
                (Some((first, from)), Some((last, to))) if first != last => {
                    Ok((from.id.clone(), to.id.clone()))
                }
                _ => Err(invalid("all_waves needs at least two numbered waves")),
            };
        }

        let (from, to) = normalized
            .strip_prefix('w')
            .and_then(|rest| rest.split_once("_to_w"))
            .ok_or_else(|| invalid("expected 'w<number>_to_w<number>' or 'all_waves'"))?;
        let number = |digits: &str, reason: &str| {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(reason));
            }
            digits.parse::<u32>().map_err(|_| invalid(reason))
        };
        let from = number(from, "source wave is not a number")?;
        let to = number(to, "target wave is not a number")?;
        if from == 0 || to == 0 {
            return Err(invalid("wave numbers must be positive"));
        }
        if from == to {
            return Err(TransitionError::SameWaveTransition {
                wave: self
                    .by_number(from)
                    .map_or_else(|_| format!("w{from}"), |wave| wave.id.clone()),
            });
        }

        let from_wave = self.by_number(from)?;
        let to_wave = self.by_number(to)?;
        tracing::debug!(config, from = %from_wave.id, to = %to_wave.id, "parsed wave transition");
        Ok((from_wave.id.clone(), to_wave.id.clone()))
    }

    fn by_number(&self, number: u32) -> Result<&WaveDefinition> {
        self.waves
            .iter()
            .find(|wave| wave.number() == Some(number))
            .ok_or_else(|| self.unknown(&format!("w{number}")))
    }

    fn unknown(&self, wave_id: &str) -> TransitionError {
        TransitionError::UnknownWave {
            wave: wave_id.to_string(),
            known: self.waves.iter().map(|wave| wave.id.clone()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use rstest::rstest;

    fn registry() -> WaveRegistry {
        WaveRegistry::new([
            WaveDefinition::new("Wave1", "W1_", "").unwrap(),
            WaveDefinition::new("Wave2", "W2_", "").unwrap(),
            WaveDefinition::new("Wave4", "W4_", "").unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn resolve_returns_prefix() {
        assert_eq!(registry().resolve("Wave2").unwrap(), "W2_");
    }

    #[test]
    fn resolve_is_exact() {
        let err = registry().resolve("wave2").unwrap_err();
        assert!(matches!(err, TransitionError::UnknownWave { ref wave, .. } if wave == "wave2"));
    }

    #[test]
    fn duplicate_waves_are_rejected() {
        let wave = WaveDefinition::new("Wave1", "W1_", "").unwrap();
        let err = WaveRegistry::new([wave.clone(), wave]).unwrap_err();
        assert!(matches!(err, TransitionError::DuplicateWave { .. }));
    }

    #[test]
    fn column_for_checks_schema() {
        let schema: HashSet<String> = ["W1_PID".to_string()].into_iter().collect();
        let registry = registry();
        assert_eq!(registry.column_for("Wave1", "PID", &schema).unwrap(), "W1_PID");
        let err = registry.column_for("Wave2", "PID", &schema).unwrap_err();
        assert!(matches!(err, TransitionError::ColumnNotFound { ref column } if column == "W2_PID"));
    }

    #[test]
    fn self_transition_needs_allowance() {
        let registry = registry();
        let request = WaveTransitionRequest::new("Wave1", "Wave1", "PID");
        assert!(matches!(
            registry.validate_request(&request),
            Err(TransitionError::SameWaveTransition { .. })
        ));
        assert!(registry
            .validate_request(&request.allowing_self_transition())
            .is_ok());
    }

    #[rstest]
    #[case("w1_to_w2", "Wave1", "Wave2")]
    #[case("W4_TO_W1", "Wave4", "Wave1")]
    #[case(" all_waves ", "Wave1", "Wave4")]
    fn parse_transition_resolves_numbers(
        #[case] config: &str,
        #[case] from: &str,
        #[case] to: &str,
    ) {
        let (parsed_from, parsed_to) = registry().parse_transition(config).unwrap();
        assert_eq!(parsed_from, from);
        assert_eq!(parsed_to, to);
    }

    #[rstest]
    #[case("w1-w2")]
    #[case("w1_to_wx")]
    #[case("w0_to_w2")]
    #[case("1_to_2")]
    #[case("w+1_to_w2")]
    #[case("w1_to_w+2")]
    #[case("w_to_w2")]
    fn parse_transition_rejects_malformed(#[case] config: &str) {
        assert!(matches!(
            registry().parse_transition(config),
            Err(TransitionError::InvalidWaveConfig { .. })
        ));
    }

    #[test]
    fn parse_transition_rejects_same_and_unknown_waves() {
        let registry = registry();
        assert!(matches!(
            registry.parse_transition("w2_to_w2"),
            Err(TransitionError::SameWaveTransition { .. })
        ));
        assert!(matches!(
            registry.parse_transition("w1_to_w3"),
            Err(TransitionError::UnknownWave { ref wave, .. }) if wave == "w3"
        ));
    }

    #[test]
    fn same_wave_is_reported_before_lookup() {
        assert!(matches!(
            registry().parse_transition("w3_to_w3"),
            Err(TransitionError::SameWaveTransition { ref wave }) if wave == "w3"
        ));
    }

    #[test]
    fn short_label_trims_prefix() {
        assert_eq!(registry().short_label("Wave4").unwrap(), "W4");
    }
}
