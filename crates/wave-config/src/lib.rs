//! # wave-config
//!
//! Layered configuration loading for Waveflow using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`WAVEFLOW_*` prefix, `__` as separator)
//! 2. Project-level `.waveflow/config.toml`
//! 3. User-level `~/.config/waveflow/config.toml`
//! 4. Built-in defaults (waves `Wave1`..`Wave3` with prefixes `W1_`..`W3_`)
//!
//! # Environment Variable Mapping
//!
//! Figment maps `WAVEFLOW_ANALYSIS__TOP_N` -> `analysis.top_n`,
//! `WAVEFLOW_ANALYSIS__LINK_OPACITY` -> `analysis.link_opacity`, etc.
//! Keys under `variables` keep the case of the variable name and of any
//! nested map key, so `WAVEFLOW_VARIABLES__PID__COLORS__Democrat` ->
//! `variables.PID.colors.Democrat`.
//!
//! # File Layout
//!
//! ```toml
//! [[waves]]
//! id = "Wave1"
//! column_prefix = "W1_"
//! description = "Baseline"
//!
//! [variables.PID]
//! unlabeled = "keep_original"
//!
//! [variables.PID.value_labels]
//! 1 = "Democrat"
//! 2 = "Republican"
//!
//! [[variables.PID.rules]]
//! kind = "merge"
//! source_value = "Something else"
//! target_value = "Independent"
//!
//! [[variables.PID.rules]]
//! kind = "missing_value"
//! strategy = "mark_unknown"
//! values = ["99"]
//!
//! [variables.PID.colors]
//! Democrat = "#1f77b4"
//! Republican = "#d62728"
//!
//! [analysis]
//! top_n = 10
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use wave_config::WaveflowConfig;
//!
//! let config = WaveflowConfig::load_with_dotenv().expect("config");
//! for wave in &config.waves {
//!     println!("{} -> {}", wave.id, wave.column_prefix);
//! }
//! ```

mod analysis;
mod error;
mod variables;
mod waves;

pub use analysis::{AnalysisConfig, DEFAULT_PALETTE};
pub use error::ConfigError;
pub use variables::VariableConfig;

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use wave_core::WaveDefinition;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WaveflowConfig {
    /// Ordered wave definitions.
    #[serde(default = "waves::default_waves")]
    pub waves: Vec<WaveDefinition>,
    /// Rules and colors keyed by variable base-name.
    #[serde(default)]
    pub variables: BTreeMap<String, VariableConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for WaveflowConfig {
    fn default() -> Self {
        Self {
            waves: waves::default_waves(),
            variables: BTreeMap::new(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl WaveflowConfig {
    /// Load configuration from all sources (TOML files + environment variables)
    /// and validate it.
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load() -> Result<Self, ConfigError> {
        Self::extract(Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load defaults, then an explicit TOML file, then environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let figment = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Self::env());
        Self::extract(figment)
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".waveflow/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Self::env())
    }

    /// `WAVEFLOW_*` provider. Variable names and category labels keep their
    /// case; every other key segment is lowercased.
    fn env() -> Env {
        Env::prefixed("WAVEFLOW_")
            .lowercase(false)
            .split("__")
            .map(|key| env_key(key.as_str()).into())
    }

    /// Extract from an arbitrary figment and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction or validation fails.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Check wave definitions and analysis settings.
    ///
    /// Cleaning rules are validated by the transition engine, which owns the
    /// merge-conflict and cycle policy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waves.is_empty() {
            return Err(ConfigError::invalid("waves", "no wave definitions"));
        }
        let mut seen = BTreeSet::new();
        for wave in &self.waves {
            wave.validate()
                .map_err(|e| ConfigError::invalid("waves", e.to_string()))?;
            if !seen.insert(wave.id.as_str()) {
                return Err(ConfigError::invalid(
                    "waves",
                    format!("duplicate wave id '{}'", wave.id),
                ));
            }
        }
        self.analysis.validate()
    }

    /// Settings for a variable, or empty settings if none are configured.
    #[must_use]
    pub fn variable(&self, base_name: &str) -> VariableConfig {
        self.variables.get(base_name).cloned().unwrap_or_default()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("waveflow").join("config.toml"))
    }
}

/// Lowercase a dotted env key except for the segments that name user data.
///
/// `variables.<name>.<field>.<entry>...` keeps `<name>` and everything past
/// `<field>` as written.
fn env_key(key: &str) -> String {
    let segments: Vec<&str> = key.split('.').collect();
    let under_variables = segments
        .first()
        .is_some_and(|first| first.eq_ignore_ascii_case("variables"));
    segments
        .iter()
        .enumerate()
        .map(|(index, segment)| {
            if under_variables && (index == 1 || index > 2) {
                (*segment).to_string()
            } else {
                segment.to_ascii_lowercase()
            }
        })
        .collect::<Vec<_>>()
        .join(".")
}
