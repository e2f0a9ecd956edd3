//! Analysis and presentation defaults.

use serde::{Deserialize, Serialize};
use wave_core::HexColor;

use crate::error::ConfigError;

/// Default number of patterns kept for bar charts.
const fn default_top_n() -> usize {
    15
}

/// Default link opacity for flow diagrams.
const fn default_link_opacity() -> f64 {
    0.6
}

/// Colors handed out, in order, to categories without an explicit mapping.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

fn hex(value: &str) -> HexColor {
    HexColor::parse(value).unwrap_or_else(|_| unreachable!("built-in color {value} is valid"))
}

fn default_palette() -> Vec<HexColor> {
    DEFAULT_PALETTE.iter().map(|value| hex(value)).collect()
}

fn default_neutral_color() -> HexColor {
    hex("#808080")
}

fn default_stable_color() -> HexColor {
    hex("#2E8B57")
}

fn default_changed_color() -> HexColor {
    hex("#FF8C00")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Number of top patterns returned in pattern data.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Opacity of flow-diagram links, 0.0–1.0.
    #[serde(default = "default_link_opacity")]
    pub link_opacity: f64,

    /// Fallback palette for unmapped categories.
    #[serde(default = "default_palette")]
    pub palette: Vec<HexColor>,

    /// Color for values outside both the mappings and the palette assignment.
    #[serde(default = "default_neutral_color")]
    pub neutral_color: HexColor,

    /// Bar color for stable patterns.
    #[serde(default = "default_stable_color")]
    pub stable_color: HexColor,

    /// Bar color for changed patterns.
    #[serde(default = "default_changed_color")]
    pub changed_color: HexColor,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            link_opacity: default_link_opacity(),
            palette: default_palette(),
            neutral_color: default_neutral_color(),
            stable_color: default_stable_color(),
            changed_color: default_changed_color(),
        }
    }
}

impl AnalysisConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::invalid("analysis.top_n", "must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.link_opacity) {
            return Err(ConfigError::invalid(
                "analysis.link_opacity",
                format!("{} is outside 0.0..=1.0", self.link_opacity),
            ));
        }
        if self.palette.is_empty() {
            return Err(ConfigError::invalid("analysis.palette", "palette is empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AnalysisConfig::default();
        assert_eq!(config.top_n, 15);
        assert!((config.link_opacity - 0.6).abs() < f64::EPSILON);
        assert_eq!(config.palette.len(), 8);
        assert_eq!(config.palette[0].as_str(), "#1f77b4");
        assert_eq!(config.neutral_color.as_str(), "#808080");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn opacity_out_of_range_is_rejected() {
        let config = AnalysisConfig {
            link_opacity: 1.5,
            ..AnalysisConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.link_opacity"));
    }

    #[test]
    fn empty_palette_is_rejected() {
        let config = AnalysisConfig {
            palette: Vec::new(),
            ..AnalysisConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
