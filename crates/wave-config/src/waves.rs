//! Default wave definitions.

use wave_core::WaveDefinition;

/// Waves used when no configuration source defines any.
pub(crate) fn default_waves() -> Vec<WaveDefinition> {
    [("Wave1", "W1_"), ("Wave2", "W2_"), ("Wave3", "W3_")]
        .into_iter()
        .map(|(id, prefix)| WaveDefinition {
            id: id.to_string(),
            column_prefix: prefix.to_string(),
            description: String::new(),
        })
        .collect()
}
