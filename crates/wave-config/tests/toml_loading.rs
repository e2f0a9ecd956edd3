//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use wave_config::{ConfigError, WaveflowConfig};
use wave_core::{CleaningRule, MissingStrategy, MissingValueRule, UnlabeledStrategy};

#[test]
fn loads_waves_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[[waves]]
id = "Wave4"
column_prefix = "W4_"
description = "Autumn follow-up"

[[waves]]
id = "Wave7"
column_prefix = "W7_"
"#,
        )?;

        let config: WaveflowConfig = Figment::from(Serialized::defaults(WaveflowConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.waves.len(), 2);
        assert_eq!(config.waves[0].id, "Wave4");
        assert_eq!(config.waves[0].description, "Autumn follow-up");
        assert_eq!(config.waves[1].column_prefix, "W7_");
        assert_eq!(config.waves[1].description, "");
        Ok(())
    });
}

#[test]
fn loads_variable_rules_and_colors() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r##"
[[variables.PID.rules]]
kind = "merge"
source_value = "Something else"
target_value = "Independent"

[[variables.PID.rules]]
kind = "missing_value"
strategy = "mark_unknown"
values = ["99"]
custom_label = "Unknown"

[variables.PID.colors]
Democrat = "#1f77b4"
Republican = "#d62728"
"##,
        )?;

        let config: WaveflowConfig = Figment::from(Serialized::defaults(WaveflowConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let pid = config.variable("PID");
        assert_eq!(
            pid.rules,
            vec![
                CleaningRule::merge("Something else", "Independent"),
                MissingValueRule::new(MissingStrategy::MarkUnknown, ["99"])
                    .with_label("Unknown")
                    .into(),
            ]
        );
        assert_eq!(pid.colors["Republican"].as_str(), "#d62728");
        // Defaults survive when the file defines no waves.
        assert_eq!(config.waves.len(), 3);
        Ok(())
    });
}

#[test]
fn loads_value_labels() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[variables.PID]
unlabeled = "mark_missing"

[variables.PID.value_labels]
1 = "Democrat"
2 = "Republican"
"#,
        )?;

        let config: WaveflowConfig = Figment::from(Serialized::defaults(WaveflowConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let pid = config.variable("PID");
        assert_eq!(pid.value_labels["1"], "Democrat");
        assert_eq!(pid.value_labels["2"], "Republican");
        assert_eq!(pid.unlabeled, UnlabeledStrategy::MarkMissing);
        assert_eq!(config.variable("HFClust").unlabeled, UnlabeledStrategy::KeepOriginal);
        Ok(())
    });
}

#[test]
fn load_from_file_validates() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "bad.toml",
            r"
[analysis]
top_n = 0
",
        )?;

        let err = WaveflowConfig::load_from_file("bad.toml").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "analysis.top_n"));
        Ok(())
    });
}

#[test]
fn malformed_color_fails_extraction() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[variables.PID.colors]
Democrat = "blue"
"#,
        )?;

        let err = WaveflowConfig::load_from_file("config.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".waveflow")?;
        jail.create_file(
            ".waveflow/config.toml",
            r"
[analysis]
top_n = 5
link_opacity = 0.4
",
        )?;

        let config = WaveflowConfig::load().expect("config loads");
        assert_eq!(config.analysis.top_n, 5);
        assert!((config.analysis.link_opacity - 0.4).abs() < f64::EPSILON);
        Ok(())
    });
}
