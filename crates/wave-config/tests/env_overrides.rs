use figment::Jail;
use wave_config::WaveflowConfig;

#[test]
fn env_overrides_analysis_settings() {
    Jail::expect_with(|jail| {
        jail.set_env("WAVEFLOW_ANALYSIS__TOP_N", "3");
        jail.set_env("WAVEFLOW_ANALYSIS__STABLE_COLOR", "#00aa00");

        let config = WaveflowConfig::load().expect("config loads");
        assert_eq!(config.analysis.top_n, 3);
        assert_eq!(config.analysis.stable_color.as_str(), "#00aa00");
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".waveflow")?;
        jail.create_file(
            ".waveflow/config.toml",
            r"
[analysis]
top_n = 5
",
        )?;
        jail.set_env("WAVEFLOW_ANALYSIS__TOP_N", "8");

        let config = WaveflowConfig::load().expect("config loads");
        assert_eq!(config.analysis.top_n, 8);
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("WAVEFLOW_ANALYSIS__LINK_OPACITY", "2.5");

        assert!(WaveflowConfig::load().is_err());
        Ok(())
    });
}

#[test]
fn env_keys_under_variables_keep_their_case() {
    Jail::expect_with(|jail| {
        jail.set_env("WAVEFLOW_VARIABLES__PID__COLORS__Democrat", "#0000ff");
        jail.set_env("WAVEFLOW_ANALYSIS__TOP_N", "4");

        let config = WaveflowConfig::load().expect("config loads");
        let pid = config.variable("PID");
        assert_eq!(pid.colors["Democrat"].as_str(), "#0000ff");
        assert!(!config.variables.contains_key("pid"));
        assert_eq!(config.analysis.top_n, 4);
        Ok(())
    });
}
