//! Configuration loading and override tests

use design_compliance::config::{ConfigOverrides, parse_interval, parse_watch_list};
use design_compliance::constants::{DEFAULT_CHECK_INTERVAL_MS, DEFAULT_LOG_LEVEL};
use design_compliance::logging::parse_log_level;
use design_compliance::{AgentConfig, AgentError, ConfigLoader, ReportFormat};
use figment::Jail;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = AgentConfig::default();

    assert_eq!(config.check_interval_ms, DEFAULT_CHECK_INTERVAL_MS);
    assert_eq!(
        config.watch_directories,
        vec![
            PathBuf::from("src/components"),
            PathBuf::from("src/modules"),
            PathBuf::from("src/design-system"),
        ]
    );
    assert_eq!(config.extensions.len(), 6);
    assert!(config.exclude_patterns.contains(&"node_modules".to_string()));
    assert_eq!(config.report_format, ReportFormat::Console);
    assert!(!config.auto_fix);
    assert!(config.history_limit.is_none());
    assert_eq!(config.logging.level, DEFAULT_LOG_LEVEL);
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let config = ConfigLoader::new()
        .with_config_path(temp.path().join("absent.toml"))
        .with_env_prefix("DESIGNER_AGENT_TEST_ABSENT")
        .load()
        .unwrap();

    assert_eq!(config, AgentConfig::default());
}

#[test]
fn test_toml_file_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("designer-agent.toml");
    std::fs::write(
        &path,
        r#"
watch_directories = ["app/ui"]
check_interval_ms = 5000
report_format = "html"
history_limit = 50

[logging]
level = "debug"
json_format = true
"#,
    )
    .unwrap();

    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("DESIGNER_AGENT_TEST_TOML");
    let config = loader.load().unwrap();

    assert_eq!(loader.config_path(), Some(path.as_path()));
    assert_eq!(config.watch_directories, vec![PathBuf::from("app/ui")]);
    assert_eq!(config.check_interval_ms, 5000);
    assert_eq!(config.report_format, ReportFormat::Html);
    assert_eq!(config.history_limit, Some(50));
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json_format);
    // Untouched keys keep their defaults
    assert_eq!(config.extensions, AgentConfig::default().extensions);
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "designer-agent.toml",
            "check_interval_ms = 5000\nauto_fix = false\n",
        )?;
        jail.set_env("DESIGNER_AGENT_CHECK_INTERVAL_MS", "1234");
        jail.set_env("DESIGNER_AGENT_AUTO_FIX", "true");
        jail.set_env("DESIGNER_AGENT_LOGGING__LEVEL", "warn");

        let config = ConfigLoader::new().load().unwrap();

        assert_eq!(config.check_interval_ms, 1234);
        assert!(config.auto_fix);
        assert_eq!(config.logging.level, "warn");
        Ok(())
    });
}

#[test]
fn test_invalid_values_rejected() {
    let temp = TempDir::new().unwrap();
    for (name, body) in [
        ("zero-interval.toml", "check_interval_ms = 0\n"),
        ("no-extensions.toml", "extensions = []\n"),
        ("zero-history.toml", "history_limit = 0\n"),
        ("bad-glob.toml", "exclude_patterns = [\"a[\"]\n"),
    ] {
        let path = temp.path().join(name);
        std::fs::write(&path, body).unwrap();

        let result = ConfigLoader::new()
            .with_config_path(&path)
            .with_env_prefix("DESIGNER_AGENT_TEST_INVALID")
            .load();

        assert!(
            matches!(result, Err(AgentError::Configuration(_))),
            "{name} should be rejected"
        );
    }
}

#[test]
fn test_overrides_apply() {
    let overrides = ConfigOverrides {
        watch: Some("src, lib ,".to_string()),
        interval: Some("2500".to_string()),
        auto_fix: true,
        format: Some("json".to_string()),
    };

    let config = overrides.apply(AgentConfig::default());

    assert_eq!(
        config.watch_directories,
        vec![PathBuf::from("src"), PathBuf::from("lib")]
    );
    assert_eq!(config.check_interval_ms, 2500);
    assert!(config.auto_fix);
    assert_eq!(config.report_format, ReportFormat::Json);
}

#[test]
fn test_invalid_overrides_fall_back() {
    let base = AgentConfig {
        check_interval_ms: 7000,
        report_format: ReportFormat::Html,
        ..AgentConfig::default()
    };
    let overrides = ConfigOverrides {
        watch: Some(" , ".to_string()),
        interval: Some("soon".to_string()),
        auto_fix: false,
        format: Some("pdf".to_string()),
    };

    let config = overrides.apply(base.clone());

    assert_eq!(config.watch_directories, base.watch_directories);
    assert_eq!(config.check_interval_ms, 7000);
    assert_eq!(config.report_format, ReportFormat::Console);
    assert!(!config.auto_fix);
}

#[test]
fn test_parse_helpers() {
    assert_eq!(parse_interval("100").unwrap(), 100);
    assert_eq!(parse_interval(" 30000 ").unwrap(), 30000);
    assert!(matches!(
        parse_interval("0"),
        Err(AgentError::InvalidConfigValue { .. })
    ));
    assert!(parse_interval("-5").is_err());
    assert!(parse_watch_list("").is_empty());
    assert_eq!(parse_watch_list("a,b"), vec![PathBuf::from("a"), PathBuf::from("b")]);
}

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("DEBUG").unwrap(), tracing::Level::DEBUG);
    assert_eq!(parse_log_level("warning").unwrap(), tracing::Level::WARN);
    assert!(parse_log_level("loud").is_err());
}

#[test]
fn test_saved_config_loads_back() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("saved.toml");
    let config = AgentConfig {
        watch_directories: vec![PathBuf::from("web/components")],
        check_interval_ms: 15_000,
        report_format: ReportFormat::Json,
        history_limit: Some(200),
        ..AgentConfig::default()
    };
    let loader = ConfigLoader::new()
        .with_config_path(&path)
        .with_env_prefix("DESIGNER_AGENT_TEST_SAVED");

    loader.save_to_file(&config, &path).unwrap();

    assert_eq!(loader.load().unwrap(), config);
}
