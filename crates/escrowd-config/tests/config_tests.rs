// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the escrowd configuration system.

use escrowd_config::diagnostic::{suggest_key, ConfigError};
use escrowd_config::model::EscrowdConfig;
use escrowd_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_escrowd_config() {
    let toml = r#"
[agent]
name = "test-escrowd"
log_level = "debug"

[telegram]
bot_token = "123:ABC"
admin_ids = [11111111, 22222222]
escrow_group_id = -1001234567890
main_group_id = -1009876543210
escrow_group_link = "https://t.me/+escrow"
main_group_link = "https://t.me/+main"
main_channel_link = "https://t.me/channel"

[storage]
database_path = "/tmp/test.db"
wal_mode = false

[moderation]
endpoint = "http://127.0.0.1:8080/classify"
confidence_threshold = 0.7

[prometheus]
enabled = true
listen_addr = "0.0.0.0:9184"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "test-escrowd");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:ABC"));
    assert_eq!(config.telegram.admin_ids, vec![11111111, 22222222]);
    assert_eq!(config.telegram.escrow_group_id, Some(-1001234567890));
    assert_eq!(config.telegram.main_group_id, Some(-1009876543210));
    assert_eq!(
        config.telegram.escrow_group_link.as_deref(),
        Some("https://t.me/+escrow")
    );
    assert_eq!(config.storage.database_path, "/tmp/test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(
        config.moderation.endpoint.as_deref(),
        Some("http://127.0.0.1:8080/classify")
    );
    assert_eq!(config.moderation.confidence_threshold, 0.7);
    assert!(config.prometheus.enabled);
    assert_eq!(config.prometheus.listen_addr, "0.0.0.0:9184");
}

/// Unknown field in [telegram] section produces an error.
#[test]
fn unknown_field_in_telegram_produces_error() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("bot_tken"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let toml = "";
    let config = load_config_from_str(toml).expect("empty TOML should use defaults");

    assert_eq!(config.agent.name, "escrowd");
    assert_eq!(config.agent.log_level, "info");
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.admin_ids.is_empty());
    assert!(config.telegram.escrow_group_id.is_none());
    assert!(config.storage.wal_mode);
    assert!(config.moderation.endpoint.is_none());
    assert_eq!(config.moderation.confidence_threshold, 0.5);
    assert!(!config.prometheus.enabled);
    assert_eq!(config.prometheus.listen_addr, "127.0.0.1:9184");
}

/// Dot-notation override takes precedence over TOML (how env vars merge).
#[test]
fn override_takes_precedence_over_toml() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let toml_content = r#"
[agent]
name = "from-toml"
"#;

    let config: EscrowdConfig = Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(Toml::string(toml_content))
        .merge(("agent.name", "envtest"))
        .extract()
        .expect("should merge env override");

    assert_eq!(config.agent.name, "envtest");
}

/// telegram.bot_token is addressable via dot notation, so
/// ESCROWD_TELEGRAM_BOT_TOKEN maps to it (not telegram.bot.token).
#[test]
fn bot_token_addressable_via_dot_notation() {
    use figment::{providers::Serialized, Figment};

    let config: EscrowdConfig = Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(("telegram.bot_token", "xyz-from-env"))
        .extract()
        .expect("should set bot_token via dot notation");

    assert_eq!(config.telegram.bot_token.as_deref(), Some("xyz-from-env"));
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
fn missing_config_files_silently_skipped() {
    use figment::{
        providers::{Format, Serialized, Toml},
        Figment,
    };

    let config: EscrowdConfig = Figment::new()
        .merge(Serialized::defaults(EscrowdConfig::default()))
        .merge(Toml::file("/nonexistent/path/escrowd.toml"))
        .extract()
        .expect("missing file should be silently skipped");

    assert_eq!(config.agent.name, "escrowd");
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[payments]
provider = "upi"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("payments"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// The group allow-list combines both configured group ids.
#[test]
fn allowed_group_ids_combines_both_groups() {
    let toml = r#"
[telegram]
escrow_group_id = -100111
main_group_id = -100222
"#;
    let config = load_config_from_str(toml).expect("should parse");
    assert_eq!(config.telegram.allowed_group_ids(), vec![-100111, -100222]);

    let partial = load_config_from_str("[telegram]\nescrow_group_id = -100111\n")
        .expect("should parse");
    assert_eq!(partial.telegram.allowed_group_ids(), vec![-100111]);

    let none = EscrowdConfig::default();
    assert!(none.telegram.allowed_group_ids().is_empty());
}

/// load_config_from_path reads an explicit file.
#[test]
fn load_config_from_path_reads_file() {
    use std::io::Write;

    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("escrowd.toml");
    let mut file = std::fs::File::create(&path).expect("create config file");
    writeln!(file, "[agent]\nname = \"from-file\"").expect("write config");

    let config =
        escrowd_config::load_config_from_path(&path).expect("explicit path should load");
    assert_eq!(config.agent.name, "from-file");
}

/// Unknown key "bot_tken" produces suggestion "did you mean `bot_token`?"
#[test]
fn diagnostic_bot_tken_suggests_bot_token() {
    let valid_keys = &["bot_token", "admin_ids"];
    let suggestion = suggest_key("bot_tken", valid_keys);
    assert_eq!(suggestion, Some("bot_token".to_string()));
}

/// Unknown key "zzzzzz" with no close match does NOT produce a suggestion.
#[test]
fn diagnostic_no_suggestion_for_distant_typo() {
    let valid_keys = &["bot_token", "admin_ids", "escrow_group_id"];
    let suggestion = suggest_key("zzzzzz", valid_keys);
    assert_eq!(suggestion, None);
}

/// load_and_validate_str turns unknown keys into UnknownKey diagnostics.
#[test]
fn load_and_validate_str_reports_unknown_key_diagnostic() {
    let toml = r#"
[telegram]
bot_tken = "abc"
"#;
    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert!(errors.iter().any(|e| matches!(
        e,
        ConfigError::UnknownKey { key, suggestion, .. }
            if key.contains("bot_tken") && suggestion.as_deref() == Some("bot_token")
    )));
}

/// load_and_validate_str collects semantic validation errors after parsing.
#[test]
fn load_and_validate_str_reports_validation_errors() {
    let toml = r#"
[telegram]
escrow_group_id = 12345

[moderation]
confidence_threshold = 2.0
"#;
    let errors = load_and_validate_str(toml).expect_err("should fail validation");
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| matches!(e, ConfigError::Validation { .. })));
}
