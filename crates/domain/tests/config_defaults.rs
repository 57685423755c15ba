use prs_domain::config::{Config, ConfigSeverity};

#[test]
fn default_store_points_at_github_api() {
    let config = Config::default();
    assert_eq!(config.store.api_base, "https://api.github.com");
    assert_eq!(config.store.token_env, "PRSENSE_GIST_TOKEN");
    assert_eq!(config.store.gist_id_env, "PRSENSE_GIST_ID");
}

#[test]
fn default_ledger_bounds_conflict_retries() {
    let config = Config::default();
    assert_eq!(config.ledger.max_update_attempts, 4);
    assert!(config.ledger.conflict_backoff_ms > 0);
}

#[test]
fn default_llm_model_selection() {
    let config = Config::default();
    assert_eq!(config.llm.model, "gpt-4o-mini");
    assert_eq!(config.llm.long_context_threshold, 15_000);
    assert_eq!(config.llm.max_tokens, 350);
}

#[test]
fn partial_toml_fills_in_defaults() {
    let toml_str = r#"
[store]
gist_id = "abcdef1234"

[github]
max_diff_lines = 200
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.store.gist_id, "abcdef1234");
    assert_eq!(config.store.timeout_ms, 8000);
    assert_eq!(config.github.max_diff_lines, 200);
    assert_eq!(config.github.token_env, "GITHUB_TOKEN");
}

#[test]
fn empty_gist_id_is_only_a_warning() {
    let config = Config::default();
    let issues = config.validate();
    let gist = issues
        .iter()
        .find(|i| i.field == "store.gist_id")
        .expect("gist_id note");
    assert_eq!(gist.severity, ConfigSeverity::Warning);
    // Everything else in the default config is valid.
    assert!(issues
        .iter()
        .all(|i| i.severity != ConfigSeverity::Error));
}

#[test]
fn zero_update_attempts_is_an_error() {
    let toml_str = r#"
[ledger]
max_update_attempts = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "ledger.max_update_attempts" && i.severity == ConfigSeverity::Error));
}

#[test]
fn empty_model_is_an_error() {
    let toml_str = r#"
[llm]
model = ""
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    assert!(issues
        .iter()
        .any(|i| i.field == "llm.model" && i.severity == ConfigSeverity::Error));
}
