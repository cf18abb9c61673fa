use std::path::PathBuf;
use std::time::Duration;

use serial_test::serial;
use stroyhelper::ai::config::{AiConfig, DEFAULT_API_URL, DEFAULT_MODELS};
use stroyhelper::Config;

const AI_VARS: [&str; 5] = [
    "HF_API_TOKEN",
    "AI_MODELS",
    "AI_API_URL",
    "AI_MAX_RETRIES",
    "AI_BACKOFF_SECS",
];

fn clear_ai_env() {
    for var in AI_VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn ai_config_from_env_missing_token() {
    clear_ai_env();
    assert!(AiConfig::from_env().is_none());
    std::env::set_var("HF_API_TOKEN", "  ");
    assert!(AiConfig::from_env().is_none());
    clear_ai_env();
}

#[test]
#[serial]
fn ai_config_from_env_defaults() {
    clear_ai_env();
    std::env::set_var("HF_API_TOKEN", "k");
    let cfg = AiConfig::from_env().unwrap();
    assert_eq!(cfg.api_token, "k");
    assert_eq!(cfg.api_url, DEFAULT_API_URL);
    assert_eq!(cfg.models, DEFAULT_MODELS.map(String::from).to_vec());
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.backoff_base, Duration::from_secs(2));
    assert_eq!(cfg.max_answer_chars, 3500);
    clear_ai_env();
}

#[test]
#[serial]
fn ai_config_from_env_overrides() {
    clear_ai_env();
    std::env::set_var("HF_API_TOKEN", "k");
    std::env::set_var("AI_MODELS", "a/one, b/two ,");
    std::env::set_var("AI_API_URL", "http://localhost:9000/models/");
    std::env::set_var("AI_MAX_RETRIES", "5");
    std::env::set_var("AI_BACKOFF_SECS", "1");
    let cfg = AiConfig::from_env().unwrap();
    assert_eq!(cfg.models, vec!["a/one".to_string(), "b/two".to_string()]);
    assert_eq!(cfg.api_url, "http://localhost:9000/models");
    assert_eq!(cfg.max_retries, 5);
    assert_eq!(cfg.backoff_base, Duration::from_secs(1));
    clear_ai_env();
}

#[test]
#[serial]
fn config_from_env_reads_paths() {
    clear_ai_env();
    std::env::set_var("DB_URL", "sqlite:test.db");
    std::env::set_var("SHOPPING_LIST_PATH", "/tmp/lists.json");
    std::env::set_var("CATALOG_PATH", "/etc/catalog.json");
    std::env::set_var("HF_API_TOKEN", "k");
    let cfg = Config::from_env();
    assert_eq!(cfg.db_url, "sqlite:test.db");
    assert_eq!(cfg.shopping_list_path, PathBuf::from("/tmp/lists.json"));
    assert_eq!(cfg.catalog_path, Some(PathBuf::from("/etc/catalog.json")));
    assert_eq!(cfg.ai.unwrap().api_token, "k");

    std::env::remove_var("DB_URL");
    std::env::remove_var("SHOPPING_LIST_PATH");
    std::env::remove_var("CATALOG_PATH");
    clear_ai_env();
}

#[test]
#[serial]
fn config_defaults_without_env() {
    clear_ai_env();
    std::env::remove_var("DB_URL");
    std::env::remove_var("SHOPPING_LIST_PATH");
    std::env::remove_var("CATALOG_PATH");
    let cfg = Config::from_env();
    assert_eq!(cfg.shopping_list_path, PathBuf::from("shopping_list.json"));
    assert!(cfg.catalog_path.is_none());
}
