use std::env;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api-inference.huggingface.co/models";
pub const DEFAULT_MODELS: [&str; 2] = [
    "mistralai/Mistral-7B-Instruct-v0.3",
    "HuggingFaceH4/zephyr-7b-beta",
];
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_SECS: u64 = 2;
pub const DEFAULT_MAX_ANSWER_CHARS: usize = 3500;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_token: String,
    pub api_url: String,
    /// Candidate models in the order they are tried.
    pub models: Vec<String>,
    pub max_retries: u32,
    pub backoff_base: Duration,
    pub max_answer_chars: usize,
}

impl AiConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: Duration::from_secs(DEFAULT_BACKOFF_SECS),
            max_answer_chars: DEFAULT_MAX_ANSWER_CHARS,
        }
    }

    /// `None` when `HF_API_TOKEN` is not set, which disables AI answers.
    pub fn from_env() -> Option<Self> {
        let api_token = match env::var("HF_API_TOKEN") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        let mut config = Self::new(api_token);
        if let Ok(url) = env::var("AI_API_URL") {
            config.api_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(models) = env::var("AI_MODELS") {
            let models: Vec<String> = models
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(ToString::to_string)
                .collect();
            if !models.is_empty() {
                config.models = models;
            }
        }
        if let Some(retries) = env::var("AI_MAX_RETRIES").ok().and_then(|v| v.parse().ok()) {
            config.max_retries = retries;
        }
        if let Some(secs) = env::var("AI_BACKOFF_SECS").ok().and_then(|v| v.parse().ok()) {
            config.backoff_base = Duration::from_secs(secs);
        }
        Some(config)
    }
}
