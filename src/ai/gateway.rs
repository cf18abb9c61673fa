use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument, trace, warn};

use super::config::AiConfig;
use super::prompts::build_prompt;
use crate::text_utils::truncate_chars;

/// What the gateway hands back to the chat layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiAnswer {
    Success(String),
    /// Every candidate and every retry reported overload.
    Exhausted,
    /// A non-retryable fault; the reason is for logs only.
    Failed(String),
}

#[derive(Debug)]
enum Attempt {
    Generated(String),
    Overloaded,
    Failed(String),
}

#[derive(Deserialize)]
struct Generated {
    generated_text: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenerationResponse {
    Many(Vec<Generated>),
    One(Generated),
    Error { error: String },
}

fn looks_overloaded(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("overloaded") || lower.contains("currently loading") || lower.contains("too many requests")
}

/// Delay before retry number `attempt` (1-based): `base`, `2×base`, `4×base`, …
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    base.saturating_mul(1u32 << exponent)
}

/// Strip the echoed prompt, trim and cap the length. `None` when nothing is left.
pub fn finish_answer(generated: &str, prompt: &str, max_chars: usize) -> Option<String> {
    let answer = generated.strip_prefix(prompt).unwrap_or(generated).trim();
    if answer.is_empty() {
        return None;
    }
    Some(truncate_chars(answer, max_chars))
}

#[derive(Clone)]
pub struct AiGateway {
    client: reqwest::Client,
    config: Arc<AiConfig>,
}

impl AiGateway {
    pub fn new(config: AiConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: AiConfig) -> Self {
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Ask every candidate model once, falling through on overload, then
    /// retry the first model with exponential backoff.
    #[instrument(level = "debug", skip(self, question), fields(question_len = question.len()))]
    pub async fn ask(&self, question: &str) -> AiAnswer {
        let prompt = build_prompt(question);

        for model in &self.config.models {
            match self.generate(model, &prompt).await {
                Attempt::Generated(text) => return self.finish(&text, &prompt),
                Attempt::Overloaded => {
                    warn!(model = %model, "Model overloaded, trying next candidate");
                }
                Attempt::Failed(reason) => return AiAnswer::Failed(reason),
            }
        }

        let Some(first) = self.config.models.first() else {
            warn!("No AI models configured");
            return AiAnswer::Exhausted;
        };

        for attempt in 1..=self.config.max_retries {
            let delay = backoff_delay(self.config.backoff_base, attempt);
            debug!(model = %first, attempt, delay_ms = delay.as_millis() as u64, "Backing off before retry");
            tokio::time::sleep(delay).await;
            match self.generate(first, &prompt).await {
                Attempt::Generated(text) => return self.finish(&text, &prompt),
                Attempt::Overloaded => warn!(model = %first, attempt, "Model still overloaded"),
                Attempt::Failed(reason) => return AiAnswer::Failed(reason),
            }
        }

        warn!(retries = self.config.max_retries, "AI models exhausted");
        AiAnswer::Exhausted
    }

    fn finish(&self, generated: &str, prompt: &str) -> AiAnswer {
        match finish_answer(generated, prompt, self.config.max_answer_chars) {
            Some(answer) => AiAnswer::Success(answer),
            None => AiAnswer::Failed("empty answer".to_string()),
        }
    }

    #[instrument(level = "trace", skip(self, prompt))]
    async fn generate(&self, model: &str, prompt: &str) -> Attempt {
        let url = format!("{}/{}", self.config.api_url.trim_end_matches('/'), model);
        let body = json!({
            "inputs": prompt,
            "parameters": {
                "max_new_tokens": 512,
                "temperature": 0.7,
                "return_full_text": false,
            },
            "options": { "wait_for_model": false },
        });
        debug!(url = %url, "sending generation request");

        let resp = match self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_token)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => return Attempt::Failed(format!("request failed: {err}")),
        };

        let status = resp.status();
        let raw = match resp.text().await {
            Ok(raw) => raw,
            Err(err) => return Attempt::Failed(format!("failed to read body: {err}")),
        };
        let snippet: String = raw.chars().take(200).collect();
        debug!(%status, snippet = %snippet, "generation response body");

        if status == StatusCode::SERVICE_UNAVAILABLE || status == StatusCode::TOO_MANY_REQUESTS {
            return Attempt::Overloaded;
        }
        if !status.is_success() {
            if looks_overloaded(&raw) {
                return Attempt::Overloaded;
            }
            warn!(%status, "AI API error");
            return Attempt::Failed(format!("AI API error {status}: {snippet}"));
        }

        trace!(raw = %raw, "generation response");
        match serde_json::from_str::<GenerationResponse>(&raw) {
            Ok(GenerationResponse::Many(mut items)) if !items.is_empty() => {
                Attempt::Generated(items.swap_remove(0).generated_text)
            }
            Ok(GenerationResponse::One(item)) => Attempt::Generated(item.generated_text),
            Ok(GenerationResponse::Error { error }) if looks_overloaded(&error) => Attempt::Overloaded,
            Ok(GenerationResponse::Error { error }) => Attempt::Failed(error),
            Ok(GenerationResponse::Many(_)) => Attempt::Failed("empty generation list".to_string()),
            Err(err) => Attempt::Failed(format!("unexpected response: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles() {
        let base = Duration::from_secs(2);
        let delays: Vec<u64> = (1..=3).map(|a| backoff_delay(base, a).as_secs()).collect();
        assert_eq!(delays, vec![2, 4, 8]);
    }

    #[test]
    fn finish_answer_strips_echo_and_truncates() {
        let prompt = "Вопрос: x\nОтвет:";
        assert_eq!(
            finish_answer("Вопрос: x\nОтвет: Да.", prompt, 100),
            Some("Да.".to_string())
        );
        assert_eq!(finish_answer("  ", prompt, 100), None);
        assert_eq!(finish_answer("абвгд", prompt, 3), Some("абв…".to_string()));
    }

    #[test]
    fn overload_detection() {
        assert!(looks_overloaded("Model is overloaded, please try later"));
        assert!(looks_overloaded("Model mistral is currently loading"));
        assert!(!looks_overloaded("Authorization header is invalid"));
    }
}
