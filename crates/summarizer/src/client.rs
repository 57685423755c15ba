//! OpenAI-compatible chat completions client.
//!
//! Works with any endpoint that follows the chat completions contract; the
//! endpoint, models, and budget all come from [`LlmConfig`]. Model
//! selection is size-based: diffs past the configured threshold go to the
//! long-context model.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;

use prs_domain::config::LlmConfig;
use prs_domain::error::{Error, Result};

use crate::prompt::{build_prompt, SYSTEM_PROMPT};

/// Comment body used when the model returns nothing usable.
pub const FALLBACK_SUMMARY: &str = "⚠️ Zusammenfassung konnte nicht generiert werden.";

/// Client for the summarization endpoint.
#[derive(Debug, Clone)]
pub struct SummaryClient {
    http: Client,
    base_url: String,
    api_key: String,
    model: String,
    long_context_model: String,
    long_context_threshold: usize,
    max_tokens: u32,
    temperature: Option<f32>,
}

impl SummaryClient {
    /// Build a client from the shared [`LlmConfig`], resolving the API key
    /// from the environment variable it names.
    pub fn new(cfg: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var(&cfg.api_key_env).map_err(|_| {
            Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                cfg.api_key_env
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_owned(),
            api_key,
            model: cfg.model.clone(),
            long_context_model: cfg.long_context_model.clone(),
            long_context_threshold: cfg.long_context_threshold,
            max_tokens: cfg.max_tokens,
            temperature: cfg.temperature,
        })
    }

    /// Summarize an already-truncated diff. Returns the comment body:
    /// either the model's three-line answer or [`FALLBACK_SUMMARY`].
    pub async fn summarize(&self, diff: &str) -> Result<String> {
        let model = self.model_for(diff);
        let body = self.build_chat_body(model, &build_prompt(diff));
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model, diff_chars = diff.len(), "requesting summary");

        let resp = self
            .http
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: "summarizer".into(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        let resp_json: Value = serde_json::from_str(&resp_text)?;
        Ok(parse_summary(&resp_json).unwrap_or_else(|| FALLBACK_SUMMARY.to_owned()))
    }

    /// Size-based model selection.
    fn model_for(&self, diff: &str) -> &str {
        if diff.len() > self.long_context_threshold {
            &self.long_context_model
        } else {
            &self.model
        }
    }

    fn build_chat_body(&self, model: &str, prompt: &str) -> Value {
        let mut body = serde_json::json!({
            "model": model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "max_tokens": self.max_tokens,
        });
        if let Some(temp) = self.temperature {
            body["temperature"] = serde_json::json!(temp);
        }
        body
    }
}

/// Extract the first choice's trimmed message content, if any.
fn parse_summary(body: &Value) -> Option<String> {
    let content = body
        .get("choices")?
        .as_array()?
        .first()?
        .get("message")?
        .get("content")?
        .as_str()?
        .trim();

    if content.is_empty() {
        None
    } else {
        Some(content.to_owned())
    }
}

/// Convert a `reqwest::Error` into the domain [`Error`] type.
fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Http(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_threshold(threshold: usize) -> SummaryClient {
        let var = "PRS_TEST_SUMMARIZER_KEY";
        std::env::set_var(var, "sk-test");
        let cfg = LlmConfig {
            api_key_env: var.into(),
            long_context_threshold: threshold,
            ..LlmConfig::default()
        };
        SummaryClient::new(&cfg).unwrap()
    }

    #[test]
    fn small_diff_uses_default_model() {
        let client = client_with_threshold(100);
        assert_eq!(client.model_for("short diff"), "gpt-4o-mini");
    }

    #[test]
    fn oversized_diff_switches_to_long_context_model() {
        let client = client_with_threshold(10);
        assert_eq!(client.model_for("a diff longer than ten"), "gpt-4o-mini-200k");
    }

    #[test]
    fn chat_body_carries_both_messages_and_budget() {
        let client = client_with_threshold(100);
        let body = client.build_chat_body("gpt-4o-mini", "summarize this");
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "summarize this");
        assert_eq!(body["max_tokens"], 350);
        assert!(body.get("temperature").is_none());
    }

    #[test]
    fn temperature_is_only_sent_when_configured() {
        let var = "PRS_TEST_SUMMARIZER_KEY_TEMP";
        std::env::set_var(var, "sk-test");
        let cfg = LlmConfig {
            api_key_env: var.into(),
            temperature: Some(0.2),
            ..LlmConfig::default()
        };
        let client = SummaryClient::new(&cfg).unwrap();
        let body = client.build_chat_body("gpt-4o-mini", "x");
        assert_eq!(body["temperature"], serde_json::json!(0.2_f32));
    }

    #[test]
    fn parses_first_choice_content() {
        let body = serde_json::json!({
            "choices": [
                { "message": { "content": "  DE: …\nEN: …\n• Keine Breaking Changes. | No breaking changes.  " } }
            ]
        });
        assert_eq!(
            parse_summary(&body).as_deref(),
            Some("DE: …\nEN: …\n• Keine Breaking Changes. | No breaking changes.")
        );
    }

    #[test]
    fn empty_or_missing_content_yields_none() {
        assert!(parse_summary(&serde_json::json!({"choices": []})).is_none());
        assert!(parse_summary(&serde_json::json!({
            "choices": [{ "message": { "content": "   " } }]
        }))
        .is_none());
        assert!(parse_summary(&serde_json::json!({})).is_none());
    }

    #[test]
    fn missing_key_env_is_an_auth_error() {
        let cfg = LlmConfig {
            api_key_env: "PRS_TEST_SUMMARIZER_KEY_UNSET_9999".into(),
            ..LlmConfig::default()
        };
        assert!(matches!(
            SummaryClient::new(&cfg).unwrap_err(),
            Error::Auth(_)
        ));
    }
}
