use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summarization model
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Settings for the OpenAI-compatible chat completions endpoint used to
/// produce the bilingual summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_model")]
    pub model: String,
    /// Model used when the truncated diff exceeds `long_context_threshold`.
    #[serde(default = "d_long_model")]
    pub long_context_model: String,
    /// Diff size (chars) above which the long-context model is selected.
    #[serde(default = "d_15000")]
    pub long_context_threshold: usize,
    #[serde(default = "d_350")]
    pub max_tokens: u32,
    /// Sampling temperature. `None` lets the provider choose.
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default = "d_120000")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: d_base_url(),
            api_key_env: d_api_key_env(),
            model: d_model(),
            long_context_model: d_long_model(),
            long_context_threshold: 15_000,
            max_tokens: 350,
            temperature: None,
            timeout_ms: 120_000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn d_api_key_env() -> String {
    "OPENAI_API_KEY".into()
}
fn d_model() -> String {
    "gpt-4o-mini".into()
}
fn d_long_model() -> String {
    "gpt-4o-mini-200k".into()
}
fn d_15000() -> usize {
    15_000
}
fn d_350() -> u32 {
    350
}
fn d_120000() -> u64 {
    120_000
}
