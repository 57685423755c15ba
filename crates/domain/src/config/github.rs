use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// GitHub API (diff fetch + PR comments)
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "d_api_base")]
    pub api_base: String,
    /// Environment variable holding the repository-scoped token.
    #[serde(default = "d_token_env")]
    pub token_env: String,
    #[serde(default = "d_10000")]
    pub timeout_ms: u64,
    /// Diff lines beyond this are dropped before prompting the model.
    #[serde(default = "d_400")]
    pub max_diff_lines: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base: d_api_base(),
            token_env: d_token_env(),
            timeout_ms: 10_000,
            max_diff_lines: 400,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_api_base() -> String {
    "https://api.github.com".into()
}
fn d_token_env() -> String {
    "GITHUB_TOKEN".into()
}
fn d_10000() -> u64 {
    10_000
}
fn d_400() -> usize {
    400
}
