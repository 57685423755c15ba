use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared usage document store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Connection settings for the shared usage document (a private gist
/// holding one `usage-<tenant>.json` file per tenant).
///
/// The bearer credential is a deployment-level secret and is therefore
/// never stored here, only the name of the environment variable that
/// holds it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "d_api_base")]
    pub api_base: String,
    /// Gist id of the shared usage document. When empty, read from the
    /// environment variable named by `gist_id_env` instead.
    #[serde(default)]
    pub gist_id: String,
    /// Environment variable holding the gist id.
    #[serde(default = "d_gist_id_env")]
    pub gist_id_env: String,
    /// Environment variable holding the bearer token (gist read+write).
    #[serde(default = "d_token_env")]
    pub token_env: String,
    #[serde(default = "d_8000")]
    pub timeout_ms: u64,
    /// Transient-failure retries per HTTP call (5xx / timeout).
    #[serde(default = "d_3")]
    pub max_retries: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base: d_api_base(),
            gist_id: String::new(),
            gist_id_env: d_gist_id_env(),
            token_env: d_token_env(),
            timeout_ms: 8000,
            max_retries: 3,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_api_base() -> String {
    "https://api.github.com".into()
}
fn d_gist_id_env() -> String {
    "PRSENSE_GIST_ID".into()
}
fn d_token_env() -> String {
    "PRSENSE_GIST_TOKEN".into()
}
fn d_8000() -> u64 {
    8000
}
fn d_3() -> u32 {
    3
}
