use serde::{Deserialize, Serialize};

/// Quota ledger update behavior.
///
/// `max_update_attempts` bounds the load→increment→conditional-write loop
/// when concurrent invocations for the same tenant collide on the version
/// token. Exhausting the attempts surfaces as a store failure, never as a
/// silently dropped increment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "d_4")]
    pub max_update_attempts: u32,
    /// Base backoff between conflicting attempts; doubles per attempt.
    #[serde(default = "d_50")]
    pub conflict_backoff_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_update_attempts: 4,
            conflict_backoff_ms: 50,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_4() -> u32 {
    4
}
fn d_50() -> u64 {
    50
}
