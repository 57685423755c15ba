//! The per-tenant monthly quota ledger.
//!
//! Every quota-consuming operation makes two passes over the shared usage
//! document:
//!
//! 1. [`QuotaLedger::check`] before the expensive work: load the tenant's
//!    record (synthesizing a free-plan default for unseen tenants), compare
//!    the current period's count against the plan limit, and return a
//!    decision.
//! 2. [`QuotaLedger::record`] after the work succeeded: re-read the
//!    record, bump the current period's counter, and write it back
//!    conditionally on the version token captured by the read.
//!
//! The split means a failed summarization never consumes quota. The
//! conditional write means a concurrent invocation for the same tenant
//! cannot erase an increment: the losing writer re-reads and retries, up to
//! a bounded number of attempts. The ledger's write path never touches the
//! `plan` field; each retry starts from a fresh read, so a plan change made
//! by an external billing process always survives.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use prs_domain::config::LedgerConfig;
use prs_domain::error::{Error, Result};
use prs_domain::period::period_key;
use prs_domain::plan::Plan;
use prs_domain::usage::UsageRecord;
use prs_gist_store::DocumentStore;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Decision
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Outcome of a quota check. `Denied` is a well-formed decision, not an
/// error: the caller must skip the quota-consuming work and surface a
/// limit-reached notice instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed { plan: Plan, limit: u64, used: u64 },
    Denied { plan: Plan, limit: u64 },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Ledger
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stateless quota evaluation over an injected [`DocumentStore`].
pub struct QuotaLedger {
    store: Arc<dyn DocumentStore>,
    max_update_attempts: u32,
    conflict_backoff: Duration,
}

impl QuotaLedger {
    pub fn new(store: Arc<dyn DocumentStore>, cfg: &LedgerConfig) -> Self {
        Self {
            store,
            max_update_attempts: cfg.max_update_attempts,
            conflict_backoff: Duration::from_millis(cfg.conflict_backoff_ms),
        }
    }

    /// The tenant's file name inside the shared document.
    pub fn file_name(tenant: &str) -> String {
        format!("usage-{tenant}.json")
    }

    /// Decide whether the tenant may consume one more unit of quota in the
    /// current period. Consumes nothing.
    pub async fn check(&self, tenant: &str) -> Result<QuotaDecision> {
        self.check_at(tenant, Utc::now()).await
    }

    /// [`QuotaLedger::check`] with a pinned clock.
    pub async fn check_at(&self, tenant: &str, now: DateTime<Utc>) -> Result<QuotaDecision> {
        let file = Self::file_name(tenant);
        let fetched = self.store.get(&file).await?;
        let record = parse_record(&file, fetched.content.as_deref())?;

        let period = period_key(now);
        let used = record.count_for(&period);
        let plan = record.plan_tier();
        let limit = plan.limit();

        if used >= limit {
            tracing::info!(tenant, %plan, limit, used, "quota exhausted");
            Ok(QuotaDecision::Denied { plan, limit })
        } else {
            tracing::debug!(tenant, %plan, limit, used, "quota available");
            Ok(QuotaDecision::Allowed { plan, limit, used })
        }
    }

    /// Charge one unit of quota for the current period.
    ///
    /// Call only after the guarded work completed successfully. Conflicting
    /// conditional writes are retried from a fresh read with exponential
    /// back-off; exhausting the attempts surfaces as
    /// [`Error::StoreUnavailable`].
    pub async fn record(&self, tenant: &str) -> Result<()> {
        self.record_at(tenant, Utc::now()).await
    }

    /// [`QuotaLedger::record`] with a pinned clock.
    pub async fn record_at(&self, tenant: &str, now: DateTime<Utc>) -> Result<()> {
        let file = Self::file_name(tenant);
        let period = period_key(now);

        for attempt in 0..self.max_update_attempts {
            if attempt > 0 {
                let exp = (attempt - 1).min(4);
                tokio::time::sleep(self.conflict_backoff * 2u32.pow(exp)).await;
            }

            let fetched = self.store.get(&file).await?;
            let mut record = parse_record(&file, fetched.content.as_deref())?;
            record.increment(&period);
            let content = serde_json::to_string(&record)?;

            match self.store.put(&file, &content, &fetched.version).await {
                Ok(()) => {
                    tracing::debug!(tenant, period = %period, "usage recorded");
                    return Ok(());
                }
                Err(Error::VersionConflict { .. }) => {
                    tracing::debug!(tenant, attempt, "conditional write conflicted, retrying");
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::StoreUnavailable(format!(
            "usage update for tenant {tenant}: {} conditional writes conflicted",
            self.max_update_attempts
        )))
    }
}

/// Parse stored file content into a record. Absence synthesizes the default
/// free-plan record; content that does not parse is corrupt state and fails
/// the invocation rather than resetting the tenant's history.
fn parse_record(file: &str, content: Option<&str>) -> Result<UsageRecord> {
    match content {
        None => Ok(UsageRecord::default()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| Error::MalformedRecord {
            file: file.to_owned(),
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_embeds_tenant_id() {
        assert_eq!(QuotaLedger::file_name("12345678"), "usage-12345678.json");
        assert_eq!(QuotaLedger::file_name("anon"), "usage-anon.json");
    }

    #[test]
    fn absent_content_synthesizes_free_default() {
        let record = parse_record("usage-1.json", None).unwrap();
        assert_eq!(record.plan, "free");
        assert!(record.periods.is_empty());
    }

    #[test]
    fn garbage_content_is_malformed_not_reset() {
        let err = parse_record("usage-1.json", Some("not json")).unwrap_err();
        match err {
            Error::MalformedRecord { file, .. } => assert_eq!(file, "usage-1.json"),
            other => panic!("expected MalformedRecord, got {other:?}"),
        }
    }
}
