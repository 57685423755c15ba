//! Per-event orchestration: quota check, summary, comment, charge.
//!
//! The ordering is load-bearing. The quota check happens before any
//! expensive work; the usage charge happens only after the summary comment
//! is delivered, so a failed summarization never consumes quota. A charge
//! that fails after delivery is logged and swallowed; the tenant gets one
//! summary for free rather than paying for nothing.

use std::path::PathBuf;
use std::sync::Arc;

use prs_domain::config::Config;
use prs_domain::error::{Error, Result};
use prs_domain::plan::Plan;
use prs_gist_store::GistStore;
use prs_github::{GithubClient, PullRequestEvent};
use prs_ledger::{QuotaDecision, QuotaLedger};
use prs_summarizer::{truncate_diff, SummaryClient};

/// Handle one pull-request event end to end.
pub async fn run(config: &Config, event_path: Option<PathBuf>) -> Result<()> {
    let event_path = match event_path {
        Some(path) => path,
        None => std::env::var("GITHUB_EVENT_PATH").map(PathBuf::from).map_err(|_| {
            Error::Config(
                "no event payload: pass --event or set GITHUB_EVENT_PATH".into(),
            )
        })?,
    };
    let event = PullRequestEvent::from_path(&event_path)?;

    let ledger = build_ledger(config)?;
    let github = GithubClient::new(&config.github)?;

    match ledger.check(&event.tenant_id).await? {
        QuotaDecision::Denied { plan, limit } => {
            tracing::info!(
                tenant = %event.tenant_id,
                %plan,
                limit,
                "monthly limit reached, posting notice"
            );
            github
                .post_comment(&event.owner, &event.repo, event.number, &limit_notice(plan, limit))
                .await
        }
        QuotaDecision::Allowed { plan, limit, used } => {
            tracing::info!(
                tenant = %event.tenant_id,
                %plan,
                used,
                limit,
                "quota available, summarizing"
            );

            let summarizer = SummaryClient::new(&config.llm)?;
            let diff = github
                .fetch_pr_diff(&event.owner, &event.repo, event.number)
                .await?;
            let diff = truncate_diff(&diff, config.github.max_diff_lines);
            let summary = summarizer.summarize(&diff).await?;
            github
                .post_comment(&event.owner, &event.repo, event.number, &summary)
                .await?;

            charge_after_delivery(&ledger, &event.tenant_id).await;
            Ok(())
        }
    }
}

/// Print the quota decision for a tenant.
pub async fn check(config: &Config, tenant: &str) -> Result<()> {
    let ledger = build_ledger(config)?;
    match ledger.check(tenant).await? {
        QuotaDecision::Allowed { plan, limit, used } => {
            println!("tenant {tenant}: allowed ({used}/{limit} on plan {plan})");
        }
        QuotaDecision::Denied { plan, limit } => {
            println!("tenant {tenant}: denied (limit {limit} reached on plan {plan})");
        }
    }
    Ok(())
}

fn build_ledger(config: &Config) -> Result<QuotaLedger> {
    let store = Arc::new(GistStore::new(&config.store)?);
    Ok(QuotaLedger::new(store, &config.ledger))
}

/// Charge one unit of quota for a summary that is already on the PR.
///
/// The comment is public by the time this runs, so a failed charge is
/// logged and swallowed: the tenant gets one summary uncharged rather than
/// a hard failure for a result that was delivered.
async fn charge_after_delivery(ledger: &QuotaLedger, tenant: &str) {
    if let Err(e) = ledger.record(tenant).await {
        tracing::warn!(
            tenant,
            error = %e,
            "usage charge failed after delivered summary"
        );
    }
}

/// Comment body posted when the tenant's monthly limit is reached.
pub fn limit_notice(plan: Plan, limit: u64) -> String {
    format!(
        "⚠️ **Plan-Limit erreicht** – {limit} PR/Monat für Plan **{plan}**.\n\
         👉 Bitte Marketplace-Upgrade durchführen."
    )
}
