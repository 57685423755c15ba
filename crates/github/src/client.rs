//! REST client for the two GitHub calls the hook makes per event.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::Client;

use prs_domain::config::GithubConfig;
use prs_domain::error::{Error, Result};

/// Client for diff fetches and PR comments.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: Client,
    api_base: String,
    token: String,
}

impl GithubClient {
    /// Build a client from the shared [`GithubConfig`], resolving the
    /// repository token from the environment variable it names.
    pub fn new(cfg: &GithubConfig) -> Result<Self> {
        let token = std::env::var(&cfg.token_env).map_err(|_| {
            Error::Auth(format!(
                "environment variable '{}' not set or not valid UTF-8",
                cfg.token_env
            ))
        })?;

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_owned(),
            token,
        })
    }

    /// Fetch the pull request's unified diff.
    pub async fn fetch_pr_diff(&self, owner: &str, repo: &str, number: u64) -> Result<String> {
        let url = format!("{}/repos/{owner}/{repo}/pulls/{number}", self.api_base);

        tracing::debug!(owner, repo, number, "fetching pull request diff");

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/vnd.github.diff")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(USER_AGENT, "prsense")
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        let body = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Github(format!(
                "diff fetch returned {}: {body}",
                status.as_u16()
            )));
        }

        Ok(body)
    }

    /// Post a comment on the pull request (the issues endpoint accepts PR
    /// numbers).
    pub async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{owner}/{repo}/issues/{number}/comments",
            self.api_base
        );

        tracing::debug!(owner, repo, number, "posting pull request comment");

        let resp = self
            .http
            .post(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(USER_AGENT, "prsense")
            .json(&serde_json::json!({ "body": body }))
            .send()
            .await
            .map_err(from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Github(format!(
                "comment post returned {}: {body}",
                status.as_u16()
            )));
        }

        Ok(())
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
