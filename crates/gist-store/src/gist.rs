//! Gist-backed implementation of [`DocumentStore`].
//!
//! `GistStore` wraps a `reqwest::Client` and maps the trait onto the gist
//! REST API: `GET /gists/{id}` to read (capturing the `ETag`) and
//! `PATCH /gists/{id}` with `If-Match` to write. Transient failures
//! (5xx / timeout) are retried with exponential back-off; a `412` on write
//! is re-validated against the file's content fingerprint so that only a
//! change to the *caller's own file* counts as a conflict.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, ETAG, IF_MATCH, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use prs_domain::config::StoreConfig;
use prs_domain::error::{Error, Result};

use crate::store::{DocVersion, DocumentStore, FetchedDoc};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for the shared usage gist.
///
/// Created once per invocation and cheap to clone; the underlying
/// `reqwest::Client` maintains a connection pool.
#[derive(Debug, Clone)]
pub struct GistStore {
    http: Client,
    api_base: String,
    gist_id: String,
    token: String,
    max_retries: u32,
}

impl GistStore {
    /// Build a new store client from the shared [`StoreConfig`].
    ///
    /// The gist id comes from the config field or, when that is empty, from
    /// the environment variable it names. The bearer token always comes
    /// from the environment: it is a deployment-level secret shared by all
    /// tenants and must never be tenant-scoped.
    pub fn new(cfg: &StoreConfig) -> Result<Self> {
        let gist_id = if !cfg.gist_id.is_empty() {
            cfg.gist_id.clone()
        } else {
            std::env::var(&cfg.gist_id_env).map_err(|_| {
                Error::Config(format!(
                    "no gist id: set store.gist_id or the ${} environment variable",
                    cfg.gist_id_env
                ))
            })?
        };

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
            gist_id,
            token,
            max_retries: cfg.max_retries,
        })
    }

    fn gist_url(&self) -> String {
        format!("{}/gists/{}", self.api_base, self.gist_id)
    }

    /// Decorate a request with the standard gist API headers.
    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        rb.header(ACCEPT, "application/vnd.github+json")
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(USER_AGENT, "prsense")
            .header("X-Trace-Id", Uuid::new_v4().to_string())
    }

    // ── retry engine ─────────────────────────────────────────────────

    /// Execute a request with retry + exponential back-off on transient
    /// errors.
    ///
    /// * Retries on 5xx status codes, timeouts, and connection errors.
    /// * Does **not** retry on 4xx; 401/403 surface as `Auth`, the rest as
    ///   `StoreUnavailable`.
    /// * A `412 Precondition Failed` is returned to the caller, which owns
    ///   conditional-write re-validation.
    async fn execute_with_retry(
        &self,
        endpoint: &str,
        build_request: impl Fn() -> RequestBuilder,
    ) -> Result<Response> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(backoff).await;
            }

            let rb = self.decorate(build_request());
            match rb.send().await {
                Ok(resp) => {
                    let status = resp.status();

                    if status.is_server_error() {
                        let body = resp.text().await.unwrap_or_default();
                        tracing::debug!(
                            endpoint,
                            status = status.as_u16(),
                            "transient store failure, retrying"
                        );
                        last_err = Some(Error::Http(format!(
                            "{endpoint} returned {}: {body}",
                            status.as_u16()
                        )));
                        continue;
                    }

                    if status == StatusCode::PRECONDITION_FAILED {
                        return Ok(resp);
                    }

                    if status.is_client_error() {
                        let body = resp.text().await.unwrap_or_default();
                        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                            return Err(Error::Auth(format!(
                                "{endpoint} auth failed ({}): {body}",
                                status.as_u16()
                            )));
                        }
                        return Err(Error::StoreUnavailable(format!(
                            "{endpoint} returned {}: {body}",
                            status.as_u16()
                        )));
                    }

                    return Ok(resp);
                }
                Err(e) => {
                    last_err = Some(if e.is_timeout() {
                        Error::Timeout(e.to_string())
                    } else {
                        Error::Http(e.to_string())
                    });
                    continue;
                }
            }
        }

        let detail = last_err
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no response".into());
        Err(Error::StoreUnavailable(format!("{endpoint}: {detail}")))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl DocumentStore for GistStore {
    async fn get(&self, name: &str) -> Result<FetchedDoc> {
        let url = self.gist_url();
        let resp = self
            .execute_with_retry("GET /gists", || self.http.get(&url))
            .await?;

        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        let body = resp
            .text()
            .await
            .map_err(|e| Error::StoreUnavailable(format!("GET /gists: {e}")))?;
        let json: Value = serde_json::from_str(&body).map_err(|e| {
            Error::StoreUnavailable(format!("GET /gists: unparseable response: {e}"))
        })?;

        let content = file_content(&json, name);
        let fingerprint = content.as_deref().map(content_fingerprint);

        tracing::debug!(file = name, present = content.is_some(), "fetched usage file");

        Ok(FetchedDoc {
            content,
            version: DocVersion { etag, fingerprint },
        })
    }

    async fn put(&self, name: &str, content: &str, expected: &DocVersion) -> Result<()> {
        let url = self.gist_url();
        let body = serde_json::json!({
            "files": { name: { "content": content } }
        });

        let mut etag = expected.etag.clone();

        // A 412 means the *document* moved, which happens whenever any file
        // in it is written. Only a change to the named file is a conflict
        // for the caller; anything else just needs a fresh etag.
        for _ in 0..=self.max_retries {
            let resp = self
                .execute_with_retry("PATCH /gists", || {
                    let rb = self.http.patch(&url).json(&body);
                    match &etag {
                        Some(tag) => rb.header(IF_MATCH, tag.as_str()),
                        None => rb,
                    }
                })
                .await?;

            if resp.status() == StatusCode::PRECONDITION_FAILED {
                let fresh = self.get(name).await?;
                if fresh.version.fingerprint != expected.fingerprint {
                    return Err(Error::VersionConflict {
                        file: name.to_owned(),
                    });
                }
                tracing::debug!(file = name, "document etag moved under another file, refreshing");
                etag = fresh.version.etag;
                continue;
            }

            return Ok(());
        }

        Err(Error::StoreUnavailable(format!(
            "PATCH /gists: etag revalidation attempts exhausted for {name}"
        )))
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Response helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Extract one named file's content from a gist API response body.
fn file_content(body: &Value, name: &str) -> Option<String> {
    body.get("files")?
        .get(name)?
        .get("content")?
        .as_str()
        .map(String::from)
}

/// Hex SHA-256 of a file's content, used as its version fingerprint.
fn content_fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gist_body() -> Value {
        serde_json::json!({
            "id": "abcdef1234",
            "files": {
                "usage-42.json": {
                    "filename": "usage-42.json",
                    "content": "{\"plan\":\"team\",\"2026-08\":3}"
                },
                "usage-7.json": {
                    "filename": "usage-7.json",
                    "content": "{\"plan\":\"free\"}"
                }
            }
        })
    }

    #[test]
    fn extracts_named_file_content() {
        let body = gist_body();
        assert_eq!(
            file_content(&body, "usage-42.json").as_deref(),
            Some("{\"plan\":\"team\",\"2026-08\":3}")
        );
    }

    #[test]
    fn missing_file_is_none() {
        let body = gist_body();
        assert_eq!(file_content(&body, "usage-99.json"), None);
    }

    #[test]
    fn response_without_files_is_none() {
        let body = serde_json::json!({"id": "abcdef1234"});
        assert_eq!(file_content(&body, "usage-42.json"), None);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let a = content_fingerprint("{\"plan\":\"free\"}");
        let b = content_fingerprint("{\"plan\":\"free\"}");
        let c = content_fingerprint("{\"plan\":\"team\"}");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
