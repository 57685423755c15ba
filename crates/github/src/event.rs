//! Pull-request event payload parsing.
//!
//! CI runners deliver the webhook payload as a JSON file on disk. Only four
//! things matter here: which repository, which pull request, and which
//! account pays for it. The owning account's numeric id is the tenant key;
//! it is stable across renames and shared by every repository of the same
//! account.

use std::path::Path;

use serde_json::Value;

use prs_domain::error::{Error, Result};

/// The slice of a pull-request event this hook cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    /// Billing tenant: the repository-owning account id, stringified.
    pub tenant_id: String,
    /// Repository owner login, for API paths.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub number: u64,
}

impl PullRequestEvent {
    /// Read and parse an event payload file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let json: Value = serde_json::from_str(&raw)?;
        Self::from_json(&json)
    }

    /// Extract the event fields from a parsed payload.
    ///
    /// A payload without an owner id still parses; the tenant falls back
    /// to `"anon"` so a misconfigured delivery degrades to a shared bucket
    /// instead of failing the event.
    pub fn from_json(json: &Value) -> Result<Self> {
        let repository = json
            .get("repository")
            .ok_or_else(|| Error::Github("event payload has no repository".into()))?;

        let repo = repository
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Github("event payload has no repository.name".into()))?
            .to_owned();

        let owner = repository
            .get("owner")
            .and_then(|o| o.get("login"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Github("event payload has no repository.owner.login".into()))?
            .to_owned();

        let tenant_id = repository
            .get("owner")
            .and_then(|o| o.get("id"))
            .map(tenant_from_id)
            .unwrap_or_else(|| "anon".into());

        let number = json
            .get("pull_request")
            .and_then(|pr| pr.get("number"))
            .or_else(|| json.get("number"))
            .and_then(|v| v.as_u64())
            .ok_or_else(|| Error::Github("event payload has no pull request number".into()))?;

        Ok(Self {
            tenant_id,
            owner,
            repo,
            number,
        })
    }
}

/// Stringify an account id from the payload (numeric upstream, but string
/// ids pass through unchanged).
fn tenant_from_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> Value {
        serde_json::json!({
            "action": "opened",
            "number": 17,
            "pull_request": { "number": 17, "title": "Add feature" },
            "repository": {
                "name": "widgets",
                "owner": { "login": "acme", "id": 12345678 }
            }
        })
    }

    #[test]
    fn extracts_tenant_repo_and_number() {
        let event = PullRequestEvent::from_json(&payload()).unwrap();
        assert_eq!(
            event,
            PullRequestEvent {
                tenant_id: "12345678".into(),
                owner: "acme".into(),
                repo: "widgets".into(),
                number: 17,
            }
        );
    }

    #[test]
    fn missing_owner_id_falls_back_to_anon() {
        let mut json = payload();
        json["repository"]["owner"]
            .as_object_mut()
            .unwrap()
            .remove("id");
        let event = PullRequestEvent::from_json(&json).unwrap();
        assert_eq!(event.tenant_id, "anon");
    }

    #[test]
    fn top_level_number_is_a_fallback() {
        let mut json = payload();
        json.as_object_mut().unwrap().remove("pull_request");
        let event = PullRequestEvent::from_json(&json).unwrap();
        assert_eq!(event.number, 17);
    }

    #[test]
    fn missing_repository_is_an_error() {
        let json = serde_json::json!({"action": "opened"});
        assert!(matches!(
            PullRequestEvent::from_json(&json).unwrap_err(),
            Error::Github(_)
        ));
    }

    #[test]
    fn missing_number_is_an_error() {
        let mut json = payload();
        json.as_object_mut().unwrap().remove("pull_request");
        json.as_object_mut().unwrap().remove("number");
        assert!(PullRequestEvent::from_json(&json).is_err());
    }
}
