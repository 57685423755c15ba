//! Plan tiers and their per-period request limits.
//!
//! The table is static and process-wide: a tier maps to the number of
//! summarized pull requests allowed per billing period.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A billing plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Free,
    Team,
    Pro,
    Enterprise,
}

impl Plan {
    /// Resolve a stored plan code into a tier.
    ///
    /// The stored `plan` field is only ever written by configuration, so an
    /// unrecognized code should not happen, but when it does it resolves
    /// to `Free` rather than failing or granting unbounded quota.
    pub fn from_code(code: &str) -> Self {
        match code {
            "team" => Plan::Team,
            "pro" => Plan::Pro,
            "enterprise" => Plan::Enterprise,
            _ => Plan::Free,
        }
    }

    /// Maximum quota-consuming requests per billing period for this tier.
    pub fn limit(self) -> u64 {
        match self {
            Plan::Free => 100,
            Plan::Team => 1_000,
            Plan::Pro => 10_000,
            Plan::Enterprise => 100_000,
        }
    }

    /// The lowercase wire/storage code for this tier.
    pub fn code(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Team => "team",
            Plan::Pro => "pro",
            Plan::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_per_tier() {
        assert_eq!(Plan::Free.limit(), 100);
        assert_eq!(Plan::Team.limit(), 1_000);
        assert_eq!(Plan::Pro.limit(), 10_000);
        assert_eq!(Plan::Enterprise.limit(), 100_000);
    }

    #[test]
    fn known_codes_resolve() {
        assert_eq!(Plan::from_code("free"), Plan::Free);
        assert_eq!(Plan::from_code("team"), Plan::Team);
        assert_eq!(Plan::from_code("pro"), Plan::Pro);
        assert_eq!(Plan::from_code("enterprise"), Plan::Enterprise);
    }

    #[test]
    fn unknown_code_resolves_to_free() {
        assert_eq!(Plan::from_code("platinum"), Plan::Free);
        assert_eq!(Plan::from_code(""), Plan::Free);
    }

    #[test]
    fn code_round_trips() {
        for plan in [Plan::Free, Plan::Team, Plan::Pro, Plan::Enterprise] {
            assert_eq!(Plan::from_code(plan.code()), plan);
        }
    }

    #[test]
    fn serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Plan::Team).unwrap(), r#""team""#);
        let plan: Plan = serde_json::from_str(r#""enterprise""#).unwrap();
        assert_eq!(plan, Plan::Enterprise);
    }
}
