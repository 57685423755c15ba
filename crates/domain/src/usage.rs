//! The persisted per-tenant usage record.
//!
//! Stored layout is a flat JSON object: the `plan` code plus one integer
//! entry per period key that was ever incremented, e.g.
//! `{"plan": "team", "2026-07": 812, "2026-08": 3}`. Absent period keys are
//! implicitly zero.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::plan::Plan;

/// Usage state for one tenant.
///
/// The plan is kept as the raw stored code (not a [`Plan`]) so that writing
/// the record back round-trips the field byte-for-byte, including codes
/// this build does not recognize. Tier resolution happens in
/// [`UsageRecord::plan_tier`] at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    #[serde(default = "d_plan")]
    pub plan: String,
    /// Period key → count. Only periods that were incremented appear.
    #[serde(flatten)]
    pub periods: BTreeMap<String, u64>,
}

impl Default for UsageRecord {
    fn default() -> Self {
        Self {
            plan: d_plan(),
            periods: BTreeMap::new(),
        }
    }
}

impl UsageRecord {
    /// The recorded count for a period; absent keys are zero.
    pub fn count_for(&self, period: &str) -> u64 {
        self.periods.get(period).copied().unwrap_or(0)
    }

    /// Add one to the period's count.
    pub fn increment(&mut self, period: &str) {
        *self.periods.entry(period.to_owned()).or_insert(0) += 1;
    }

    /// Resolve the stored plan code into a tier (unknown codes → free).
    pub fn plan_tier(&self) -> Plan {
        Plan::from_code(&self.plan)
    }
}

fn d_plan() -> String {
    "free".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_is_free_with_no_periods() {
        let record = UsageRecord::default();
        assert_eq!(record.plan, "free");
        assert!(record.periods.is_empty());
        assert_eq!(record.count_for("2026-08"), 0);
    }

    #[test]
    fn deserializes_stored_layout() {
        let record: UsageRecord =
            serde_json::from_str(r#"{"plan":"team","2026-07":812,"2026-08":3}"#).unwrap();
        assert_eq!(record.plan, "team");
        assert_eq!(record.count_for("2026-07"), 812);
        assert_eq!(record.count_for("2026-08"), 3);
        assert_eq!(record.count_for("2026-09"), 0);
    }

    #[test]
    fn absent_plan_defaults_to_free() {
        let record: UsageRecord = serde_json::from_str(r#"{"2026-08":7}"#).unwrap();
        assert_eq!(record.plan, "free");
        assert_eq!(record.plan_tier(), Plan::Free);
    }

    #[test]
    fn unknown_plan_code_is_preserved_but_resolves_to_free() {
        let record: UsageRecord = serde_json::from_str(r#"{"plan":"platinum"}"#).unwrap();
        assert_eq!(record.plan, "platinum");
        assert_eq!(record.plan_tier(), Plan::Free);

        // The raw code survives a write-back unchanged.
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"plan":"platinum"}"#);
    }

    #[test]
    fn serializes_flat_with_period_entries() {
        let mut record = UsageRecord::default();
        record.increment("2026-08");
        record.increment("2026-08");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"plan":"free","2026-08":2}"#);
    }

    #[test]
    fn non_object_content_fails_to_parse() {
        assert!(serde_json::from_str::<UsageRecord>("[1,2,3]").is_err());
        assert!(serde_json::from_str::<UsageRecord>(r#""free""#).is_err());
    }

    #[test]
    fn non_integer_period_value_fails_to_parse() {
        assert!(serde_json::from_str::<UsageRecord>(r#"{"plan":"free","2026-08":"three"}"#).is_err());
        assert!(serde_json::from_str::<UsageRecord>(r#"{"plan":"free","2026-08":-1}"#).is_err());
    }
}
