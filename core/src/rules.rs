//! The delinquency bucket rule table.
//!
//! RULE: A table is immutable once constructed, and construction
//! validates the partition invariant. A table that does not cover
//! every non-negative DPD exactly once never serves classifications —
//! violations fail at startup, not at first lookup.

use crate::{
    error::{EngineError, EngineResult},
    types::{BucketId, Dpd},
};
use serde::{Deserialize, Serialize};

/// One delinquency tier: a DPD range and the mandated actions for it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketRule {
    pub id: BucketId,
    pub name: String,
    pub meaning: String,
    pub min_dpd: Dpd,
    /// Inclusive upper bound. None = unbounded (the final tier).
    pub max_dpd: Option<Dpd>,
    /// Mandated collection/compliance actions, in escalation order.
    /// Surfaced verbatim to the notice-drafting boundary.
    pub actions: Vec<String>,
    #[serde(default)]
    pub is_critical: bool,
}

impl BucketRule {
    pub fn contains(&self, dpd: Dpd) -> bool {
        dpd >= self.min_dpd && self.max_dpd.is_none_or(|max| dpd <= max)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct BucketTableFile {
    buckets: Vec<BucketRule>,
}

/// The ordered, validated set of bucket rules for one portfolio.
#[derive(Debug, Clone)]
pub struct BucketTable {
    rules: Vec<BucketRule>,
    critical_id: BucketId,
}

impl BucketTable {
    /// The standard seven-tier table (30-day strata, B4 = default trigger).
    pub fn standard() -> Self {
        let rules = vec![
            BucketRule {
                id: 1,
                name: "Bucket 1".into(),
                meaning: "Early arrears".into(),
                min_dpd: 0,
                max_dpd: Some(29),
                actions: vec![
                    "Friendly SMS".into(),
                    "Payment link".into(),
                    "Low-priority agent task".into(),
                ],
                is_critical: false,
            },
            BucketRule {
                id: 2,
                name: "Bucket 2".into(),
                meaning: "Escalating arrears".into(),
                min_dpd: 30,
                max_dpd: Some(59),
                actions: vec![
                    "SMS + Email".into(),
                    "Outbound call".into(),
                    "Capture reason & PTP".into(),
                ],
                is_critical: false,
            },
            BucketRule {
                id: 3,
                name: "Bucket 3".into(),
                meaning: "Pre-default".into(),
                min_dpd: 60,
                max_dpd: Some(89),
                actions: vec![
                    "Formal warning".into(),
                    "Supervisor call".into(),
                    "Hardship assessment".into(),
                ],
                is_critical: false,
            },
            BucketRule {
                id: 4,
                name: "Bucket 4".into(),
                meaning: "APRA default trigger".into(),
                min_dpd: 90,
                max_dpd: Some(119),
                actions: vec![
                    "Section 88(6) notice".into(),
                    "Final demand".into(),
                    "CRB staging".into(),
                ],
                is_critical: true,
            },
            BucketRule {
                id: 5,
                name: "Bucket 5".into(),
                meaning: "Severe delinquency".into(),
                min_dpd: 120,
                max_dpd: Some(149),
                actions: vec![
                    "Section 11D notice".into(),
                    "Assign DRA / Legal".into(),
                ],
                is_critical: false,
            },
            BucketRule {
                id: 6,
                name: "Bucket 6".into(),
                meaning: "Critical recovery".into(),
                min_dpd: 150,
                max_dpd: Some(179),
                actions: vec![
                    "Legal action".into(),
                    "Settlement / write-off review".into(),
                ],
                is_critical: false,
            },
            BucketRule {
                id: 7,
                name: "Bucket 7".into(),
                meaning: "Long-term default".into(),
                min_dpd: 180,
                max_dpd: None,
                actions: vec![
                    "Charge-off / debt sale".into(),
                    "Final CRB reporting".into(),
                ],
                is_critical: false,
            },
        ];
        Self::from_rules(rules).expect("standard bucket table must satisfy the partition invariant")
    }

    /// Validating constructor. Checks, in order: non-empty table,
    /// contiguous IDs from 1, ranges partition [0, inf) with no gaps or
    /// overlaps, unbounded final tier, exactly one critical rule.
    pub fn from_rules(rules: Vec<BucketRule>) -> EngineResult<Self> {
        if rules.is_empty() {
            return Err(EngineError::Configuration("bucket table is empty".into()));
        }

        for (i, rule) in rules.iter().enumerate() {
            let expected = (i + 1) as BucketId;
            if rule.id != expected {
                return Err(EngineError::Configuration(format!(
                    "bucket ids must be contiguous from 1: position {i} has id {}",
                    rule.id
                )));
            }
            if let Some(max) = rule.max_dpd {
                if max < rule.min_dpd {
                    return Err(EngineError::Configuration(format!(
                        "bucket {} has inverted range [{}, {max}]",
                        rule.id, rule.min_dpd
                    )));
                }
            }
        }

        if rules[0].min_dpd != 0 {
            return Err(EngineError::Configuration(format!(
                "first bucket must start at 0 DPD, starts at {}",
                rules[0].min_dpd
            )));
        }
        for pair in rules.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let Some(prev_max) = prev.max_dpd else {
                return Err(EngineError::Configuration(format!(
                    "bucket {} is unbounded but is not the final bucket",
                    prev.id
                )));
            };
            if next.min_dpd != prev_max + 1 {
                return Err(EngineError::Configuration(format!(
                    "gap or overlap between bucket {} (ends {prev_max}) and bucket {} (starts {})",
                    prev.id, next.id, next.min_dpd
                )));
            }
        }
        let last = rules.last().expect("table checked non-empty");
        if last.max_dpd.is_some() {
            return Err(EngineError::Configuration(format!(
                "final bucket {} must be unbounded to cover all DPD values",
                last.id
            )));
        }

        let critical: Vec<BucketId> = rules
            .iter()
            .filter(|r| r.is_critical)
            .map(|r| r.id)
            .collect();
        let critical_id = match critical.as_slice() {
            [one] => *one,
            [] => {
                return Err(EngineError::Configuration(
                    "no bucket is marked critical".into(),
                ))
            }
            many => {
                return Err(EngineError::Configuration(format!(
                    "exactly one bucket may be critical, found {}: {many:?}",
                    many.len()
                )))
            }
        };

        Ok(Self { rules, critical_id })
    }

    /// Load a table from a JSON file: `{"buckets": [...]}`.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let file: BucketTableFile = serde_json::from_str(&raw)?;
        Ok(Self::from_rules(file.buckets)?)
    }

    pub fn rule(&self, id: BucketId) -> Option<&BucketRule> {
        // ids are contiguous from 1, so index arithmetic would do,
        // but the scan keeps validity checking in one obvious place.
        self.rules.iter().find(|r| r.id == id)
    }

    /// All rules, ascending severity.
    pub fn rules(&self) -> &[BucketRule] {
        &self.rules
    }

    /// The regulatory default trigger rule.
    pub fn critical(&self) -> &BucketRule {
        self.rule(self.critical_id)
            .expect("critical id validated at construction")
    }

    pub fn critical_id(&self) -> BucketId {
        self.critical_id
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded(id: BucketId, min: Dpd, max: Dpd, critical: bool) -> BucketRule {
        BucketRule {
            id,
            name: format!("Bucket {id}"),
            meaning: String::new(),
            min_dpd: min,
            max_dpd: Some(max),
            actions: vec![],
            is_critical: critical,
        }
    }

    fn unbounded(id: BucketId, min: Dpd) -> BucketRule {
        BucketRule {
            max_dpd: None,
            ..bounded(id, min, min, false)
        }
    }

    #[test]
    fn standard_table_is_valid() {
        let table = BucketTable::standard();
        assert_eq!(table.len(), 7);
        assert_eq!(table.critical_id(), 4);
        assert_eq!(table.critical().meaning, "APRA default trigger");
    }

    #[test]
    fn rejects_gap_between_buckets() {
        let err = BucketTable::from_rules(vec![
            bounded(1, 0, 29, true),
            bounded(2, 31, 59, false), // 30 uncovered
            unbounded(3, 60),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("gap or overlap"), "{err}");
    }

    #[test]
    fn rejects_overlapping_buckets() {
        let err = BucketTable::from_rules(vec![
            bounded(1, 0, 30, true),
            bounded(2, 30, 59, false), // 30 covered twice
            unbounded(3, 60),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("gap or overlap"), "{err}");
    }

    #[test]
    fn rejects_non_contiguous_ids() {
        let err = BucketTable::from_rules(vec![
            bounded(1, 0, 29, true),
            unbounded(3, 30),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("contiguous"), "{err}");
    }

    #[test]
    fn rejects_bounded_final_bucket() {
        let err = BucketTable::from_rules(vec![
            bounded(1, 0, 29, true),
            bounded(2, 30, 9999, false),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("unbounded"), "{err}");
    }

    #[test]
    fn rejects_zero_or_two_critical_rules() {
        let none = BucketTable::from_rules(vec![
            bounded(1, 0, 29, false),
            unbounded(2, 30),
        ])
        .unwrap_err();
        assert!(none.to_string().contains("no bucket"), "{none}");

        let two = BucketTable::from_rules(vec![
            bounded(1, 0, 29, true),
            BucketRule {
                is_critical: true,
                ..unbounded(2, 30)
            },
        ])
        .unwrap_err();
        assert!(two.to_string().contains("exactly one"), "{two}");
    }

    #[test]
    fn rejects_empty_table() {
        assert!(BucketTable::from_rules(vec![]).is_err());
    }
}
