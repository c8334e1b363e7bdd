//! Compliance audit trail.
//!
//! Every mutation of the account collection leaves an entry here.
//! The trail is append-only and in-memory; downstream reporting reads
//! it, nothing rewrites it.

use crate::types::AccountId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Ingested,
    BucketOverride,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: String,
    pub account_id: AccountId,
    pub timestamp: DateTime<Utc>,
    pub action: AuditAction,
    pub performer: String,
    pub notes: String,
    /// True when the action leaves the account at or above the
    /// critical bucket — these entries back mandatory notice reporting.
    pub compliance_flag: bool,
}

impl AuditEntry {
    pub fn new(
        account_id: AccountId,
        action: AuditAction,
        performer: &str,
        notes: String,
        compliance_flag: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            account_id,
            timestamp: Utc::now(),
            action,
            performer: performer.to_string(),
            notes,
            compliance_flag,
        }
    }
}
