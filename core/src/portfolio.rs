//! The account lifecycle manager.
//!
//! RULE: The Portfolio owns the canonical account collection. Callers
//! read through `get`/`list` and mutate only through `ingest` and
//! `override_bucket` — no other path touches an account, and a failed
//! operation leaves the store exactly as it was.

use crate::{
    audit::{AuditAction, AuditEntry},
    classifier::{classify, derive_status, AccountStatus},
    error::{EngineError, EngineResult},
    reporting::{self, PortfolioStats},
    rules::BucketTable,
    types::{AccountId, BucketId, Dpd, Money},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// A loan account in arrears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_name: String,
    pub loan_amount: Money,
    pub arrears_amount: Money,
    pub dpd: Dpd,
    pub bucket: BucketId,
    pub status: AccountStatus,
    pub risk_score: u8,
    pub last_contact_date: Option<DateTime<Utc>>,
    /// Promise to Pay — tracked, not enforced.
    pub ptp_date: Option<NaiveDate>,
}

/// The flat ingestion record handed in by any producer (generator,
/// import job, upstream system). Bucket and status are derived on
/// ingest, never supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAccount {
    pub id: AccountId,
    pub customer_name: String,
    pub loan_amount: Money,
    pub arrears_amount: Money,
    pub dpd: Dpd,
    pub risk_score: u8,
    #[serde(default)]
    pub last_contact_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ptp_date: Option<NaiveDate>,
}

/// One portfolio's accounts, rule table, and audit trail.
///
/// Explicitly owned and injectable — tests and multi-tenant callers
/// build as many isolated instances as they need.
pub struct Portfolio {
    table: BucketTable,
    accounts: Vec<Account>,
    index: HashMap<AccountId, usize>,
    audit: Vec<AuditEntry>,
}

impl Portfolio {
    pub fn new(table: BucketTable) -> Self {
        Self {
            table,
            accounts: Vec::new(),
            index: HashMap::new(),
            audit: Vec::new(),
        }
    }

    /// A portfolio on the standard seven-tier table.
    pub fn with_standard_rules() -> Self {
        Self::new(BucketTable::standard())
    }

    pub fn table(&self) -> &BucketTable {
        &self.table
    }

    // ── Ingestion ─────────────────────────────────────────────────

    /// Ingest a batch of raw records: classify each DPD, derive status,
    /// append in input order.
    ///
    /// The whole batch is validated before anything is committed, so an
    /// invalid record rejects the batch and leaves the store unchanged.
    /// Use `ingest_record` for reject-and-continue flows.
    pub fn ingest(&mut self, raws: Vec<RawAccount>) -> EngineResult<Vec<Account>> {
        {
            let mut batch_ids: HashSet<&str> = HashSet::new();
            for raw in &raws {
                self.validate_raw(raw)?;
                if !batch_ids.insert(raw.id.as_str()) {
                    return Err(EngineError::invalid(format!(
                        "duplicate account id '{}' within batch",
                        raw.id
                    )));
                }
            }
        }

        let accounts: Vec<Account> = raws.into_iter().map(|raw| self.commit(raw)).collect();
        log::info!("ingested {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Ingest a single raw record.
    pub fn ingest_record(&mut self, raw: RawAccount) -> EngineResult<Account> {
        self.validate_raw(&raw)?;
        Ok(self.commit(raw))
    }

    fn validate_raw(&self, raw: &RawAccount) -> EngineResult<()> {
        if raw.id.is_empty() {
            return Err(EngineError::invalid("account id is empty"));
        }
        if self.index.contains_key(&raw.id) {
            return Err(EngineError::invalid(format!(
                "account id '{}' already exists",
                raw.id
            )));
        }
        // NaN amounts must fail these checks, hence the negated forms.
        if !(raw.loan_amount > 0.0) {
            return Err(EngineError::invalid(format!(
                "account '{}': loan_amount must be positive, got {}",
                raw.id, raw.loan_amount
            )));
        }
        if !(raw.arrears_amount >= 0.0) {
            return Err(EngineError::invalid(format!(
                "account '{}': arrears_amount must be non-negative, got {}",
                raw.id, raw.arrears_amount
            )));
        }
        if raw.arrears_amount > raw.loan_amount {
            return Err(EngineError::invalid(format!(
                "account '{}': arrears {} exceeds loan amount {}",
                raw.id, raw.arrears_amount, raw.loan_amount
            )));
        }
        Ok(())
    }

    /// Precondition: `raw` passed `validate_raw`.
    fn commit(&mut self, raw: RawAccount) -> Account {
        let bucket = classify(&self.table, raw.dpd);
        let status = derive_status(&self.table, bucket);
        let account = Account {
            id: raw.id,
            customer_name: raw.customer_name,
            loan_amount: raw.loan_amount,
            arrears_amount: raw.arrears_amount,
            dpd: raw.dpd,
            bucket,
            status,
            risk_score: raw.risk_score,
            last_contact_date: raw.last_contact_date,
            ptp_date: raw.ptp_date,
        };

        self.audit.push(AuditEntry::new(
            account.id.clone(),
            AuditAction::Ingested,
            "system",
            format!("classified at {} DPD into bucket {bucket}", account.dpd),
            bucket >= self.table.critical_id(),
        ));
        self.index.insert(account.id.clone(), self.accounts.len());
        self.accounts.push(account.clone());
        account
    }

    // ── Override ──────────────────────────────────────────────────

    /// Supervisor re-classification: move an account to `new_bucket`.
    ///
    /// DPD is reset to the new bucket's lower range bound so the record
    /// stays internally consistent with the supervisor's call. The reset
    /// can understate true ageing — it is logged on every override and
    /// must stay visible in the audit trail.
    pub fn override_bucket(
        &mut self,
        account_id: &str,
        new_bucket: BucketId,
        performer: &str,
    ) -> EngineResult<Account> {
        let rule = self.table.rule(new_bucket).ok_or_else(|| {
            EngineError::invalid(format!("unknown bucket id {new_bucket}"))
        })?;
        let new_dpd: Dpd = rule.min_dpd;
        let status = derive_status(&self.table, new_bucket);
        let critical = new_bucket >= self.table.critical_id();

        let slot = *self
            .index
            .get(account_id)
            .ok_or_else(|| EngineError::NotFound {
                account_id: account_id.to_string(),
            })?;
        let account = &mut self.accounts[slot];

        let old_bucket = account.bucket;
        let old_dpd = account.dpd;
        account.bucket = new_bucket;
        account.dpd = new_dpd;
        account.status = status;

        if critical {
            log::warn!(
                "account={account_id} override {old_bucket} -> {new_bucket} by {performer}: now at or above default trigger, dpd reset {old_dpd} -> {new_dpd}"
            );
        } else {
            log::info!(
                "account={account_id} override {old_bucket} -> {new_bucket} by {performer}, dpd reset {old_dpd} -> {new_dpd}"
            );
        }

        let updated = account.clone();
        self.audit.push(AuditEntry::new(
            updated.id.clone(),
            AuditAction::BucketOverride,
            performer,
            format!("bucket {old_bucket} -> {new_bucket}, dpd reset {old_dpd} -> {new_dpd}"),
            critical,
        ));
        Ok(updated)
    }

    // ── Reads ─────────────────────────────────────────────────────

    pub fn get(&self, account_id: &str) -> EngineResult<&Account> {
        self.index
            .get(account_id)
            .map(|&slot| &self.accounts[slot])
            .ok_or_else(|| EngineError::NotFound {
                account_id: account_id.to_string(),
            })
    }

    /// All accounts in insertion order. Read-only — mutations go
    /// through `override_bucket`.
    pub fn list(&self) -> &[Account] {
        &self.accounts
    }

    pub fn audit_log(&self) -> &[AuditEntry] {
        &self.audit
    }

    /// Portfolio roll-up over the current collection.
    pub fn summarize(&self) -> PortfolioStats {
        reporting::summarize(&self.table, &self.accounts)
    }
}
