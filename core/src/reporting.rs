//! Portfolio roll-up statistics.
//!
//! Pure functions over the account collection — recomputed on demand,
//! never stored, never mutating their input.

use crate::{
    portfolio::Account,
    rules::BucketTable,
    types::{BucketId, Dpd, Money},
};
use serde::Serialize;

/// One bar of the ageing histogram. Zero-count buckets are included so
/// charts render empty bars instead of dropping categories.
#[derive(Debug, Clone, Serialize)]
pub struct BucketSlice {
    pub bucket: BucketId,
    pub name: String,
    pub count: usize,
    pub arrears: Money,
    pub is_critical: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioStats {
    pub account_count: usize,
    pub total_arrears: Money,
    pub buckets: Vec<BucketSlice>,
    /// Arrears in the critical bucket and every bucket above it.
    pub critical_arrears: Money,
    /// Share of total arrears that is critical; 0.0 on an empty book.
    pub critical_fraction: f64,
    /// Floor of the mean DPD; 0 on an empty book.
    pub average_dpd: Dpd,
    /// Accounts sitting exactly in the critical bucket, in list order.
    /// Downstream reporting drives mandatory notice issuance off these.
    pub regulatory_alerts: Vec<Account>,
}

pub fn summarize(table: &BucketTable, accounts: &[Account]) -> PortfolioStats {
    let critical_id = table.critical_id();

    let total_arrears: Money = accounts.iter().map(|a| a.arrears_amount).sum();
    let critical_arrears: Money = accounts
        .iter()
        .filter(|a| a.bucket >= critical_id)
        .map(|a| a.arrears_amount)
        .sum();

    let buckets = table
        .rules()
        .iter()
        .map(|rule| {
            let mut count = 0usize;
            let mut arrears: Money = 0.0;
            for account in accounts.iter().filter(|a| a.bucket == rule.id) {
                count += 1;
                arrears += account.arrears_amount;
            }
            BucketSlice {
                bucket: rule.id,
                name: rule.name.clone(),
                count,
                arrears,
                is_critical: rule.is_critical,
            }
        })
        .collect();

    let average_dpd = if accounts.is_empty() {
        0
    } else {
        let dpd_sum: u64 = accounts.iter().map(|a| u64::from(a.dpd)).sum();
        (dpd_sum / accounts.len() as u64) as Dpd
    };
    let critical_fraction = if total_arrears > 0.0 {
        critical_arrears / total_arrears
    } else {
        0.0
    };

    let regulatory_alerts = accounts
        .iter()
        .filter(|a| a.bucket == critical_id)
        .cloned()
        .collect();

    PortfolioStats {
        account_count: accounts.len(),
        total_arrears,
        buckets,
        critical_arrears,
        critical_fraction,
        average_dpd,
        regulatory_alerts,
    }
}
