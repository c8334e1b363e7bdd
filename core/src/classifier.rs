//! Pure DPD -> bucket classification and status derivation.
//!
//! RULE: Classification is referentially transparent. The same DPD
//! against the same table always yields the same bucket, and nothing
//! here mutates or observes engine state.

use crate::{
    rules::BucketTable,
    types::{BucketId, Dpd},
};
use serde::{Deserialize, Serialize};

/// Map a DPD value to its delinquency bucket.
///
/// First match wins, scanning in ascending severity. The table is a
/// validated total partition of [0, inf), so exactly one rule matches;
/// falling off the end means the table invariant was broken after
/// construction, which cannot happen on the immutable `BucketTable`.
pub fn classify(table: &BucketTable, dpd: Dpd) -> BucketId {
    table
        .rules()
        .iter()
        .find(|rule| rule.contains(dpd))
        .map(|rule| rule.id)
        .unwrap_or_else(|| unreachable!("bucket table no longer partitions the DPD space"))
}

/// Account standing derived from the current bucket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AccountStatus {
    Active,
    /// Reserved for payment-in-full lifecycle events; never derived.
    Cured,
    /// Reserved for charge-off lifecycle events; never derived.
    WrittenOff,
    Legal,
}

/// Derive standing from a bucket: legal at or above the default
/// trigger, active below it. Shared by ingestion and override so the
/// two paths can never disagree.
pub fn derive_status(table: &BucketTable, bucket: BucketId) -> AccountStatus {
    if bucket >= table.critical_id() {
        AccountStatus::Legal
    } else {
        AccountStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_days_land_in_the_right_bucket() {
        let table = BucketTable::standard();
        assert_eq!(classify(&table, 0), 1);
        assert_eq!(classify(&table, 29), 1);
        assert_eq!(classify(&table, 30), 2);
        assert_eq!(classify(&table, 89), 3);
        assert_eq!(classify(&table, 90), 4);
        assert_eq!(classify(&table, 179), 6);
        assert_eq!(classify(&table, 180), 7);
        assert_eq!(classify(&table, 100_000), 7);
    }

    #[test]
    fn status_flips_to_legal_at_the_trigger() {
        let table = BucketTable::standard();
        assert_eq!(derive_status(&table, 3), AccountStatus::Active);
        assert_eq!(derive_status(&table, 4), AccountStatus::Legal);
        assert_eq!(derive_status(&table, 7), AccountStatus::Legal);
    }
}
