//! Shared primitive types used across the entire engine.

/// A stable, unique identifier for a loan account.
pub type AccountId = String;

/// A delinquency bucket ordinal, 1..=7 in the standard table.
/// Validity is enforced by the bucket table, not the type.
pub type BucketId = u8;

/// Days past due. Unsigned — a negative DPD is meaningless.
pub type Dpd = u32;

/// A currency amount in the portfolio's reporting currency.
pub type Money = f64;
