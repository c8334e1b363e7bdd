//! Deterministic mock portfolio generation.
//!
//! Accounts currently originate from a generator rather than a real
//! upstream feed. All generation is deterministic: same seed and
//! `as_of` instant = same raw records, so runs are reproducible.

use crate::{portfolio::RawAccount, rng::DeskRng, types::Dpd};
use chrono::{DateTime, Duration, Utc};

/// Curated customer names, cycled across the generated book.
const CUSTOMER_NAMES: &[&str] = &[
    "Alice Thompson", "Bob Richards", "Charlie Davis", "Diana Prince",
    "Edward Norton", "Fiona Apple", "George Miller", "Hannah Abbott",
    "Ian Wright", "Julia Roberts", "Kevin Hart", "Laura Palmer",
    "Michael Scott", "Nancy Drew", "Oscar Isaac", "Penny Lane",
];

const SECONDS_PER_WEEK: u64 = 7 * 24 * 60 * 60;

/// Generate `count` raw ingestion records.
///
/// Field ranges: DPD in [0, 200), loans in [5_000, 50_000), arrears at
/// 5-15% of the loan, risk scores in [0, 100), last contact within the
/// week before `as_of`.
pub fn generate_raw_accounts(seed: u64, count: usize, as_of: DateTime<Utc>) -> Vec<RawAccount> {
    let mut rng = DeskRng::new(seed);

    (0..count)
        .map(|i| {
            let dpd = rng.next_u64_below(200) as Dpd;
            let loan = rng.in_range(5_000.0, 50_000.0);
            let arrears = loan * rng.in_range(0.05, 0.15);
            let risk_score = rng.next_u64_below(100) as u8;
            let contact_age = Duration::seconds(rng.next_u64_below(SECONDS_PER_WEEK) as i64);

            RawAccount {
                id: format!("ACC-{}", 1000 + i),
                customer_name: CUSTOMER_NAMES[i % CUSTOMER_NAMES.len()].to_string(),
                loan_amount: loan,
                arrears_amount: arrears,
                dpd,
                risk_score,
                last_contact_date: Some(as_of - contact_age),
                ptp_date: None,
            }
        })
        .collect()
}
