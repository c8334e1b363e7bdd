//! Aggregation: totals, histograms, critical exposure, alerts.

use arrears_core::portfolio::{Portfolio, RawAccount};
use arrears_core::reporting::summarize;
use arrears_core::rules::BucketTable;

fn raw(id: &str, dpd: u32, arrears: f64) -> RawAccount {
    RawAccount {
        id: id.into(),
        customer_name: "George Miller".into(),
        loan_amount: 40_000.0,
        arrears_amount: arrears,
        dpd,
        risk_score: 33,
        last_contact_date: None,
        ptp_date: None,
    }
}

/// Bucket counts partition the account set; total arrears is the plain
/// sum.
#[test]
fn histogram_partitions_the_book() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio
        .ingest(vec![
            raw("ACC-1", 5, 100.0),
            raw("ACC-2", 40, 250.0),
            raw("ACC-3", 40, 250.0),
            raw("ACC-4", 95, 300.0),
            raw("ACC-5", 400, 150.0),
        ])
        .unwrap();

    let stats = portfolio.summarize();
    let counted: usize = stats.buckets.iter().map(|b| b.count).sum();
    assert_eq!(counted, 5, "bucket counts must sum to the account count");
    assert_eq!(stats.account_count, 5);
    assert!((stats.total_arrears - 1_050.0).abs() < 1e-9);

    let slice_sum: f64 = stats.buckets.iter().map(|b| b.arrears).sum();
    assert!((slice_sum - stats.total_arrears).abs() < 1e-9);
}

/// Every bucket appears in the histogram, including empty ones, so
/// charts render empty bars rather than dropping categories.
#[test]
fn empty_buckets_still_get_bars() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio.ingest(vec![raw("ACC-1", 5, 100.0)]).unwrap();

    let stats = portfolio.summarize();
    assert_eq!(stats.buckets.len(), 7);
    assert_eq!(stats.buckets[0].count, 1);
    for slice in &stats.buckets[1..] {
        assert_eq!(slice.count, 0, "bucket {} should be empty", slice.bucket);
        assert_eq!(slice.arrears, 0.0);
    }
    assert!(stats.buckets[3].is_critical, "the B4 bar carries the critical flag");
}

/// An empty portfolio summarizes to zeros without raising.
#[test]
fn empty_portfolio_is_all_zeros() {
    let stats = summarize(&BucketTable::standard(), &[]);

    assert_eq!(stats.account_count, 0);
    assert_eq!(stats.total_arrears, 0.0);
    assert_eq!(stats.critical_arrears, 0.0);
    assert_eq!(stats.critical_fraction, 0.0, "no NaN from a zero division");
    assert_eq!(stats.average_dpd, 0);
    assert!(stats.regulatory_alerts.is_empty());
    assert_eq!(stats.buckets.len(), 7, "the histogram skeleton is always complete");
}

/// Scenario: arrears {100, 200, 300} with the 300 in B4 gives critical
/// arrears of 300 and a critical fraction of one half.
#[test]
fn critical_exposure_scenario() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio
        .ingest(vec![
            raw("ACC-1", 10, 100.0),
            raw("ACC-2", 40, 200.0),
            raw("ACC-3", 95, 300.0),
        ])
        .unwrap();

    let stats = portfolio.summarize();
    assert!((stats.critical_arrears - 300.0).abs() < 1e-9);
    assert!((stats.critical_fraction - 0.5).abs() < 1e-9);
}

/// Critical arrears counts every bucket at or above the trigger, but
/// regulatory alerts list only accounts sitting exactly on it.
#[test]
fn alerts_are_trigger_exact() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio
        .ingest(vec![
            raw("ACC-1", 95, 300.0),  // B4 — alert
            raw("ACC-2", 130, 400.0), // B5 — critical arrears, no alert
            raw("ACC-3", 100, 250.0), // B4 — alert
            raw("ACC-4", 10, 50.0),   // B1
        ])
        .unwrap();

    let stats = portfolio.summarize();
    assert!((stats.critical_arrears - 950.0).abs() < 1e-9);

    let alert_ids: Vec<_> = stats.regulatory_alerts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(alert_ids, ["ACC-1", "ACC-3"], "alerts are B4-exact, in list order");
}

/// Average DPD floors the mean.
#[test]
fn average_dpd_is_floored() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio
        .ingest(vec![
            raw("ACC-1", 10, 100.0),
            raw("ACC-2", 11, 100.0),
            raw("ACC-3", 12, 100.0),
            raw("ACC-4", 14, 100.0),
        ])
        .unwrap();

    // mean 11.75 floors to 11
    assert_eq!(portfolio.summarize().average_dpd, 11);
}

/// summarize never mutates its input.
#[test]
fn summarize_is_read_only() {
    let mut portfolio = Portfolio::with_standard_rules();
    portfolio.ingest(vec![raw("ACC-1", 95, 300.0)]).unwrap();

    let before = serde_json::to_string(portfolio.list()).unwrap();
    let _ = portfolio.summarize();
    let _ = portfolio.summarize();
    let after = serde_json::to_string(portfolio.list()).unwrap();
    assert_eq!(before, after);
}
