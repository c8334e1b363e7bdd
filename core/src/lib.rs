//! ArrearsFlow engine — delinquency bucket classification and
//! portfolio aggregation for loan accounts in arrears.
//!
//! ARCHITECTURE:
//!   - `rules`      the validated seven-tier bucket table
//!   - `classifier` pure DPD -> bucket mapping and status derivation
//!   - `portfolio`  the account lifecycle manager (the only writer)
//!   - `reporting`  pure roll-up statistics for dashboards
//!   - `audit`      append-only compliance trail
//!   - `notice`     structured payloads for the external drafting service
//!   - `generator`  deterministic mock account source
//!
//! Presentation layers and the drafting service live outside this crate
//! and consume plain data through `portfolio` and `reporting`.

pub mod audit;
pub mod classifier;
pub mod error;
pub mod generator;
pub mod notice;
pub mod portfolio;
pub mod reporting;
pub mod rng;
pub mod rules;
pub mod types;
