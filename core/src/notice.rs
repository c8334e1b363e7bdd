//! The notice-drafting boundary.
//!
//! RULE: The drafting service is an external collaborator. The engine
//! builds the structured payload it consumes and defines the failure
//! contract; a drafting failure degrades to a fixed fallback string and
//! never enters the engine's own error handling.

use crate::{
    error::{EngineError, EngineResult},
    portfolio::Account,
    rules::BucketTable,
    types::{Dpd, Money},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Register the draft should be written in, keyed off bucket severity.
/// A structured input to the service — the drafted text itself is the
/// service's problem.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeTone {
    Friendly,
    Firm,
    Legal,
}

/// Everything the drafting service is given about one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticePayload {
    pub customer_name: String,
    pub bucket_name: String,
    pub bucket_meaning: String,
    pub dpd: Dpd,
    pub arrears_amount: Money,
    /// The bucket's mandated actions, verbatim and in order.
    pub mandated_actions: Vec<String>,
    pub tone: NoticeTone,
}

impl NoticePayload {
    pub fn for_account(table: &BucketTable, account: &Account) -> EngineResult<Self> {
        let rule = table.rule(account.bucket).ok_or_else(|| {
            EngineError::invalid(format!(
                "account '{}' carries bucket {} which is not in the table",
                account.id, account.bucket
            ))
        })?;

        // Legal register from the default trigger up, firm one tier
        // below it, friendly in the early tiers.
        let tone = if rule.id >= table.critical_id() {
            NoticeTone::Legal
        } else if rule.id + 1 == table.critical_id() {
            NoticeTone::Firm
        } else {
            NoticeTone::Friendly
        };

        Ok(Self {
            customer_name: account.customer_name.clone(),
            bucket_name: rule.name.clone(),
            bucket_meaning: rule.meaning.clone(),
            dpd: account.dpd,
            arrears_amount: account.arrears_amount,
            mandated_actions: rule.actions.clone(),
            tone,
        })
    }
}

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("drafting service failed: {0}")]
    Service(String),

    #[error("drafting service timed out")]
    Timeout,
}

/// The seam the external drafting service plugs into. Strictly
/// read-only with respect to the engine: it only ever sees a payload.
pub trait NoticeDrafter {
    fn draft(&self, payload: &NoticePayload) -> Result<String, DraftError>;
}

/// Shown to agents when the drafting service is down.
pub const FALLBACK_NOTICE: &str = "Failed to generate AI draft. Please use manual templates.";

/// Draft a notice, substituting the fixed fallback on any failure.
pub fn draft_or_fallback(drafter: &dyn NoticeDrafter, payload: &NoticePayload) -> String {
    match drafter.draft(payload) {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "notice draft failed for customer '{}': {e}; using fallback template",
                payload.customer_name
            );
            FALLBACK_NOTICE.to_string()
        }
    }
}
