//! Financial account type
//!
//! One account per `(userId, countryCode)`. The document id is derived from
//! that pair, so storage-level identity enforces the uniqueness invariant
//! even when provisioning races with itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::generator::GeneratedAccount;

/// Deterministic document id for a user's account in a country.
pub fn account_doc_id(user_id: &str, country_code: &str) -> String {
    format!("{user_id}_{country_code}")
}

/// A user's fiat account in one country.
///
/// Fields other than timestamps are immutable after creation. Deletion is
/// not this layer's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAccount {
    pub id: String,
    pub user_id: String,
    pub country_code: String,
    pub country_name: String,
    pub flag_code: String,
    pub currency_code: String,
    pub account_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub swift: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_code: Option<String>,
    pub bank_name: String,
    pub account_type: String,
    #[serde(default)]
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
}

impl FinancialAccount {
    /// Assemble a persistable account from freshly generated bank data.
    pub fn from_generated(
        user_id: &str,
        generated: GeneratedAccount,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: account_doc_id(user_id, &generated.country_code),
            user_id: user_id.to_string(),
            country_code: generated.country_code,
            country_name: generated.country_name,
            flag_code: generated.flag_code,
            currency_code: generated.currency_code,
            account_number: generated.account_number,
            routing_number: generated.routing_number,
            iban: generated.iban,
            swift: generated.swift,
            bank_code: generated.bank_code,
            branch_code: generated.branch_code,
            sort_code: generated.sort_code,
            bank_name: generated.bank_name,
            account_type: generated.account_type,
            is_primary: true,
            created_at,
        }
    }
}
