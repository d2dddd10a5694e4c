//! PIX key type
//!
//! A PIX key is an alias (email, phone, tax id or random token) that routes
//! payments to a bank account. Email and phone keys are auto-managed: they
//! live at a deterministic document id per `(userId, keyType)` and follow
//! profile changes. User-initiated keys get random ids and are immutable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// PIX key kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixKeyType {
    Cpf,
    Cnpj,
    Email,
    Phone,
    Random,
}

impl PixKeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PixKeyType::Cpf => "cpf",
            PixKeyType::Cnpj => "cnpj",
            PixKeyType::Email => "email",
            PixKeyType::Phone => "phone",
            PixKeyType::Random => "random",
        }
    }

    /// Email and phone keys are provisioned and kept in sync by this layer.
    pub fn is_auto_managed(&self) -> bool {
        matches!(self, PixKeyType::Email | PixKeyType::Phone)
    }
}

impl std::fmt::Display for PixKeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Deterministic document id for an auto-managed key.
pub fn auto_key_doc_id(user_id: &str, key_type: PixKeyType) -> String {
    format!("{user_id}_pix_{key_type}")
}

/// A PIX payment alias attached to one of the user's accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixKey {
    pub id: String,
    pub user_id: String,
    pub account_id: String,
    pub key_type: PixKeyType,
    pub key_value: String,
    pub created_at: DateTime<Utc>,
}
