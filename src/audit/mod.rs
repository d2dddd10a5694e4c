//! Conversion audit trail
//!
//! Append-only log of conversion attempts and outcomes, with before/after
//! balance snapshots. Writes are fire-and-forget: a failed audit write must
//! never break the conversion that produced it. Permission failures switch
//! the trail off for the rest of the session so a systemically denied
//! operation does not spam the logs.
//!
//! Entries are write-once, read-many. No update or delete surface exists.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::store::{DocumentStore, StoreError};

/// Decimal places kept in stored balance snapshots.
const SNAPSHOT_SCALE: u32 = 8;

/// Length of the random suffix in audit document keys.
const KEY_SUFFIX_LEN: usize = 9;

/// Lifecycle stage an audit entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditOperation {
    #[serde(rename = "conversion_start")]
    Start,
    #[serde(rename = "conversion_success")]
    Success,
    #[serde(rename = "conversion_failed")]
    Failed,
    #[serde(rename = "conversion_rollback")]
    Rollback,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::Start => "conversion_start",
            AuditOperation::Success => "conversion_success",
            AuditOperation::Failed => "conversion_failed",
            AuditOperation::Rollback => "conversion_rollback",
        }
    }
}

impl std::fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which asset classes a conversion moved between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConversionMode {
    #[serde(rename = "crypto-crypto")]
    CryptoCrypto,
    #[serde(rename = "crypto-fiat")]
    CryptoFiat,
    #[serde(rename = "fiat-fiat")]
    FiatFiat,
}

/// Balances on both legs of a conversion, rounded to bound precision drift
/// in the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSnapshot {
    pub from: Decimal,
    pub to: Decimal,
}

impl BalanceSnapshot {
    pub fn new(from: Decimal, to: Decimal) -> Self {
        Self {
            from: from.round_dp(SNAPSHOT_SCALE),
            to: to.round_dp(SNAPSHOT_SCALE),
        }
    }
}

/// Builder for the caller-supplied part of an audit entry.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    operation: AuditOperation,
    from_currency: String,
    to_currency: String,
    from_amount: Decimal,
    to_amount: Decimal,
    mode: Option<ConversionMode>,
    balances_before: Option<BalanceSnapshot>,
    balances_after: Option<BalanceSnapshot>,
    conversion_id: Option<String>,
    error_message: Option<String>,
    metadata: Option<Value>,
}

impl AuditRecord {
    pub fn new(
        operation: AuditOperation,
        from_currency: &str,
        to_currency: &str,
        from_amount: Decimal,
        to_amount: Decimal,
    ) -> Self {
        Self {
            operation,
            from_currency: from_currency.to_string(),
            to_currency: to_currency.to_string(),
            from_amount,
            to_amount,
            mode: None,
            balances_before: None,
            balances_after: None,
            conversion_id: None,
            error_message: None,
            metadata: None,
        }
    }

    pub fn mode(mut self, mode: ConversionMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn balances_before(mut self, snapshot: BalanceSnapshot) -> Self {
        self.balances_before = Some(snapshot);
        self
    }

    pub fn balances_after(mut self, snapshot: BalanceSnapshot) -> Self {
        self.balances_after = Some(snapshot);
        self
    }

    pub fn conversion_id(mut self, conversion_id: &str) -> Self {
        self.conversion_id = Some(conversion_id.to_string());
        self
    }

    pub fn error_message(mut self, message: &str) -> Self {
        self.error_message = Some(message.to_string());
        self
    }

    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Audit entry as persisted under the user's namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    pub id: String,
    pub user_id: String,
    pub operation: AuditOperation,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: Decimal,
    pub to_amount: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ConversionMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances_before: Option<BalanceSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balances_after: Option<BalanceSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversion_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

/// Append-only audit trail over the document store.
#[derive(Debug)]
pub struct AuditTrail<S> {
    store: Arc<S>,
    disabled: AtomicBool,
}

impl<S> Clone for AuditTrail<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            disabled: AtomicBool::new(self.disabled.load(Ordering::Relaxed)),
        }
    }
}

fn audit_collection(user_id: &str) -> String {
    format!("users/{user_id}/auditLogs")
}

fn random_suffix(len: usize) -> String {
    const CHARSET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

impl<S: DocumentStore> AuditTrail<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_enabled(store, true)
    }

    /// Construct with an explicit starting state, e.g. from
    /// `Config::audit_enabled`.
    pub fn with_enabled(store: Arc<S>, enabled: bool) -> Self {
        Self {
            store,
            disabled: AtomicBool::new(!enabled),
        }
    }

    /// Whether the session latch has switched audit writes off.
    pub fn is_disabled(&self) -> bool {
        self.disabled.load(Ordering::Relaxed)
    }

    /// Record an operation attempt or outcome. Fire-and-forget: this never
    /// returns an error and never panics; failures are logged, and a
    /// permission failure disables the trail for the rest of the session.
    pub async fn record(&self, user_id: &str, record: AuditRecord) {
        if user_id.trim().is_empty() {
            tracing::warn!("audit entry skipped: empty user id");
            return;
        }

        if self.is_disabled() {
            tracing::debug!(user_id, operation = %record.operation, "audit trail disabled, skipping entry");
            return;
        }

        let timestamp = Utc::now();
        let key = format!(
            "{}_{}",
            timestamp.timestamp_millis(),
            random_suffix(KEY_SUFFIX_LEN)
        );

        let entry = AuditLogEntry {
            id: key.clone(),
            user_id: user_id.to_string(),
            operation: record.operation,
            from_currency: record.from_currency,
            to_currency: record.to_currency,
            from_amount: record.from_amount,
            to_amount: record.to_amount,
            mode: record.mode,
            balances_before: record.balances_before,
            balances_after: record.balances_after,
            conversion_id: record.conversion_id,
            error_message: record.error_message,
            metadata: record.metadata,
            timestamp,
        };

        let document = match serde_json::to_value(&entry) {
            Ok(document) => document,
            Err(err) => {
                tracing::error!(user_id, error = %err, "failed to serialize audit entry");
                return;
            }
        };

        match self
            .store
            .set(&audit_collection(user_id), &key, document)
            .await
        {
            Ok(()) => {
                tracing::debug!(user_id, operation = %entry.operation, audit_key = %key, "audit entry recorded");
            }
            Err(StoreError::PermissionDenied) => {
                tracing::warn!(
                    user_id,
                    "audit writes denied by the store, disabling trail for this session"
                );
                self.disabled.store(true, Ordering::Relaxed);
            }
            Err(err) => {
                tracing::error!(user_id, error = %err, "failed to record audit entry");
            }
        }
    }
}
