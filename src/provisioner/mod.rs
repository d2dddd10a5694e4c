//! Resource provisioner
//!
//! Guarantees exactly-once logical creation of per-user financial resources
//! no matter how many times provisioning runs: retries, concurrent signup
//! paths, profile edits. The mechanism is identity, not locking — accounts
//! and auto-managed PIX keys live at deterministic document ids, so racing
//! creators all converge on the same document.
//!
//! Every public operation is best-effort. Store failures are logged and
//! swallowed; provisioning must never abort the caller's primary flow. A
//! caller needing a stronger guarantee re-invokes later.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{account_doc_id, auto_key_doc_id, phone, FinancialAccount, PixKey, PixKeyType};
use crate::generator;
use crate::store::{DocumentStore, StoreError};

const ACCOUNTS_COLLECTION: &str = "bankAccounts";
const PIX_KEYS_COLLECTION: &str = "pixKeys";

/// Internal provisioning failures. These never cross the public API; they
/// are logged and absorbed.
#[derive(Debug, thiserror::Error)]
enum ProvisionError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Idempotent provisioner for financial accounts and PIX keys.
#[derive(Debug)]
pub struct ResourceProvisioner<S> {
    store: Arc<S>,
}

impl<S> Clone for ResourceProvisioner<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: DocumentStore> ResourceProvisioner<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Ensure the user has an account for the given country, creating one on
    /// first call and returning the existing record unchanged afterwards.
    ///
    /// Returns `None` only on a store failure, which is logged and absorbed.
    pub async fn ensure_account(
        &self,
        user_id: &str,
        country_code: &str,
    ) -> Option<FinancialAccount> {
        match self.try_ensure_account(user_id, country_code).await {
            Ok(account) => Some(account),
            Err(err) => {
                tracing::warn!(user_id, country_code, error = %err, "account provisioning failed");
                None
            }
        }
    }

    async fn try_ensure_account(
        &self,
        user_id: &str,
        country_code: &str,
    ) -> Result<FinancialAccount, ProvisionError> {
        let id = account_doc_id(user_id, country_code);

        if let Some(document) = self.store.get(ACCOUNTS_COLLECTION, &id).await? {
            tracing::debug!(user_id, country_code, account_id = %id, "account already provisioned");
            return Ok(serde_json::from_value(document)?);
        }

        // Read-then-write race window: concurrent creators may both reach
        // this point, but every writer targets the same deterministic id,
        // so the store ends up with exactly one document either way.
        let account =
            FinancialAccount::from_generated(user_id, generator::generate(country_code), Utc::now());

        self.store
            .set(ACCOUNTS_COLLECTION, &id, serde_json::to_value(&account)?)
            .await?;

        tracing::info!(user_id, country_code, account_id = %id, "account provisioned");
        Ok(account)
    }

    /// Ensure the user's auto-managed email and phone PIX keys exist and
    /// carry the current profile values. Idempotent and self-healing:
    /// re-invoking after a profile change updates the key values in place
    /// without creating duplicates.
    pub async fn ensure_pix_keys(&self, user_id: &str, account_id: &str, email: &str, phone: &str) {
        if let Err(err) = self
            .try_ensure_pix_keys(user_id, account_id, email, phone)
            .await
        {
            tracing::warn!(user_id, account_id, error = %err, "PIX key provisioning failed");
        }
    }

    async fn try_ensure_pix_keys(
        &self,
        user_id: &str,
        account_id: &str,
        email: &str,
        phone: &str,
    ) -> Result<(), ProvisionError> {
        self.ensure_auto_key(user_id, account_id, PixKeyType::Email, email)
            .await?;

        let pix_phone = phone::normalize_for_pix(phone);
        self.ensure_auto_key(user_id, account_id, PixKeyType::Phone, &pix_phone)
            .await?;

        Ok(())
    }

    async fn ensure_auto_key(
        &self,
        user_id: &str,
        account_id: &str,
        key_type: PixKeyType,
        key_value: &str,
    ) -> Result<(), ProvisionError> {
        let id = auto_key_doc_id(user_id, key_type);

        if self.store.get(PIX_KEYS_COLLECTION, &id).await?.is_none() {
            let key = PixKey {
                id: id.clone(),
                user_id: user_id.to_string(),
                account_id: account_id.to_string(),
                key_type,
                key_value: key_value.to_string(),
                created_at: Utc::now(),
            };
            self.store
                .set(PIX_KEYS_COLLECTION, &id, serde_json::to_value(&key)?)
                .await?;
            tracing::info!(user_id, %key_type, "auto PIX key created");
        } else {
            self.store
                .merge(PIX_KEYS_COLLECTION, &id, json!({ "keyValue": key_value }))
                .await?;
            tracing::debug!(user_id, %key_type, "auto PIX key value refreshed");
        }

        Ok(())
    }

    /// Propagate a profile email/phone change to the user's PIX keys.
    /// Updates `keyValue` in place on every email key (when a new email is
    /// given) and every phone key (when a new phone is given); cpf, cnpj and
    /// random keys are never touched.
    pub async fn sync_pix_keys(
        &self,
        user_id: &str,
        new_email: Option<&str>,
        new_phone: Option<&str>,
    ) {
        if let Err(err) = self.try_sync_pix_keys(user_id, new_email, new_phone).await {
            tracing::warn!(user_id, error = %err, "PIX key sync failed");
        }
    }

    async fn try_sync_pix_keys(
        &self,
        user_id: &str,
        new_email: Option<&str>,
        new_phone: Option<&str>,
    ) -> Result<(), ProvisionError> {
        if new_email.is_none() && new_phone.is_none() {
            return Ok(());
        }

        let keys = self
            .store
            .query_eq(PIX_KEYS_COLLECTION, "userId", user_id)
            .await?;

        if keys.is_empty() {
            tracing::debug!(user_id, "no PIX keys to sync");
            return Ok(());
        }

        let pix_phone = new_phone.map(phone::normalize_for_pix);

        for (key_id, document) in keys {
            let key_type = document.get("keyType").and_then(serde_json::Value::as_str);

            let new_value = match key_type {
                Some("email") => new_email.map(str::to_string),
                Some("phone") => pix_phone.clone(),
                _ => None,
            };

            if let Some(value) = new_value {
                self.store
                    .merge(PIX_KEYS_COLLECTION, &key_id, json!({ "keyValue": value }))
                    .await?;
                tracing::debug!(user_id, key_id = %key_id, "PIX key value synced");
            }
        }

        Ok(())
    }

    /// Register a user-initiated PIX key (cpf, cnpj, an additional email or
    /// phone, or a random key). These get random ids and are not
    /// deduplicated; a `random`-type key receives a generated token as its
    /// value and the supplied value is ignored.
    pub async fn create_user_key(
        &self,
        user_id: &str,
        account_id: &str,
        key_type: PixKeyType,
        key_value: &str,
    ) -> Option<PixKey> {
        match self
            .try_create_user_key(user_id, account_id, key_type, key_value)
            .await
        {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!(user_id, %key_type, error = %err, "user PIX key creation failed");
                None
            }
        }
    }

    async fn try_create_user_key(
        &self,
        user_id: &str,
        account_id: &str,
        key_type: PixKeyType,
        key_value: &str,
    ) -> Result<PixKey, ProvisionError> {
        let value = match key_type {
            PixKeyType::Random => Uuid::new_v4().to_string(),
            PixKeyType::Phone => phone::normalize_for_pix(key_value),
            _ => key_value.to_string(),
        };

        let key = PixKey {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            account_id: account_id.to_string(),
            key_type,
            key_value: value,
            created_at: Utc::now(),
        };

        self.store
            .set(PIX_KEYS_COLLECTION, &key.id, serde_json::to_value(&key)?)
            .await?;

        tracing::info!(user_id, %key_type, key_id = %key.id, "user PIX key created");
        Ok(key)
    }

    /// Signup-path composite for Brazilian users: ensure the BRL account,
    /// then the auto email/phone PIX keys attached to it.
    pub async fn provision_brazilian_defaults(
        &self,
        user_id: &str,
        email: &str,
        phone: &str,
    ) -> Option<FinancialAccount> {
        let account = self.ensure_account(user_id, "BR").await?;
        self.ensure_pix_keys(user_id, &account.id, email, phone)
            .await;
        Some(account)
    }
}
