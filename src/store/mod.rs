//! Document store collaborator
//!
//! The provisioning and audit layers talk to a hosted document store owned
//! by another part of the platform. This module defines that seam as a trait
//! over `(collection, key) -> JSON document` plus the in-memory backend used
//! by the test suites.

mod memory;

pub use memory::MemoryStore;

use serde_json::Value;

/// Errors surfaced by a document store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("permission denied")]
    PermissionDenied,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Permission failures are treated specially by the audit trail, which
    /// stops retrying for the rest of the session.
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, StoreError::PermissionDenied)
    }
}

/// Key-value document store, keyed by collection name and document id.
///
/// `set` fully replaces a document, `merge` upserts individual top-level
/// fields, and `query_eq` filters a collection on a top-level string field.
/// There is no insert-if-absent primitive; callers that need exactly-once
/// creation rely on deterministic document ids so that racing writers land
/// on the same document.
pub trait DocumentStore: Send + Sync + 'static {
    /// Fetch a document, or `None` if it does not exist.
    fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<Value>, StoreError>> + Send;

    /// Create or fully replace a document.
    fn set(
        &self,
        collection: &str,
        key: &str,
        document: Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Upsert: set the given top-level fields, creating the document if it
    /// does not exist and leaving other fields untouched if it does.
    fn merge(
        &self,
        collection: &str,
        key: &str,
        fields: Value,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Return all `(key, document)` pairs in a collection whose top-level
    /// `field` equals `value`.
    fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<Vec<(String, Value)>, StoreError>> + Send;
}
