//! ethertron_core
//!
//! Concurrency-and-idempotency layer for the Ethertron fiat platform: a
//! per-user operation lock for balance-mutating flows, an idempotent
//! provisioner for bank accounts and PIX keys, a deterministic account
//! number/IBAN synthesizer, and an append-only conversion audit trail.
//!
//! The lock serializes within a single process only; multi-instance safety
//! has to come from the storage layer. Provisioning relies on
//! deterministic document ids instead of locks, because it is idempotent
//! and commutative where balance mutation is not.

pub mod audit;
pub mod config;
pub mod domain;
pub mod generator;
pub mod lock;
pub mod provisioner;
pub mod store;

pub use audit::{
    AuditLogEntry, AuditOperation, AuditRecord, AuditTrail, BalanceSnapshot, ConversionMode,
};
pub use config::{Config, ConfigError};
pub use domain::{FinancialAccount, PixKey, PixKeyType};
pub use generator::{available_countries, generate, CountryOption, GeneratedAccount};
pub use lock::{OperationLockManager, DEFAULT_LOCK_TTL};
pub use provisioner::ResourceProvisioner;
pub use store::{DocumentStore, MemoryStore, StoreError};
