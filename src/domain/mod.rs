//! Domain module
//!
//! Shared types and validation helpers.

pub mod account;
pub mod phone;
pub mod pix;
pub mod secret;

pub use account::{account_doc_id, FinancialAccount};
pub use pix::{auto_key_doc_id, PixKey, PixKeyType};
