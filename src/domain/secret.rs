//! Login secret derivation
//!
//! Phone + PIN login derives a stable secret from the normalized phone, the
//! PIN and a fixed salt. The platform rebranded from Nexcoin to Ethertron;
//! accounts created before the rebrand carry secrets derived with the old
//! salt, so login tries the current salt first and falls back to the legacy
//! one. The legacy salt stays supported until product confirms no remaining
//! accounts depend on it.

/// Salt used for all newly derived secrets.
pub const CURRENT_SALT: &str = "Ethertron2024!";

/// Pre-rebrand salt, accepted on login only.
pub const LEGACY_SALT: &str = "Nexcoin2024!";

fn derive_with_salt(phone: &str, pin: &str, salt: &str) -> String {
    format!("{phone}_{pin}_{salt}")
}

/// Derive the secret for a new account or a credential migration.
pub fn derive_login_secret(phone: &str, pin: &str) -> String {
    derive_with_salt(phone, pin, CURRENT_SALT)
}

/// Secrets to try on login, in order: current salt, then legacy.
pub fn candidate_login_secrets(phone: &str, pin: &str) -> [String; 2] {
    [
        derive_with_salt(phone, pin, CURRENT_SALT),
        derive_with_salt(phone, pin, LEGACY_SALT),
    ]
}
