//! PIX phone helpers
//!
//! PIX phone keys do not carry the +55 country code: a stored key is the
//! bare DDD + number, digits only. Format problems are logged as warnings
//! and the best-effort value is still used downstream; rejecting the value
//! outright would block signup over a cosmetic mismatch.

/// Strip the Brazilian country code and all formatting from a phone number,
/// leaving the digits used as a PIX key.
///
/// `"+5511999887766"`, `"+55 11 99988-7766"` and `"(11) 99988-7766"` all
/// become `"11999887766"`.
pub fn format_for_pix(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }

    let mut cleaned = phone.trim().to_string();

    if let Some(rest) = cleaned.strip_prefix("+55") {
        cleaned = rest.to_string();
    } else if cleaned.starts_with("55") {
        // A bare 55 prefix is only the country code when enough digits
        // follow for DDD + number.
        let digit_count = cleaned.chars().filter(char::is_ascii_digit).count();
        if digit_count == 13 || digit_count == 14 {
            cleaned = cleaned[2..].to_string();
        }
    }

    let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();

    // 10 digits: landline, 11 digits: mobile.
    if digits.len() != 10 && digits.len() != 11 {
        tracing::warn!(
            phone,
            digit_count = digits.len(),
            "phone has unexpected digit count for a PIX key"
        );
    }

    digits
}

/// Whether a phone number is a well-formed Brazilian PIX key.
pub fn is_valid_pix_phone(phone: &str) -> bool {
    if phone.is_empty() {
        return false;
    }

    let cleaned = format_for_pix(phone);

    if cleaned.len() != 10 && cleaned.len() != 11 {
        return false;
    }

    // DDD ranges 11-99.
    let Ok(ddd) = cleaned[..2].parse::<u32>() else {
        return false;
    };
    if !(11..=99).contains(&ddd) {
        return false;
    }

    // Mobile numbers have a leading 9 after the DDD.
    if cleaned.len() == 11 && !cleaned[2..].starts_with('9') {
        return false;
    }

    true
}

/// Normalize a phone number to its PIX key form, warning (but not failing)
/// when the result is not a valid PIX phone.
pub fn normalize_for_pix(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }

    let formatted = format_for_pix(phone);

    if !is_valid_pix_phone(&formatted) {
        tracing::warn!(phone, "phone could not be normalized to a PIX key, using as-is");
    }

    formatted
}

/// Format a phone number for display: `"11999887766"` → `"(11) 99988-7766"`.
pub fn format_for_display(phone: &str) -> String {
    if phone.is_empty() {
        return String::new();
    }

    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        11 => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
        10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => phone.to_string(),
    }
}

/// Normalize a profile phone number to `+<digits>` form, the shape stored on
/// the user document and fed into secret derivation.
pub fn normalize_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("+{digits}")
}
