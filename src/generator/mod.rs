//! Account number generator
//!
//! Synthesizes country-specific account numbers, routing codes, IBAN and
//! SWIFT from a static per-country institution table plus randomized filler
//! digits. The IBAN is a display-format approximation (country code + two
//! random check digits + bank code + account number), not MOD-97 validated.
//!
//! The generator is deliberately not idempotent: two calls for the same
//! country produce different account numbers. Uniqueness per user is
//! enforced by the provisioner's deterministic document ids, never here.

mod countries;

use rand::Rng;

use countries::{AccountFormat, CountrySpec, IbanScheme};

/// Display name the platform uses for its own institution everywhere.
const BANK_NAME: &str = "Ethertron transactions";

/// Bank data synthesized for one country, before it is attached to a user.
#[derive(Debug, Clone)]
pub struct GeneratedAccount {
    pub country_code: String,
    pub country_name: String,
    pub flag_code: String,
    pub currency_code: String,
    pub account_number: String,
    pub routing_number: Option<String>,
    pub iban: Option<String>,
    pub swift: Option<String>,
    pub bank_code: Option<String>,
    pub branch_code: Option<String>,
    pub sort_code: Option<String>,
    pub bank_name: String,
    pub account_type: String,
}

/// A country offered for account creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryOption {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub currency: &'static str,
}

/// Countries with a dedicated institution entry.
pub fn available_countries() -> Vec<CountryOption> {
    countries::COUNTRIES
        .iter()
        .map(|spec| CountryOption {
            code: spec.code,
            name: spec.name,
            flag: spec.flag,
            currency: spec.currency,
        })
        .collect()
}

fn random_digits(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// Brazilian account body: 8 digits, dash, 1 check digit.
fn brazilian_account_number() -> String {
    format!("{}-{}", random_digits(8), random_digits(1))
}

fn synthesize_iban(country_code: &str, bank_code: &str, account_number: &str) -> String {
    let check_digits = random_digits(2);
    format!("{country_code}{check_digits}{bank_code}{account_number}")
}

/// Synthesize bank data for a country code.
///
/// Unknown country codes fall back to a generic USD-denominated account with
/// a synthesized IBAN and SWIFT built from the code itself.
pub fn generate(country_code: &str) -> GeneratedAccount {
    match countries::spec_for(country_code) {
        Some(spec) => from_spec(spec),
        None => generic_account(country_code),
    }
}

fn from_spec(spec: &CountrySpec) -> GeneratedAccount {
    let account_number = match spec.account_format {
        AccountFormat::Digits(len) => random_digits(len),
        AccountFormat::BrazilianWithCheckDigit => brazilian_account_number(),
    };

    let iban = match spec.iban {
        IbanScheme::None => None,
        IbanScheme::BankCode => Some(synthesize_iban(
            spec.code,
            spec.bank_code.unwrap_or("0000"),
            &account_number,
        )),
        IbanScheme::BankAndBranch => {
            let institution = format!(
                "{}{}",
                spec.bank_code.unwrap_or("00000"),
                spec.branch_code.unwrap_or("00000")
            );
            Some(synthesize_iban(spec.code, &institution, &account_number))
        }
        IbanScheme::SortCode => {
            let sort_digits: String = spec
                .sort_code
                .unwrap_or("000000")
                .chars()
                .filter(char::is_ascii_digit)
                .collect();
            Some(synthesize_iban(spec.code, &sort_digits, &account_number))
        }
    };

    GeneratedAccount {
        country_code: spec.code.to_string(),
        country_name: spec.name.to_string(),
        flag_code: spec.flag.to_string(),
        currency_code: spec.currency.to_string(),
        account_number,
        routing_number: spec.routing_number.map(str::to_string),
        iban,
        swift: Some(spec.swift.to_string()),
        bank_code: spec.bank_code.map(str::to_string),
        branch_code: spec.branch_code.map(str::to_string),
        sort_code: spec.sort_code.map(str::to_string),
        bank_name: BANK_NAME.to_string(),
        account_type: spec.account_type.to_string(),
    }
}

fn generic_account(country_code: &str) -> GeneratedAccount {
    let account_number = random_digits(10);
    let iban = synthesize_iban(country_code, "0000", &account_number);

    GeneratedAccount {
        country_code: country_code.to_string(),
        country_name: "País".to_string(),
        flag_code: country_code.to_lowercase(),
        currency_code: "USD".to_string(),
        account_number,
        routing_number: None,
        iban: Some(iban),
        swift: Some(format!("ETR{country_code}XX")),
        bank_code: None,
        branch_code: None,
        sort_code: None,
        bank_name: BANK_NAME.to_string(),
        account_type: "Account".to_string(),
    }
}
