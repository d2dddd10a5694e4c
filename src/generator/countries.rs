//! Per-country institution data
//!
//! Fixed bank metadata representing the platform's own institution identity
//! in each supported country. Only the account-number body is randomized;
//! everything here is constant.

/// How the account-number body is shaped for a country.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AccountFormat {
    /// A plain run of random digits.
    Digits(usize),
    /// Brazilian format: 8 digits, a dash, then one check digit.
    BrazilianWithCheckDigit,
}

/// Which fixed institution code feeds the display-format IBAN.
#[derive(Debug, Clone, Copy)]
pub(crate) enum IbanScheme {
    /// No IBAN for this country.
    None,
    /// Country + check digits + bank code + account number.
    BankCode,
    /// Bank and branch codes concatenated (Italian ABI + CAB).
    BankAndBranch,
    /// UK sort code with the dashes stripped.
    SortCode,
}

#[derive(Debug)]
pub(crate) struct CountrySpec {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
    pub currency: &'static str,
    pub account_type: &'static str,
    pub account_format: AccountFormat,
    pub bank_code: Option<&'static str>,
    pub branch_code: Option<&'static str>,
    pub sort_code: Option<&'static str>,
    pub routing_number: Option<&'static str>,
    pub swift: &'static str,
    pub iban: IbanScheme,
}

pub(crate) static COUNTRIES: &[CountrySpec] = &[
    CountrySpec {
        code: "BR",
        name: "Brasil",
        flag: "br",
        currency: "BRL",
        account_type: "Conta Corrente",
        account_format: AccountFormat::BrazilianWithCheckDigit,
        bank_code: Some("336"),
        branch_code: Some("0001"),
        sort_code: None,
        routing_number: None,
        swift: "ETRBRBR",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "US",
        name: "Estados Unidos",
        flag: "us",
        currency: "USD",
        account_type: "Checking Account",
        account_format: AccountFormat::Digits(12),
        bank_code: None,
        branch_code: None,
        sort_code: None,
        routing_number: Some("021000021"),
        swift: "ETRUSNY",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "PT",
        name: "Portugal",
        flag: "pt",
        currency: "EUR",
        account_type: "Conta à Ordem",
        account_format: AccountFormat::Digits(11),
        bank_code: Some("0035"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRPTPL",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "ES",
        name: "Espanha",
        flag: "es",
        currency: "EUR",
        account_type: "Cuenta Corriente",
        account_format: AccountFormat::Digits(10),
        bank_code: Some("2100"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRESMM",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "FR",
        name: "França",
        flag: "fr",
        currency: "EUR",
        account_type: "Compte Courant",
        account_format: AccountFormat::Digits(11),
        bank_code: Some("30004"),
        branch_code: Some("00001"),
        sort_code: None,
        routing_number: None,
        swift: "ETRFRPP",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "DE",
        name: "Alemanha",
        flag: "de",
        currency: "EUR",
        account_type: "Girokonto",
        account_format: AccountFormat::Digits(10),
        bank_code: Some("10050000"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRDEFF",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "IT",
        name: "Itália",
        flag: "it",
        currency: "EUR",
        account_type: "Conto Corrente",
        account_format: AccountFormat::Digits(12),
        bank_code: Some("05034"),
        branch_code: Some("01600"),
        sort_code: None,
        routing_number: None,
        swift: "ETRITM1",
        iban: IbanScheme::BankAndBranch,
    },
    CountrySpec {
        code: "GB",
        name: "Reino Unido",
        flag: "gb",
        currency: "GBP",
        account_type: "Current Account",
        account_format: AccountFormat::Digits(8),
        bank_code: None,
        branch_code: None,
        sort_code: Some("60-16-13"),
        routing_number: None,
        swift: "ETRGB2L",
        iban: IbanScheme::SortCode,
    },
    CountrySpec {
        code: "NL",
        name: "Holanda",
        flag: "nl",
        currency: "EUR",
        account_type: "Betaalrekening",
        account_format: AccountFormat::Digits(10),
        bank_code: Some("ETRC"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRNL2A",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "BE",
        name: "Bélgica",
        flag: "be",
        currency: "EUR",
        account_type: "Compte à Vue",
        account_format: AccountFormat::Digits(12),
        bank_code: Some("735"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRBEBB",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "CH",
        name: "Suíça",
        flag: "ch",
        currency: "CHF",
        account_type: "Privatkonto",
        account_format: AccountFormat::Digits(9),
        bank_code: Some("00235"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRCHZZ",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "AT",
        name: "Áustria",
        flag: "at",
        currency: "EUR",
        account_type: "Girokonto",
        account_format: AccountFormat::Digits(11),
        bank_code: Some("12000"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRATWW",
        iban: IbanScheme::BankCode,
    },
    CountrySpec {
        code: "CA",
        name: "Canadá",
        flag: "ca",
        currency: "CAD",
        account_type: "Chequing Account",
        account_format: AccountFormat::Digits(12),
        bank_code: None,
        branch_code: None,
        sort_code: None,
        routing_number: Some("000010001"),
        swift: "ETRCATT",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "AU",
        name: "Austrália",
        flag: "au",
        currency: "AUD",
        account_type: "Transaction Account",
        account_format: AccountFormat::Digits(9),
        bank_code: None,
        branch_code: None,
        sort_code: None,
        routing_number: Some("062-000"), // BSB
        swift: "ETRAU2S",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "MX",
        name: "México",
        flag: "mx",
        currency: "MXN",
        account_type: "Cuenta de Cheques",
        account_format: AccountFormat::Digits(18),
        bank_code: Some("072"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRMXMM",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "AR",
        name: "Argentina",
        flag: "ar",
        currency: "ARS",
        account_type: "Cuenta Corriente",
        account_format: AccountFormat::Digits(14),
        bank_code: Some("336"),
        branch_code: Some("0001"),
        sort_code: None,
        routing_number: None,
        swift: "ETRARBA",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "CL",
        name: "Chile",
        flag: "cl",
        currency: "CLP",
        account_type: "Cuenta Corriente",
        account_format: AccountFormat::Digits(12),
        bank_code: Some("055"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRCLRM",
        iban: IbanScheme::None,
    },
    CountrySpec {
        code: "CO",
        name: "Colômbia",
        flag: "co",
        currency: "COP",
        account_type: "Cuenta de Ahorros",
        account_format: AccountFormat::Digits(11),
        bank_code: Some("0001"),
        branch_code: None,
        sort_code: None,
        routing_number: None,
        swift: "ETRCOBB",
        iban: IbanScheme::None,
    },
];

pub(crate) fn spec_for(country_code: &str) -> Option<&'static CountrySpec> {
    COUNTRIES.iter().find(|spec| spec.code == country_code)
}
