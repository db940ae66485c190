// ✅ Field Validators - pure checks for each registration input
// Each validator maps a raw value to its normalized form plus an optional failure kind.

use crate::fields::FieldKey;
use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Minimum full-name length after whitespace normalization
pub const MIN_NAME_LEN: usize = 3;

/// Allowed student ID length (inclusive)
pub const STUDENT_ID_MIN_LEN: usize = 10;
pub const STUDENT_ID_MAX_LEN: usize = 12;

/// Minimum applicant age in whole years
pub const MIN_AGE_YEARS: i32 = 15;

/// Minimum address length after whitespace normalization
pub const MIN_ADDRESS_LEN: usize = 10;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern is valid")
});

// Indonesian mobile numbers: "08" + 8..=11 digits
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^08[0-9]{8,11}$").expect("phone pattern is valid"));

// ============================================================================
// VALIDATION KIND
// ============================================================================

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValidationKind {
    Required,
    TooShort,
    BadLength,
    NotNumeric,
    BadFormat,
    InvalidDate,
    TooYoung,
}

impl ValidationKind {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationKind::Required => "Required",
            ValidationKind::TooShort => "TooShort",
            ValidationKind::BadLength => "BadLength",
            ValidationKind::NotNumeric => "NotNumeric",
            ValidationKind::BadFormat => "BadFormat",
            ValidationKind::InvalidDate => "InvalidDate",
            ValidationKind::TooYoung => "TooYoung",
        }
    }
}

impl fmt::Display for ValidationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// FIELD CHECK
// ============================================================================

/// Result of running one validator: the normalized value is always produced,
/// even when the check fails, so hosts can echo it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCheck {
    pub normalized: String,
    pub failure: Option<ValidationKind>,
}

impl FieldCheck {
    fn pass(normalized: String) -> Self {
        FieldCheck { normalized, failure: None }
    }

    fn fail(normalized: String, kind: ValidationKind) -> Self {
        FieldCheck { normalized, failure: Some(kind) }
    }

    pub fn is_valid(&self) -> bool {
        self.failure.is_none()
    }
}

/// Run the validator that belongs to `key`.
///
/// `today` is only consulted by the birth-date check.
pub fn validate(key: FieldKey, raw: &str, today: NaiveDate) -> FieldCheck {
    match key {
        FieldKey::FullName => validate_full_name(raw),
        FieldKey::StudentId => validate_student_id(raw),
        FieldKey::Email => validate_email(raw),
        FieldKey::Program => validate_selection(raw),
        FieldKey::Gender => validate_selection(raw),
        FieldKey::BirthDate => validate_birth_date(raw, today),
        FieldKey::Phone => validate_phone(raw),
        FieldKey::Address => validate_address(raw),
    }
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Whitespace as a browser form sees it: Unicode white space plus the BOM
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Trim both ends and collapse every whitespace run into one space
pub fn normalize_spaces(raw: &str) -> String {
    raw.split(is_blank)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn trim_blank(raw: &str) -> &str {
    raw.trim_matches(is_blank)
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ============================================================================
// VALIDATORS
// ============================================================================

pub fn validate_full_name(raw: &str) -> FieldCheck {
    let name = normalize_spaces(raw);
    if name.is_empty() {
        FieldCheck::fail(name, ValidationKind::Required)
    } else if char_len(&name) < MIN_NAME_LEN {
        FieldCheck::fail(name, ValidationKind::TooShort)
    } else {
        FieldCheck::pass(name)
    }
}

pub fn validate_student_id(raw: &str) -> FieldCheck {
    let nim = trim_blank(raw).to_string();
    if nim.is_empty() {
        FieldCheck::fail(nim, ValidationKind::Required)
    } else if !nim.bytes().all(|b| b.is_ascii_digit()) {
        FieldCheck::fail(nim, ValidationKind::NotNumeric)
    } else if !(STUDENT_ID_MIN_LEN..=STUDENT_ID_MAX_LEN).contains(&nim.len()) {
        FieldCheck::fail(nim, ValidationKind::BadLength)
    } else {
        FieldCheck::pass(nim)
    }
}

pub fn validate_email(raw: &str) -> FieldCheck {
    let email = trim_blank(raw).to_string();
    if email.is_empty() {
        FieldCheck::fail(email, ValidationKind::Required)
    } else if !EMAIL_PATTERN.is_match(&email) {
        FieldCheck::fail(email, ValidationKind::BadFormat)
    } else {
        FieldCheck::pass(email)
    }
}

/// Program and gender: the option set is enforced by the input itself,
/// only presence is checked here. The chosen value is stored as given.
pub fn validate_selection(raw: &str) -> FieldCheck {
    let choice = raw.to_string();
    if trim_blank(raw).is_empty() {
        FieldCheck::fail(choice, ValidationKind::Required)
    } else {
        FieldCheck::pass(choice)
    }
}

/// The birth date string is opaque to storage: the normalized value is the raw
/// input unchanged, only its parsed form is checked.
pub fn validate_birth_date(raw: &str, today: NaiveDate) -> FieldCheck {
    let value = raw.to_string();
    if trim_blank(raw).is_empty() {
        return FieldCheck::fail(value, ValidationKind::Required);
    }

    match parse_birth_date(raw) {
        None => FieldCheck::fail(value, ValidationKind::InvalidDate),
        Some(birth) if age_on(birth, today) < MIN_AGE_YEARS => {
            FieldCheck::fail(value, ValidationKind::TooYoung)
        }
        Some(_) => FieldCheck::pass(value),
    }
}

pub fn validate_phone(raw: &str) -> FieldCheck {
    let phone = trim_blank(raw).to_string();
    if phone.is_empty() {
        FieldCheck::fail(phone, ValidationKind::Required)
    } else if !PHONE_PATTERN.is_match(&phone) {
        FieldCheck::fail(phone, ValidationKind::BadFormat)
    } else {
        FieldCheck::pass(phone)
    }
}

pub fn validate_address(raw: &str) -> FieldCheck {
    let address = normalize_spaces(raw);
    if address.is_empty() {
        FieldCheck::fail(address, ValidationKind::Required)
    } else if char_len(&address) < MIN_ADDRESS_LEN {
        FieldCheck::fail(address, ValidationKind::TooShort)
    } else {
        FieldCheck::pass(address)
    }
}

// ============================================================================
// DATES
// ============================================================================

/// Parse a calendar date as supplied by a date input.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD` and RFC 3339 instants (date part is used).
pub fn parse_birth_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Age in whole years on `today`; negative for dates in the future
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_blank_input_is_required_for_every_field() {
        for key in FieldKey::ALL {
            for raw in ["", "   ", "\t\n "] {
                let check = validate(key, raw, today());
                assert_eq!(
                    check.failure,
                    Some(ValidationKind::Required),
                    "{key} with {raw:?}"
                );
            }
        }
    }

    #[test]
    fn test_full_name_normalization() {
        let check = validate_full_name("  Siti   Nur\tAisyah  ");
        assert!(check.is_valid());
        assert_eq!(check.normalized, "Siti Nur Aisyah");

        assert_eq!(validate_full_name("  A   ").failure, Some(ValidationKind::TooShort));
        assert_eq!(validate_full_name(" Ab ").failure, Some(ValidationKind::TooShort));
        assert!(validate_full_name("Ani").is_valid());
    }

    #[test]
    fn test_full_name_collapsed_space_counts_toward_length() {
        let check = validate_full_name(" A  b ");
        assert_eq!(check.normalized, "A b");
        assert!(check.is_valid());
    }

    #[test]
    fn test_byte_order_mark_is_whitespace() {
        assert_eq!(
            validate_full_name("\u{feff}\u{feff}\u{feff}").failure,
            Some(ValidationKind::Required)
        );
        assert_eq!(normalize_spaces("\u{feff}Siti\u{feff} Aisyah "), "Siti Aisyah");
        assert_eq!(
            validate_student_id("\u{feff}1234567890").normalized,
            "1234567890"
        );
    }

    #[test]
    fn test_selection_value_is_passed_through() {
        let check = validate_selection(" Perempuan ");
        assert!(check.is_valid());
        assert_eq!(check.normalized, " Perempuan ");
        assert_eq!(validate_selection(" \t").failure, Some(ValidationKind::Required));
    }

    #[test]
    fn test_student_id_rules() {
        assert_eq!(validate_student_id("12345").failure, Some(ValidationKind::BadLength));
        assert_eq!(
            validate_student_id("abcdefghij").failure,
            Some(ValidationKind::NotNumeric)
        );
        assert_eq!(
            validate_student_id("12345 67890").failure,
            Some(ValidationKind::NotNumeric)
        );
        assert!(validate_student_id("1234567890").is_valid());
        assert!(validate_student_id(" 123456789012 ").is_valid());
        assert_eq!(
            validate_student_id("1234567890123").failure,
            Some(ValidationKind::BadLength)
        );
    }

    #[test]
    fn test_email_rules() {
        assert_eq!(validate_email("a@b.c").failure, Some(ValidationKind::BadFormat));
        assert!(validate_email("a@b.co").is_valid());
        assert!(validate_email(" Siti.Aisyah@Kampus.AC.ID ").is_valid());
        assert_eq!(validate_email("a b@c.id").failure, Some(ValidationKind::BadFormat));
        assert_eq!(validate_email("a@@b.co").failure, Some(ValidationKind::BadFormat));
        assert_eq!(validate_email("no-at-sign.com").failure, Some(ValidationKind::BadFormat));
    }

    #[test]
    fn test_phone_rules() {
        assert!(validate_phone("081234567890").is_valid());
        assert_eq!(validate_phone("021234567890").failure, Some(ValidationKind::BadFormat));
        // 10 and 13 digits are the bounds
        assert!(validate_phone("0812345678").is_valid());
        assert!(validate_phone("0812345678901").is_valid());
        assert_eq!(validate_phone("081234567").failure, Some(ValidationKind::BadFormat));
        assert_eq!(validate_phone("08123456789012").failure, Some(ValidationKind::BadFormat));
        assert_eq!(validate_phone("+6281234567890").failure, Some(ValidationKind::BadFormat));
    }

    #[test]
    fn test_birth_date_age_boundary() {
        let exactly_fifteen = today().with_year(today().year() - 15).unwrap();
        let one_day_short = exactly_fifteen.succ_opt().unwrap();

        assert!(validate_birth_date(&exactly_fifteen.to_string(), today()).is_valid());
        assert_eq!(
            validate_birth_date(&one_day_short.to_string(), today()).failure,
            Some(ValidationKind::TooYoung)
        );
    }

    #[test]
    fn test_birth_date_parsing() {
        assert_eq!(
            validate_birth_date("31-12-2000", today()).failure,
            Some(ValidationKind::InvalidDate)
        );
        assert_eq!(
            validate_birth_date("2001-02-30", today()).failure,
            Some(ValidationKind::InvalidDate)
        );
        assert!(validate_birth_date("2000/01/31", today()).is_valid());
        assert!(validate_birth_date("2000-01-31T00:00:00Z", today()).is_valid());
    }

    #[test]
    fn test_birth_date_passes_raw_value_through() {
        let check = validate_birth_date("2000-01-31", today());
        assert_eq!(check.normalized, "2000-01-31");
    }

    #[test]
    fn test_future_birth_date_is_too_young() {
        let check = validate_birth_date("2030-01-01", today());
        assert_eq!(check.failure, Some(ValidationKind::TooYoung));
    }

    #[test]
    fn test_age_on_leap_day() {
        let birth = NaiveDate::from_ymd_opt(2008, 2, 29).unwrap();
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()), 14);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2023, 3, 1).unwrap()), 15);
    }

    #[test]
    fn test_address_length_after_normalization() {
        // 9 visible characters including the collapsed space
        let nine = validate_address("  Jl.   Mawar ");
        assert_eq!(nine.normalized, "Jl. Mawar");
        assert_eq!(nine.failure, Some(ValidationKind::TooShort));

        let ten = validate_address("Jl.  Mawar1");
        assert_eq!(ten.normalized, "Jl. Mawar1");
        assert!(ten.is_valid());
    }

    #[test]
    fn test_single_field_validation_is_idempotent() {
        for key in FieldKey::ALL {
            let first = validate(key, " 08123 ", today());
            let second = validate(key, " 08123 ", today());
            assert_eq!(first, second);
        }
    }
}
