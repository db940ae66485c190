// 💬 Message Catalog - every user-facing text, per locale
// Indonesian is the source locale of the form; English is a direct translation.

use crate::fields::FieldKey;
use crate::form::StatusLine;
use crate::validators::ValidationKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Locale {
    /// id-ID
    #[default]
    #[serde(rename = "id")]
    Indonesian,
    /// en
    #[serde(rename = "en")]
    English,
}

impl Locale {
    pub fn code(&self) -> &'static str {
        match self {
            Locale::Indonesian => "id",
            Locale::English => "en",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale `{0}` (expected `id` or `en`)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" | "id-id" => Ok(Locale::Indonesian),
            "en" | "en-us" | "en-gb" => Ok(Locale::English),
            _ => Err(UnknownLocale(s.to_string())),
        }
    }
}

// ============================================================================
// VALIDATION MESSAGES
// ============================================================================

/// Human-readable message for a failed field check
pub fn validation_message(field: FieldKey, kind: ValidationKind, locale: Locale) -> &'static str {
    use FieldKey as F;
    use ValidationKind as K;

    match locale {
        Locale::Indonesian => match (field, kind) {
            (F::FullName, K::Required) => "Nama lengkap wajib diisi.",
            (F::FullName, K::TooShort) => "Nama terlalu pendek (minimal 3 karakter).",
            (F::StudentId, K::Required) => "NIM wajib diisi.",
            (F::StudentId, K::NotNumeric) => "NIM harus berupa angka (0-9) tanpa spasi.",
            (F::StudentId, K::BadLength) => "Panjang NIM harus 10–12 digit.",
            (F::Email, K::Required) => "Email wajib diisi.",
            (F::Email, K::BadFormat) => "Format email tidak valid.",
            (F::Program, K::Required) => "Program studi wajib dipilih.",
            (F::Gender, K::Required) => "Jenis kelamin wajib dipilih.",
            (F::BirthDate, K::Required) => "Tanggal lahir wajib diisi.",
            (F::BirthDate, K::InvalidDate) => "Tanggal lahir tidak valid.",
            (F::BirthDate, K::TooYoung) => "Usia minimal 15 tahun.",
            (F::Phone, K::Required) => "Nomor telepon wajib diisi.",
            (F::Phone, K::BadFormat) => "Nomor telepon harus diawali 08 dan 10–13 digit.",
            (F::Address, K::Required) => "Alamat wajib diisi.",
            (F::Address, K::TooShort) => "Alamat terlalu singkat (minimal 10 karakter).",
            (_, kind) => generic_message(kind, locale),
        },
        Locale::English => match (field, kind) {
            (F::FullName, K::Required) => "Full name is required.",
            (F::FullName, K::TooShort) => "Name is too short (at least 3 characters).",
            (F::StudentId, K::Required) => "Student ID is required.",
            (F::StudentId, K::NotNumeric) => "Student ID must be digits (0-9) without spaces.",
            (F::StudentId, K::BadLength) => "Student ID must be 10–12 digits long.",
            (F::Email, K::Required) => "Email is required.",
            (F::Email, K::BadFormat) => "Email format is invalid.",
            (F::Program, K::Required) => "Please select a study program.",
            (F::Gender, K::Required) => "Please select a gender.",
            (F::BirthDate, K::Required) => "Birth date is required.",
            (F::BirthDate, K::InvalidDate) => "Birth date is invalid.",
            (F::BirthDate, K::TooYoung) => "Minimum age is 15 years.",
            (F::Phone, K::Required) => "Phone number is required.",
            (F::Phone, K::BadFormat) => "Phone number must start with 08 and have 10–13 digits.",
            (F::Address, K::Required) => "Address is required.",
            (F::Address, K::TooShort) => "Address is too short (at least 10 characters).",
            (_, kind) => generic_message(kind, locale),
        },
    }
}

fn generic_message(kind: ValidationKind, locale: Locale) -> &'static str {
    use ValidationKind as K;

    match (locale, kind) {
        (Locale::Indonesian, K::Required) => "Wajib diisi.",
        (Locale::Indonesian, K::TooShort) => "Isian terlalu pendek.",
        (Locale::Indonesian, K::BadLength) => "Panjang isian tidak sesuai.",
        (Locale::Indonesian, K::NotNumeric) => "Isian harus berupa angka.",
        (Locale::Indonesian, K::BadFormat) => "Format isian tidak valid.",
        (Locale::Indonesian, K::InvalidDate) => "Tanggal tidak valid.",
        (Locale::Indonesian, K::TooYoung) => "Usia belum memenuhi syarat.",
        (Locale::English, K::Required) => "This field is required.",
        (Locale::English, K::TooShort) => "Value is too short.",
        (Locale::English, K::BadLength) => "Value has the wrong length.",
        (Locale::English, K::NotNumeric) => "Value must be numeric.",
        (Locale::English, K::BadFormat) => "Value has an invalid format.",
        (Locale::English, K::InvalidDate) => "Date is invalid.",
        (Locale::English, K::TooYoung) => "Minimum age not reached.",
    }
}

// ============================================================================
// LABELS & VIEW TEXT
// ============================================================================

pub fn field_label(field: FieldKey, locale: Locale) -> &'static str {
    match (locale, field) {
        (Locale::Indonesian, FieldKey::FullName) => "Nama Lengkap",
        (Locale::Indonesian, FieldKey::StudentId) => "NIM",
        (Locale::Indonesian, FieldKey::Email) => "Email",
        (Locale::Indonesian, FieldKey::Program) => "Program Studi",
        (Locale::Indonesian, FieldKey::Gender) => "Jenis Kelamin",
        (Locale::Indonesian, FieldKey::BirthDate) => "Tanggal Lahir",
        (Locale::Indonesian, FieldKey::Phone) => "Nomor Telepon",
        (Locale::Indonesian, FieldKey::Address) => "Alamat",
        (Locale::English, FieldKey::FullName) => "Full Name",
        (Locale::English, FieldKey::StudentId) => "Student ID",
        (Locale::English, FieldKey::Email) => "Email",
        (Locale::English, FieldKey::Program) => "Study Program",
        (Locale::English, FieldKey::Gender) => "Gender",
        (Locale::English, FieldKey::BirthDate) => "Birth Date",
        (Locale::English, FieldKey::Phone) => "Phone Number",
        (Locale::English, FieldKey::Address) => "Address",
    }
}

pub fn status_text(status: StatusLine, locale: Locale) -> &'static str {
    match (locale, status) {
        (Locale::Indonesian, StatusLine::NotSubmitted) => "Belum dikirim",
        (Locale::Indonesian, StatusLine::CheckInput) => "Periksa input",
        (Locale::Indonesian, StatusLine::Sent) => "Terkirim",
        (Locale::Indonesian, StatusLine::Restored) => "Tersimpan (hasil terakhir)",
        (Locale::English, StatusLine::NotSubmitted) => "Not yet submitted",
        (Locale::English, StatusLine::CheckInput) => "Check input",
        (Locale::English, StatusLine::Sent) => "Sent",
        (Locale::English, StatusLine::Restored) => "Saved (last result)",
    }
}

pub fn storage_badge(has_record: bool, locale: Locale) -> &'static str {
    match (locale, has_record) {
        (Locale::Indonesian, true) => "penyimpanan: ada",
        (Locale::Indonesian, false) => "penyimpanan: kosong",
        (Locale::English, true) => "storage: present",
        (Locale::English, false) => "storage: empty",
    }
}

pub fn summary_title(locale: Locale) -> &'static str {
    match locale {
        Locale::Indonesian => "Pendaftaran Berhasil",
        Locale::English => "Registration Successful",
    }
}

pub fn submitted_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Indonesian => "Terkirim",
        Locale::English => "Submitted",
    }
}

pub fn last_saved_badge(locale: Locale) -> &'static str {
    match locale {
        Locale::Indonesian => "Terakhir tersimpan",
        Locale::English => "Last saved",
    }
}

pub fn empty_placeholder(locale: Locale) -> &'static str {
    match locale {
        Locale::Indonesian => {
            "Belum ada data pendaftaran. Setelah submit berhasil, ringkasan akan muncul di sini."
        }
        Locale::English => {
            "No registration data yet. After a successful submit, the summary will appear here."
        }
    }
}

/// Long month name, `month` is 1-based
pub fn month_name(month: u32, locale: Locale) -> &'static str {
    const ID: [&str; 12] = [
        "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus", "September",
        "Oktober", "November", "Desember",
    ];
    const EN: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August", "September",
        "October", "November", "December",
    ];

    let names = match locale {
        Locale::Indonesian => &ID,
        Locale::English => &EN,
    };
    names
        .get((month as usize).wrapping_sub(1))
        .copied()
        .unwrap_or("-")
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale() {
        assert_eq!("id".parse::<Locale>(), Ok(Locale::Indonesian));
        assert_eq!("EN".parse::<Locale>(), Ok(Locale::English));
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_field_specific_messages() {
        assert_eq!(
            validation_message(FieldKey::StudentId, ValidationKind::BadLength, Locale::Indonesian),
            "Panjang NIM harus 10–12 digit."
        );
        assert_eq!(
            validation_message(FieldKey::Phone, ValidationKind::BadFormat, Locale::English),
            "Phone number must start with 08 and have 10–13 digits."
        );
    }

    #[test]
    fn test_unmapped_combination_falls_back_to_kind() {
        assert_eq!(
            validation_message(FieldKey::Gender, ValidationKind::TooShort, Locale::English),
            "Value is too short."
        );
    }

    #[test]
    fn test_month_names() {
        assert_eq!(month_name(1, Locale::Indonesian), "Januari");
        assert_eq!(month_name(12, Locale::English), "December");
        assert_eq!(month_name(0, Locale::English), "-");
        assert_eq!(month_name(13, Locale::English), "-");
    }

    #[test]
    fn test_status_texts() {
        assert_eq!(status_text(StatusLine::Sent, Locale::English), "Sent");
        assert_eq!(status_text(StatusLine::NotSubmitted, Locale::Indonesian), "Belum dikirim");
    }
}
