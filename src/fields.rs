// 🗂️ Field Registry - the eight inputs of the registration form
// Storage names, labels, live-validation triggers and fixed option sets

use crate::messages::{self, Locale};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of fields on the form
pub const FIELD_COUNT: usize = 8;

/// Study programs offered by the selection input
pub const PROGRAM_OPTIONS: &[&str] = &[
    "Teknik Informatika",
    "Sistem Informasi",
    "Teknik Elektro",
    "Manajemen",
    "Akuntansi",
    "Ilmu Komunikasi",
];

/// Gender options offered by the selection input
pub const GENDER_OPTIONS: &[&str] = &["Laki-laki", "Perempuan"];

// ============================================================================
// FIELD KEY
// ============================================================================

/// One named input on the registration form.
///
/// The serde names are the storage names used in the persisted record
/// (`fullName`, `nim`, ...), so a key can be used directly in JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKey {
    FullName,
    #[serde(rename = "nim")]
    StudentId,
    Email,
    Program,
    Gender,
    BirthDate,
    Phone,
    Address,
}

/// Which UI event re-runs the live validator of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveTrigger {
    /// Every keystroke
    Input,
    /// A committed change (selection picked, date chosen)
    Change,
}

/// How a host should present the input for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Email,
    Date,
    Phone,
    TextArea,
    Select(&'static [&'static str]),
}

impl FieldKey {
    /// All fields in form order
    pub const ALL: [FieldKey; FIELD_COUNT] = [
        FieldKey::FullName,
        FieldKey::StudentId,
        FieldKey::Email,
        FieldKey::Program,
        FieldKey::Gender,
        FieldKey::BirthDate,
        FieldKey::Phone,
        FieldKey::Address,
    ];

    /// Storage / wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::FullName => "fullName",
            FieldKey::StudentId => "nim",
            FieldKey::Email => "email",
            FieldKey::Program => "program",
            FieldKey::Gender => "gender",
            FieldKey::BirthDate => "birthDate",
            FieldKey::Phone => "phone",
            FieldKey::Address => "address",
        }
    }

    /// Position in form order, stable for slot arrays
    pub fn index(&self) -> usize {
        match self {
            FieldKey::FullName => 0,
            FieldKey::StudentId => 1,
            FieldKey::Email => 2,
            FieldKey::Program => 3,
            FieldKey::Gender => 4,
            FieldKey::BirthDate => 5,
            FieldKey::Phone => 6,
            FieldKey::Address => 7,
        }
    }

    pub fn label(&self, locale: Locale) -> &'static str {
        messages::field_label(*self, locale)
    }

    pub fn trigger(&self) -> LiveTrigger {
        match self {
            FieldKey::Program | FieldKey::Gender | FieldKey::BirthDate => LiveTrigger::Change,
            _ => LiveTrigger::Input,
        }
    }

    pub fn input_kind(&self) -> InputKind {
        match self {
            FieldKey::FullName | FieldKey::StudentId => InputKind::Text,
            FieldKey::Email => InputKind::Email,
            FieldKey::Program => InputKind::Select(PROGRAM_OPTIONS),
            FieldKey::Gender => InputKind::Select(GENDER_OPTIONS),
            FieldKey::BirthDate => InputKind::Date,
            FieldKey::Phone => InputKind::Phone,
            FieldKey::Address => InputKind::TextArea,
        }
    }

    /// Fixed option set, for selection fields only
    pub fn options(&self) -> Option<&'static [&'static str]> {
        match self.input_kind() {
            InputKind::Select(options) => Some(options),
            _ => None,
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field `{0}`")]
pub struct UnknownField(pub String);

impl FromStr for FieldKey {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_form_order() {
        for (i, key) in FieldKey::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_parse_storage_names() {
        for key in FieldKey::ALL {
            assert_eq!(key.as_str().parse::<FieldKey>(), Ok(key));
        }
        assert_eq!(
            "studentId".parse::<FieldKey>(),
            Err(UnknownField("studentId".to_string()))
        );
    }

    #[test]
    fn test_serde_names_match_storage_names() {
        for key in FieldKey::ALL {
            let json = serde_json::to_string(&key).unwrap();
            assert_eq!(json, format!("\"{}\"", key.as_str()));
        }
    }

    #[test]
    fn test_selection_fields_have_options() {
        assert_eq!(FieldKey::Program.options(), Some(PROGRAM_OPTIONS));
        assert_eq!(FieldKey::Gender.options(), Some(GENDER_OPTIONS));
        assert_eq!(FieldKey::Email.options(), None);
    }

    #[test]
    fn test_live_triggers() {
        assert_eq!(FieldKey::FullName.trigger(), LiveTrigger::Input);
        assert_eq!(FieldKey::Phone.trigger(), LiveTrigger::Input);
        assert_eq!(FieldKey::BirthDate.trigger(), LiveTrigger::Change);
        assert_eq!(FieldKey::Gender.trigger(), LiveTrigger::Change);
    }
}
