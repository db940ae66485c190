// 📐 Form Validation Orchestrator
// Runs every field validator over the current input and aggregates the verdict.

use crate::fields::{FieldKey, FIELD_COUNT};
use crate::messages::{self, Locale};
use crate::validators::{self, ValidationKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// FORM INPUT
// ============================================================================

/// Raw values exactly as the form-input collaborator supplies them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormInput {
    pub full_name: String,
    #[serde(rename = "nim")]
    pub student_id: String,
    pub email: String,
    pub program: String,
    pub gender: String,
    pub birth_date: String,
    pub phone: String,
    pub address: String,
}

impl FormInput {
    pub fn get(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::FullName => &self.full_name,
            FieldKey::StudentId => &self.student_id,
            FieldKey::Email => &self.email,
            FieldKey::Program => &self.program,
            FieldKey::Gender => &self.gender,
            FieldKey::BirthDate => &self.birth_date,
            FieldKey::Phone => &self.phone,
            FieldKey::Address => &self.address,
        }
    }

    pub fn get_mut(&mut self, key: FieldKey) -> &mut String {
        match key {
            FieldKey::FullName => &mut self.full_name,
            FieldKey::StudentId => &mut self.student_id,
            FieldKey::Email => &mut self.email,
            FieldKey::Program => &mut self.program,
            FieldKey::Gender => &mut self.gender,
            FieldKey::BirthDate => &mut self.birth_date,
            FieldKey::Phone => &mut self.phone,
            FieldKey::Address => &mut self.address,
        }
    }

    pub fn set(&mut self, key: FieldKey, value: impl Into<String>) {
        *self.get_mut(key) = value.into();
    }

    pub fn clear(&mut self) {
        *self = FormInput::default();
    }
}

// ============================================================================
// OUTCOMES
// ============================================================================

/// Per-field verdict, carrying everything a display slot needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    pub field: FieldKey,
    pub raw: String,
    pub normalized: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ValidationKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldOutcome {
    pub fn is_valid(&self) -> bool {
        self.kind.is_none()
    }
}

/// Result of a full-form check. Outcomes are kept in form order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    valid: bool,
    outcomes: Vec<FieldOutcome>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn outcome(&self, key: FieldKey) -> &FieldOutcome {
        &self.outcomes[key.index()]
    }

    pub fn outcomes(&self) -> &[FieldOutcome] {
        &self.outcomes
    }

    /// Normalized value a validator produced for `key`
    pub fn normalized(&self, key: FieldKey) -> &str {
        &self.outcome(key).normalized
    }

    pub fn errors(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.outcomes.iter().filter(|o| !o.is_valid())
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

// ============================================================================
// ORCHESTRATION
// ============================================================================

/// Live-feedback variant: re-run only the validator for `key`
pub fn validate_field(key: FieldKey, raw: &str, today: NaiveDate, locale: Locale) -> FieldOutcome {
    let check = validators::validate(key, raw, today);

    FieldOutcome {
        field: key,
        raw: raw.to_string(),
        normalized: check.normalized,
        kind: check.failure,
        message: check
            .failure
            .map(|kind| messages::validation_message(key, kind, locale).to_string()),
    }
}

/// Full-form check used on submit. Every validator runs, regardless of
/// earlier failures, so all slots can be updated at once.
pub fn validate_all(input: &FormInput, today: NaiveDate, locale: Locale) -> FormReport {
    let outcomes: Vec<FieldOutcome> = FieldKey::ALL
        .iter()
        .map(|&key| validate_field(key, input.get(key), today, locale))
        .collect();
    debug_assert_eq!(outcomes.len(), FIELD_COUNT);

    FormReport {
        valid: outcomes.iter().all(FieldOutcome::is_valid),
        outcomes,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    pub(crate) fn valid_input() -> FormInput {
        FormInput {
            full_name: "  Siti   Nur Aisyah ".to_string(),
            student_id: " 2025101234 ".to_string(),
            email: "siti.aisyah@kampus.ac.id".to_string(),
            program: "Teknik Informatika".to_string(),
            gender: "Perempuan".to_string(),
            birth_date: "2004-05-17".to_string(),
            phone: " 081234567890 ".to_string(),
            address: "Jl. Melati   No. 12,\nBandung".to_string(),
        }
    }

    #[test]
    fn test_validate_all_valid() {
        let report = validate_all(&valid_input(), today(), Locale::Indonesian);

        assert!(report.is_valid());
        assert_eq!(report.error_count(), 0);
        assert_eq!(report.outcomes().len(), FIELD_COUNT);
        assert_eq!(report.normalized(FieldKey::FullName), "Siti Nur Aisyah");
        assert_eq!(report.normalized(FieldKey::Address), "Jl. Melati No. 12, Bandung");
    }

    #[test]
    fn test_validate_all_reports_every_failure() {
        let mut input = valid_input();
        input.student_id = "12345".to_string();
        input.email = "a@b.c".to_string();
        input.gender = String::new();

        let report = validate_all(&input, today(), Locale::English);
        assert!(!report.is_valid());

        let failed: Vec<(FieldKey, Option<ValidationKind>)> =
            report.errors().map(|o| (o.field, o.kind)).collect();
        assert_eq!(
            failed,
            vec![
                (FieldKey::StudentId, Some(ValidationKind::BadLength)),
                (FieldKey::Email, Some(ValidationKind::BadFormat)),
                (FieldKey::Gender, Some(ValidationKind::Required)),
            ]
        );
        assert_eq!(
            report.outcome(FieldKey::Gender).message.as_deref(),
            Some("Please select a gender.")
        );
    }

    #[test]
    fn test_empty_form_fails_every_field() {
        let report = validate_all(&FormInput::default(), today(), Locale::Indonesian);
        assert_eq!(report.error_count(), FIELD_COUNT);
    }

    #[test]
    fn test_validate_field_is_idempotent() {
        let first = validate_field(FieldKey::Email, "a@b.c", today(), Locale::Indonesian);
        let second = validate_field(FieldKey::Email, "a@b.c", today(), Locale::Indonesian);
        assert_eq!(first, second);
        assert_eq!(first.message.as_deref(), Some("Format email tidak valid."));
    }

    #[test]
    fn test_valid_outcome_has_no_message() {
        let outcome = validate_field(FieldKey::Phone, "081234567890", today(), Locale::English);
        assert!(outcome.is_valid());
        assert_eq!(outcome.message, None);
    }

    #[test]
    fn test_form_input_deserializes_storage_names() {
        let input: FormInput =
            serde_json::from_str(r#"{"fullName":"Budi","nim":"1234567890"}"#).unwrap();
        assert_eq!(input.get(FieldKey::FullName), "Budi");
        assert_eq!(input.get(FieldKey::StudentId), "1234567890");
        assert_eq!(input.get(FieldKey::Email), "");
    }
}
