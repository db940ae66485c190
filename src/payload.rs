// 📦 Payload Builder - the persisted registration record
// A record can only be built from a fully valid report, and it reuses the
// normalized values the validators produced.

use crate::fields::FieldKey;
use crate::orchestrator::FormReport;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("cannot build a registration from a form with {invalid} invalid field(s)")]
    NotValidated { invalid: usize },
}

/// Normalized result of one successful submission.
///
/// Field names on the wire are fixed: `fullName, nim, email, program, gender,
/// birthDate, phone, address, submittedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRecord {
    full_name: String,
    #[serde(rename = "nim")]
    student_id: String,
    email: String,
    program: String,
    gender: String,
    birth_date: String,
    phone: String,
    address: String,
    #[serde(with = "iso_instant")]
    submitted_at: DateTime<Utc>,
}

impl RegistrationRecord {
    /// Build the record from a report that passed full validation.
    ///
    /// `submitted_at` is truncated to millisecond precision, which is what the
    /// stored ISO-8601 string keeps.
    pub fn from_report(report: &FormReport, submitted_at: DateTime<Utc>) -> Result<Self, PayloadError> {
        if !report.is_valid() {
            return Err(PayloadError::NotValidated {
                invalid: report.error_count(),
            });
        }

        let take = |key: FieldKey| report.normalized(key).to_string();

        Ok(RegistrationRecord {
            full_name: take(FieldKey::FullName),
            student_id: take(FieldKey::StudentId),
            email: take(FieldKey::Email),
            program: take(FieldKey::Program),
            gender: take(FieldKey::Gender),
            birth_date: take(FieldKey::BirthDate),
            phone: take(FieldKey::Phone),
            address: take(FieldKey::Address),
            submitted_at: submitted_at.trunc_subsecs(3),
        })
    }

    pub fn value(&self, key: FieldKey) -> &str {
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

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn birth_date(&self) -> &str {
        &self.birth_date
    }

    pub fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }

    /// `submittedAt` as stored
    pub fn submitted_at_iso(&self) -> String {
        self.submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// ISO-8601 instants with millisecond precision and a `Z` suffix
/// (`2026-10-18T05:30:00.000Z`).
mod iso_instant {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TESTS
// ============================================================================
