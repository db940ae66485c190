// 🖼️ Presentation Renderer - summary and empty views of the result area
// Pure projections of a record; nothing here mutates state.

use crate::fields::FieldKey;
use crate::messages::{self, Locale};
use crate::payload::RegistrationRecord;
use crate::validators::parse_birth_date;
use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};
use std::fmt::Write as _;

/// What the result area currently shows
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Summary(RegistrationRecord),
}

impl ResultView {
    pub fn record(&self) -> Option<&RegistrationRecord> {
        match self {
            ResultView::Empty => None,
            ResultView::Summary(record) => Some(record),
        }
    }

    pub fn render_html(&self, locale: Locale) -> String {
        match self {
            ResultView::Empty => render_empty_html(locale),
            ResultView::Summary(record) => render_summary_html(record, locale),
        }
    }

    pub fn render_text(&self, locale: Locale) -> String {
        match self {
            ResultView::Empty => messages::empty_placeholder(locale).to_string(),
            ResultView::Summary(record) => render_summary_text(record, locale),
        }
    }
}

/// One labeled line of the summary, value not yet escaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub field: FieldKey,
    pub label: &'static str,
    pub value: String,
}

pub fn summary_rows(record: &RegistrationRecord, locale: Locale) -> Vec<SummaryRow> {
    FieldKey::ALL
        .iter()
        .map(|&field| {
            let raw = record.value(field);
            let value = match field {
                FieldKey::BirthDate => format_calendar_date(raw, locale),
                _ => raw.to_string(),
            };
            SummaryRow {
                field,
                label: field.label(locale),
                value,
            }
        })
        .collect()
}

// ============================================================================
// DATES
// ============================================================================

/// `05 Januari 2000` / `05 January 2000`
pub fn format_date(date: NaiveDate, locale: Locale) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        messages::month_name(date.month(), locale),
        date.year()
    )
}

/// Localized date of a stored date string, `-` when it cannot be read
pub fn format_calendar_date(raw: &str, locale: Locale) -> String {
    parse_birth_date(raw)
        .map(|date| format_date(date, locale))
        .unwrap_or_else(|| "-".to_string())
}

/// Submission date in the host's local time zone
pub fn format_submitted_at(instant: DateTime<Utc>, locale: Locale) -> String {
    format_date(instant.with_timezone(&Local).date_naive(), locale)
}

// ============================================================================
// MARKUP
// ============================================================================

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_summary_html(record: &RegistrationRecord, locale: Locale) -> String {
    let mut html = String::new();

    html.push_str("<div class=\"result-card\" role=\"status\" aria-live=\"polite\">\n");
    html.push_str("  <div class=\"result-title\">\n");
    let _ = writeln!(
        html,
        "    <div><strong>{}</strong><div class=\"muted\">{}: {}</div></div>",
        escape_html(messages::summary_title(locale)),
        escape_html(messages::submitted_label(locale)),
        escape_html(&format_submitted_at(record.submitted_at(), locale)),
    );
    let _ = writeln!(
        html,
        "    <span class=\"badge\">{}</span>",
        escape_html(messages::last_saved_badge(locale))
    );
    html.push_str("  </div>\n  <div class=\"kv\">\n");

    for row in summary_rows(record, locale) {
        let _ = writeln!(
            html,
            "    <div class=\"kv-row\" data-field=\"{}\"><div class=\"k\">{}</div><div class=\"v\">{}</div></div>",
            row.field.as_str(),
            escape_html(row.label),
            escape_html(&row.value),
        );
    }

    html.push_str("  </div>\n</div>\n");
    html
}

pub fn render_empty_html(locale: Locale) -> String {
    format!(
        "<p class=\"result-empty\">{}</p>\n",
        escape_html(messages::empty_placeholder(locale))
    )
}

/// Plain-text summary for terminals
pub fn render_summary_text(record: &RegistrationRecord, locale: Locale) -> String {
    let rows = summary_rows(record, locale);
    let width = rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0);

    let mut text = format!(
        "{}\n{}: {}\n\n",
        messages::summary_title(locale),
        messages::submitted_label(locale),
        format_submitted_at(record.submitted_at(), locale)
    );
    for row in rows {
        let _ = writeln!(text, "{:<width$}  {}", row.label, row.value, width = width);
    }
    text
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::{today, valid_input};
    use crate::orchestrator::validate_all;
    use crate::payload::tests::{sample_record, submitted_at};

    fn hostile_record() -> RegistrationRecord {
        let mut input = valid_input();
        input.full_name = "<script>alert('x')</script>".to_string();
        input.address = "Jl. \"Kenanga\" & <b>Sons</b>".to_string();
        input.program = "<i>Teknik</i>".to_string();
        input.gender = "Perempuan\" onclick=\"x".to_string();
        let report = validate_all(&input, today(), Locale::English);
        RegistrationRecord::from_report(&report, submitted_at()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#039;Jerry&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_format_dates() {
        assert_eq!(format_calendar_date("2000-01-05", Locale::Indonesian), "05 Januari 2000");
        assert_eq!(format_calendar_date("2004-05-17", Locale::English), "17 May 2004");
        assert_eq!(format_calendar_date("not a date", Locale::English), "-");
    }

    #[test]
    fn test_summary_rows_cover_every_field() {
        let rows = summary_rows(&sample_record(), Locale::Indonesian);

        assert_eq!(rows.len(), FieldKey::ALL.len());
        assert_eq!(rows[0].label, "Nama Lengkap");
        assert_eq!(rows[0].value, "Siti Nur Aisyah");
        assert_eq!(rows[5].field, FieldKey::BirthDate);
        assert_eq!(rows[5].value, "17 Mei 2004");
    }

    #[test]
    fn test_summary_html_escapes_user_text() {
        let html = render_summary_html(&hostile_record(), Locale::English);

        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<i>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
        assert!(html.contains("Jl. &quot;Kenanga&quot; &amp; &lt;b&gt;Sons&lt;/b&gt;"));
        assert!(html.contains("&lt;i&gt;Teknik&lt;/i&gt;"));
        assert!(!html.contains("\" onclick"));
        assert!(html.contains("Perempuan&quot; onclick=&quot;x"));
    }

    #[test]
    fn test_summary_html_lists_all_values() {
        let record = sample_record();
        let html = render_summary_html(&record, Locale::Indonesian);

        for row in summary_rows(&record, Locale::Indonesian) {
            assert!(html.contains(&format!("data-field=\"{}\"", row.field.as_str())));
            assert!(html.contains(&escape_html(&row.value)), "{} not shown", row.field);
        }
        assert!(html.contains("17 Mei 2004"));
        assert!(html.contains("Pendaftaran Berhasil"));
    }

    #[test]
    fn test_empty_view() {
        let view = ResultView::Empty;
        assert_eq!(view.record(), None);
        assert!(view
            .render_html(Locale::English)
            .contains("No registration data yet"));
    }

    #[test]
    fn test_text_summary() {
        let text = ResultView::Summary(sample_record()).render_text(Locale::English);
        assert!(text.starts_with("Registration Successful\n"));
        assert!(text.contains("Student ID     2025101234"));
    }
}
