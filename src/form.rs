// 🧾 Registration Form - state machine and side effects
// The functional core (validators, orchestrator, payload, renderer) is driven
// from here; this is the only place that touches the store.

use crate::clock::{Clock, SystemClock};
use crate::fields::{FieldKey, LiveTrigger, FIELD_COUNT};
use crate::messages::{self, Locale};
use crate::orchestrator::{self, FieldOutcome, FormInput, FormReport};
use crate::payload::{PayloadError, RegistrationRecord};
use crate::render::ResultView;
use crate::store::{KeyValueStore, RegistrationStore, StoreError};
use serde::Serialize;
use tracing::{debug, info};

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormPhase {
    /// No field touched since start or reset
    Pristine,
    /// Live validation active
    Editing,
    /// Last submit was accepted and persisted
    Submitted,
}

/// Overall submit-status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StatusLine {
    NotSubmitted,
    CheckInput,
    Sent,
    /// A record from an earlier session was loaded on start
    Restored,
}

/// Error display slot of one field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldSlot {
    pub invalid: bool,
    pub message: String,
}

impl FieldSlot {
    fn apply(&mut self, outcome: &FieldOutcome) {
        self.invalid = !outcome.is_valid();
        self.message = outcome.message.clone().unwrap_or_default();
    }

    fn clear(&mut self) {
        self.invalid = false;
        self.message.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted(RegistrationRecord),
    Rejected(FormReport),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted(_))
    }
}

// ============================================================================
// FORM
// ============================================================================

pub struct RegistrationForm<S, C = SystemClock> {
    input: FormInput,
    slots: [FieldSlot; FIELD_COUNT],
    phase: FormPhase,
    status: StatusLine,
    view: ResultView,
    has_stored: bool,
    store: RegistrationStore<S>,
    clock: C,
    locale: Locale,
}

impl<S: KeyValueStore> RegistrationForm<S, SystemClock> {
    pub fn open(store: RegistrationStore<S>, locale: Locale) -> Result<Self, StoreError> {
        Self::with_clock(store, SystemClock, locale)
    }
}

impl<S: KeyValueStore, C: Clock> RegistrationForm<S, C> {
    /// Start a session. A previously saved record is rendered right away.
    pub fn with_clock(store: RegistrationStore<S>, clock: C, locale: Locale) -> Result<Self, StoreError> {
        let saved = store.load()?;

        let mut form = RegistrationForm {
            input: FormInput::default(),
            slots: Default::default(),
            phase: FormPhase::Pristine,
            status: StatusLine::NotSubmitted,
            view: ResultView::Empty,
            has_stored: false,
            store,
            clock,
            locale,
        };

        if let Some(record) = saved {
            info!(nim = record.student_id(), "restored last registration");
            form.view = ResultView::Summary(record);
            form.status = StatusLine::Restored;
            form.has_stored = true;
        }

        Ok(form)
    }

    // ------------------------------------------------------------------------
    // Input events
    // ------------------------------------------------------------------------

    /// Keystroke in a field. Only fields with an input trigger are re-validated.
    pub fn edit(&mut self, key: FieldKey, value: impl Into<String>) -> &FieldSlot {
        self.input.set(key, value);
        self.touch();
        if key.trigger() == LiveTrigger::Input {
            self.revalidate(key);
        }
        &self.slots[key.index()]
    }

    /// Committed change (selection, date picked)
    pub fn change(&mut self, key: FieldKey, value: impl Into<String>) -> &FieldSlot {
        self.input.set(key, value);
        self.touch();
        self.revalidate(key)
    }

    /// Focus left the field
    pub fn blur(&mut self, key: FieldKey) -> &FieldSlot {
        self.touch();
        self.revalidate(key)
    }

    /// Replace every raw value at once, as a posted form does. Slots are left
    /// untouched until the next validation.
    pub fn fill(&mut self, input: FormInput) {
        self.input = input;
        self.touch();
    }

    fn touch(&mut self) {
        if self.phase != FormPhase::Editing {
            self.phase = FormPhase::Editing;
            self.status = StatusLine::NotSubmitted;
        }
    }

    fn revalidate(&mut self, key: FieldKey) -> &FieldSlot {
        let outcome = orchestrator::validate_field(
            key,
            self.input.get(key),
            self.clock.today(),
            self.locale,
        );
        debug!(field = key.as_str(), valid = outcome.is_valid(), "live validation");

        let slot = &mut self.slots[key.index()];
        slot.apply(&outcome);
        slot
    }

    // ------------------------------------------------------------------------
    // Submit / reset
    // ------------------------------------------------------------------------

    /// Validate everything; on success build, persist and render the record
    pub fn submit(&mut self) -> Result<SubmitOutcome, StoreError> {
        let report = orchestrator::validate_all(&self.input, self.clock.today(), self.locale);
        for outcome in report.outcomes() {
            self.slots[outcome.field.index()].apply(outcome);
        }

        let record = match RegistrationRecord::from_report(&report, self.clock.now()) {
            Ok(record) => record,
            Err(PayloadError::NotValidated { invalid }) => {
                debug!(invalid, "submit rejected");
                self.phase = FormPhase::Editing;
                self.status = StatusLine::CheckInput;
                return Ok(SubmitOutcome::Rejected(report));
            }
        };

        self.store.save(&record)?;
        info!(nim = record.student_id(), "registration submitted");

        self.view = ResultView::Summary(record.clone());
        self.has_stored = true;
        self.phase = FormPhase::Submitted;
        self.status = StatusLine::Sent;

        Ok(SubmitOutcome::Accepted(record))
    }

    /// Clear fields, slots and storage; back to a pristine form
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.store.clear()?;
        info!("registration reset");

        self.input.clear();
        self.slots.iter_mut().for_each(FieldSlot::clear);
        self.view = ResultView::Empty;
        self.has_stored = false;
        self.phase = FormPhase::Pristine;
        self.status = StatusLine::NotSubmitted;

        Ok(())
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn value(&self, key: FieldKey) -> &str {
        self.input.get(key)
    }

    pub fn slot(&self, key: FieldKey) -> &FieldSlot {
        &self.slots[key.index()]
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn status(&self) -> StatusLine {
        self.status
    }

    pub fn status_text(&self) -> &'static str {
        messages::status_text(self.status, self.locale)
    }

    pub fn storage_badge(&self) -> &'static str {
        messages::storage_badge(self.has_stored, self.locale)
    }

    pub fn has_stored_record(&self) -> bool {
        self.has_stored
    }

    pub fn view(&self) -> &ResultView {
        &self.view
    }

    pub fn result_html(&self) -> String {
        self.view.render_html(self.locale)
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Switch locale; visible messages are re-rendered for invalid slots
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        for key in FieldKey::ALL {
            if self.slots[key.index()].invalid {
                self.revalidate(key);
            }
        }
    }

    pub fn store(&self) -> &RegistrationStore<S> {
        &self.store
    }
}

// ============================================================================
// TESTS
// ============================================================================
