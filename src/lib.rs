// PMB Registration - Core Library
// Exposes all modules for use in the CLI, the TUI, the web host, and tests

pub mod clock;
pub mod config;
pub mod fields;
pub mod form;
pub mod messages;
pub mod orchestrator;
pub mod payload;
pub mod render;
pub mod store;
pub mod validators;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{init_tracing, AppConfig, ConfigError, ConfigOverrides, DEFAULT_CONFIG_PATH};
pub use fields::{FieldKey, InputKind, LiveTrigger, UnknownField, FIELD_COUNT};
pub use form::{FieldSlot, FormPhase, RegistrationForm, StatusLine, SubmitOutcome};
pub use messages::{Locale, UnknownLocale};
pub use orchestrator::{validate_all, validate_field, FieldOutcome, FormInput, FormReport};
pub use payload::{PayloadError, RegistrationRecord};
pub use render::{
    escape_html, render_empty_html, render_summary_html, summary_rows, ResultView, SummaryRow,
};
pub use store::{
    KeyValueStore, MemoryStore, RegistrationStore, SqliteStore, StoreError, STORAGE_KEY,
};
pub use validators::{FieldCheck, ValidationKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
