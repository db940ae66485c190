// PMB Registration - Web Server
// Serves the form page and a JSON API over the same single-slot store

use anyhow::{Context, Result};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use clap::Parser;
use pmb_registration::{
    escape_html, init_tracing, AppConfig, ConfigOverrides, FieldKey, FormInput,
    FormReport, InputKind, Locale, RegistrationForm, RegistrationRecord, RegistrationStore,
    SqliteStore, StoreError, SubmitOutcome, UnknownField, DEFAULT_CONFIG_PATH,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pmb-server")]
#[command(about = "Local web host for the registration form")]
struct Args {
    /// JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// SQLite database override
    #[arg(long)]
    database: Option<PathBuf>,

    /// Bind address override
    #[arg(long)]
    addr: Option<String>,

    /// Message locale override (id, en)
    #[arg(long)]
    locale: Option<Locale>,

    /// Log filter override
    #[arg(long)]
    log_level: Option<String>,
}

/// Shared application state. Every request goes through the one form, so
/// validate → persist → render never interleaves with another event.
#[derive(Clone)]
struct AppState {
    form: Arc<Mutex<RegistrationForm<SqliteStore>>>,
}

impl AppState {
    fn form(&self) -> Result<MutexGuard<'_, RegistrationForm<SqliteStore>>, ApiError> {
        self.form
            .lock()
            .map_err(|_| ApiError::internal("form state is poisoned"))
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
    fn failed(data: T, error: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            error: Some(error.into()),
        }
    }
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn internal(message: impl Into<String>) -> Self {
        ApiError {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        error!(error = %err, "storage failure");
        ApiError::internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse {
            success: false,
            data: (),
            error: Some(self.message),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Deserialize)]
struct FieldValue {
    #[serde(default)]
    value: String,
}

/// Live validation response
#[derive(Serialize)]
struct FieldFeedback {
    field: FieldKey,
    invalid: bool,
    message: String,
}

/// Submit response
#[derive(Serialize)]
struct SubmitResponse {
    status: &'static str,
    report: Option<FormReport>,
    record: Option<RegistrationRecord>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/registration - Stored record, or null
async fn get_registration(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let form = state.form()?;
    let record = form.store().load()?;
    Ok(Json(ApiResponse::ok(record)))
}

/// DELETE /api/registration - Reset form and storage
async fn delete_registration(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let mut form = state.form()?;
    form.reset()?;
    Ok(Json(ApiResponse::ok(form.status_text())))
}

/// POST /api/validate/:field - Live check of one field
async fn validate_one(
    State(state): State<AppState>,
    Path(field): Path<String>,
    Json(body): Json<FieldValue>,
) -> Result<impl IntoResponse, ApiError> {
    let key: FieldKey = field.parse().map_err(|err: UnknownField| ApiError {
        status: StatusCode::NOT_FOUND,
        message: err.to_string(),
    })?;

    let mut form = state.form()?;
    let slot = form.change(key, body.value);

    Ok(Json(ApiResponse::ok(FieldFeedback {
        field: key,
        invalid: slot.invalid,
        message: slot.message.clone(),
    })))
}

/// POST /api/submit - Full submit from JSON input
async fn submit_json(
    State(state): State<AppState>,
    Json(input): Json<FormInput>,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = state.form()?;
    form.fill(input);

    let outcome = form.submit()?;
    let (code, body) = submit_envelope(outcome, form.status_text());
    Ok((code, Json(body)))
}

/// Accepted submits are 200 with the record; rejected ones are 422 with the
/// report and a failed envelope
fn submit_envelope(
    outcome: SubmitOutcome,
    status: &'static str,
) -> (StatusCode, ApiResponse<SubmitResponse>) {
    match outcome {
        SubmitOutcome::Accepted(record) => (
            StatusCode::OK,
            ApiResponse::ok(SubmitResponse {
                status,
                report: None,
                record: Some(record),
            }),
        ),
        SubmitOutcome::Rejected(report) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::failed(
                SubmitResponse {
                    status,
                    report: Some(report),
                    record: None,
                },
                status,
            ),
        ),
    }
}

// ============================================================================
// Page Handlers
// ============================================================================

/// GET / - Form page
async fn serve_index(State(state): State<AppState>) -> Result<Html<String>, ApiError> {
    let form = state.form()?;
    Ok(Html(render_page(&form)))
}

/// POST /submit - Posted form, page re-rendered with slots and result
async fn submit_page(
    State(state): State<AppState>,
    Form(input): Form<FormInput>,
) -> Result<Html<String>, ApiError> {
    let mut form = state.form()?;
    form.fill(input);
    form.submit()?;
    Ok(Html(render_page(&form)))
}

/// POST /reset - Clear everything, back to the empty page
async fn reset_page(State(state): State<AppState>) -> Result<Redirect, ApiError> {
    state.form()?.reset()?;
    Ok(Redirect::to("/"))
}

fn render_page(form: &RegistrationForm<SqliteStore>) -> String {
    let locale = form.locale();
    let mut fields = String::new();

    for key in FieldKey::ALL {
        let slot = form.slot(key);
        let name = key.as_str();
        let value = escape_html(form.value(key));
        let class = if slot.invalid { "field invalid" } else { "field" };

        let _ = writeln!(fields, "<div class=\"{class}\" data-field=\"{name}\">");
        let _ = writeln!(
            fields,
            "  <label for=\"{name}\">{}</label>",
            escape_html(key.label(locale))
        );

        let control = match key.input_kind() {
            InputKind::Select(options) => {
                let mut select = format!("<select id=\"{name}\" name=\"{name}\">\n    <option value=\"\">—</option>\n");
                for option in options {
                    let selected = if *option == form.value(key) { " selected" } else { "" };
                    let _ = writeln!(
                        select,
                        "    <option value=\"{0}\"{selected}>{0}</option>",
                        escape_html(option)
                    );
                }
                select.push_str("  </select>");
                select
            }
            InputKind::TextArea => {
                format!("<textarea id=\"{name}\" name=\"{name}\" rows=\"3\">{value}</textarea>")
            }
            InputKind::Date => format!("<input id=\"{name}\" name=\"{name}\" type=\"date\" value=\"{value}\">"),
            InputKind::Email => format!("<input id=\"{name}\" name=\"{name}\" type=\"email\" value=\"{value}\">"),
            InputKind::Phone => format!("<input id=\"{name}\" name=\"{name}\" type=\"tel\" value=\"{value}\">"),
            InputKind::Text => format!("<input id=\"{name}\" name=\"{name}\" type=\"text\" value=\"{value}\">"),
        };
        let _ = writeln!(fields, "  {control}");
        let _ = writeln!(
            fields,
            "  <small class=\"error\" id=\"err-{name}\">{}</small>\n</div>",
            escape_html(&slot.message)
        );
    }

    format!(
        r#"<!doctype html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<title>PMB Registration</title>
<style>
body {{ font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; display: grid; grid-template-columns: 1fr 1fr; gap: 2rem; }}
.field {{ margin-bottom: .8rem; display: flex; flex-direction: column; }}
.field.invalid input, .field.invalid select, .field.invalid textarea {{ border-color: #ff6a6a; }}
.error {{ color: #d33; min-height: 1em; }}
.kv-row {{ display: flex; gap: 1rem; }} .k {{ width: 9rem; color: #666; }}
</style>
</head>
<body>
<form id="registrationForm" method="post" action="/submit" novalidate>
<p><span id="formStatus">{status}</span> · <span id="storageStatus">{badge}</span></p>
{fields}<button type="submit">Submit</button>
<button type="submit" formaction="/reset">Reset</button>
</form>
<section id="resultArea">
{result}</section>
<script>
document.querySelectorAll("[data-field]").forEach(function (box) {{
  var field = box.dataset.field;
  var input = box.querySelector("input, select, textarea");
  if (!input) return;
  var check = function () {{
    fetch("/api/validate/" + field, {{
      method: "POST",
      headers: {{ "Content-Type": "application/json" }},
      body: JSON.stringify({{ value: input.value }})
    }}).then(function (r) {{ return r.json(); }}).then(function (res) {{
      box.classList.toggle("invalid", res.data.invalid);
      document.getElementById("err-" + field).textContent = res.data.message;
    }});
  }};
  var live = input.tagName === "SELECT" || input.type === "date" ? "change" : "input";
  input.addEventListener(live, check);
  input.addEventListener("blur", check);
}});
</script>
</body>
</html>
"#,
        lang = locale.code(),
        status = escape_html(form.status_text()),
        badge = escape_html(form.storage_badge()),
        fields = fields,
        result = form.result_html(),
    )
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = AppConfig::load(&args.config)?.with_overrides(ConfigOverrides {
        database_path: args.database,
        locale: args.locale,
        server_addr: args.addr,
        log_level: args.log_level,
    });
    init_tracing(&config.log_level);

    let backend = SqliteStore::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    let form = RegistrationForm::open(RegistrationStore::new(backend), config.locale)
        .context("Failed to load saved registration")?;
    info!(path = ?config.database_path, restored = form.has_stored_record(), "database opened");

    // Create shared state
    let state = AppState {
        form: Arc::new(Mutex::new(form)),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/registration", get(get_registration).delete(delete_registration))
        .route("/validate/:field", post(validate_one))
        .route("/submit", post(submit_json))
        .with_state(state.clone());

    // Build main router
    let app = Router::new()
        .route("/", get(serve_index))
        .route("/submit", post(submit_page))
        .route("/reset", post(reset_page))
        .with_state(state)
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.server_addr))?;

    info!(addr = %config.server_addr, "server running");
    axum::serve(listener, app).await.context("Server stopped unexpectedly")?;

    Ok(())
}
