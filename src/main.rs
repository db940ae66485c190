// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// Use library instead of local modules
use pmb_registration::{
    init_tracing, validate_field, AppConfig, Clock, ConfigOverrides, FieldKey, FormInput, Locale,
    RegistrationForm, RegistrationStore, SqliteStore, SubmitOutcome, SystemClock,
    DEFAULT_CONFIG_PATH,
};

#[derive(Parser)]
#[command(name = "pmb-registration")]
#[command(about = "Student registration form: validate, save and show the last submission")]
#[command(version)]
struct Cli {
    /// JSON config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// SQLite database override
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Message locale override (id, en)
    #[arg(long, global = true)]
    locale: Option<Locale>,

    /// Log filter override
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive terminal form (default)
    Tui,
    /// Submit a full form non-interactively
    Submit(SubmitArgs),
    /// Run the live check for a single field
    Validate {
        /// Field name (fullName, nim, email, program, gender, birthDate, phone, address)
        #[arg(long)]
        field: FieldKey,
        #[arg(long, default_value = "")]
        value: String,
    },
    /// Print the saved registration
    Show,
    /// Remove the saved registration
    Reset,
}

#[derive(Args)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    full_name: String,
    #[arg(long, default_value = "")]
    nim: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    program: String,
    #[arg(long, default_value = "")]
    gender: String,
    /// YYYY-MM-DD
    #[arg(long, default_value = "")]
    birth_date: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
}

impl From<SubmitArgs> for FormInput {
    fn from(args: SubmitArgs) -> Self {
        FormInput {
            full_name: args.full_name,
            student_id: args.nim,
            email: args.email,
            program: args.program,
            gender: args.gender,
            birth_date: args.birth_date,
            phone: args.phone,
            address: args.address,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(&cli.config)?.with_overrides(ConfigOverrides {
        database_path: cli.database,
        locale: cli.locale,
        server_addr: None,
        log_level: cli.log_level,
    });

    let command = cli.command.unwrap_or(Command::Tui);
    // log lines would tear the alternate screen; RUST_LOG can still turn them on
    let log_level = match command {
        Command::Tui => "off",
        _ => config.log_level.as_str(),
    };
    init_tracing(log_level);

    match command {
        Command::Tui => run_ui_mode(&config)?,
        Command::Submit(args) => run_submit(&config, args.into())?,
        Command::Validate { field, value } => run_validate(&config, field, &value),
        Command::Show => run_show(&config)?,
        Command::Reset => run_reset(&config)?,
    }

    Ok(())
}

fn open_form(config: &AppConfig) -> Result<RegistrationForm<SqliteStore>> {
    let backend = SqliteStore::open(&config.database_path)
        .with_context(|| format!("Failed to open database {:?}", config.database_path))?;
    let form = RegistrationForm::open(RegistrationStore::new(backend), config.locale)
        .context("Failed to load saved registration")?;
    Ok(form)
}

fn run_submit(config: &AppConfig, input: FormInput) -> Result<()> {
    let mut form = open_form(config)?;
    form.fill(input);

    match form.submit()? {
        SubmitOutcome::Accepted(_) => {
            println!("✓ {}", form.status_text());
            println!();
            print!("{}", form.view().render_text(config.locale));
        }
        SubmitOutcome::Rejected(report) => {
            println!("✗ {}", form.status_text());
            for outcome in report.errors() {
                println!(
                    "  {:<16} {}",
                    outcome.field.label(config.locale),
                    outcome.message.as_deref().unwrap_or_default()
                );
            }
            std::process::exit(1);
        }
    }

    Ok(())
}

fn run_validate(config: &AppConfig, field: FieldKey, value: &str) {
    let today = SystemClock.today();
    let outcome = validate_field(field, value, today, config.locale);

    match outcome.message {
        None => println!("✓ {}: {:?}", field.label(config.locale), outcome.normalized),
        Some(message) => {
            println!("✗ {}: {}", field.label(config.locale), message);
            std::process::exit(1);
        }
    }
}

fn run_show(config: &AppConfig) -> Result<()> {
    let form = open_form(config)?;

    println!("{}", form.storage_badge());
    println!();
    print!("{}", form.view().render_text(config.locale));
    if !form.has_stored_record() {
        println!();
    }

    Ok(())
}

fn run_reset(config: &AppConfig) -> Result<()> {
    let mut form = open_form(config)?;
    form.reset()?;

    println!("✓ {} ({})", form.status_text(), form.storage_badge());
    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(config: &AppConfig) -> Result<()> {
    let form = open_form(config)?;

    let mut app = ui::App::new(form);
    ui::run_ui(&mut app)?;

    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_config: &AppConfig) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use a subcommand: submit, validate, show, reset");
    std::process::exit(1);
}
