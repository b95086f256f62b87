use anyhow::Result;
use clap::{Parser, Subcommand};

use clinic_dash::cli;

#[derive(Debug, Parser)]
#[command(name = "clinic-dash")]
#[command(about = "Clinic dashboard: patients, AI assistant, prescriptions and scheduling")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the dashboard page locally and open it in the browser
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<String>,
        /// Do not open the browser on start
        #[arg(long)]
        no_browser: bool,
    },
    /// List all patients
    Patients {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one patient's history
    Patient {
        /// Patient id
        id: String,
    },
    /// Ask the AI assistant a question
    Chat {
        #[arg(trailing_var_arg = true, required = true)]
        message: Vec<String>,
    },
    /// Review a prescription for interactions and safety issues
    Review {
        #[arg(trailing_var_arg = true, required = true)]
        prescription: Vec<String>,
    },
    /// Get medicine recommendations for a condition
    Recommend {
        /// Also generate the PDF report and open it
        #[arg(long)]
        pdf: bool,
        #[arg(trailing_var_arg = true, required = true)]
        condition: Vec<String>,
    },
    /// Show the doctor's slots for a day (default: today, UTC)
    Slots {
        /// Date as YYYY-MM-DD
        date: Option<String>,
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Block or unblock a slot
    Toggle {
        /// Date as YYYY-MM-DD
        date: String,
        /// Slot time as HH:MM
        time: String,
        /// block or unblock
        action: String,
    },
    /// List bookable slots for a day
    OpenSlots {
        /// Date as YYYY-MM-DD
        date: String,
    },
    /// Book an appointment
    Book {
        /// Date as YYYY-MM-DD
        date: String,
        /// Slot time as HH:MM
        slot: String,
    },
    /// List upcoming appointments
    Events {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check backend reachability, config files and recent failures
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Print the effective configuration and its sources
    Show,
    /// Write the default config to ~/.clinic-dash/config.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Set a dotted key, e.g. `backend.url http://10.0.0.5:5000`
    Set { key: String, value: String },
    /// Restore the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Serve { bind, no_browser } => cli::run_serve(bind, no_browser),
        Commands::Patients { format } => {
            cli::run_patients(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Patient { id } => cli::run_patient(&id),
        Commands::Chat { message } => cli::run_chat(&message.join(" ")),
        Commands::Review { prescription } => cli::run_review(&prescription.join(" ")),
        Commands::Recommend { pdf, condition } => cli::run_recommend(&condition.join(" "), pdf),
        Commands::Slots { date, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_slots(date.as_deref(), fmt)
        }
        Commands::Toggle { date, time, action } => cli::run_toggle(&date, &time, &action),
        Commands::OpenSlots { date } => cli::run_open_slots(&date),
        Commands::Book { date, slot } => cli::run_book(&date, &slot),
        Commands::Events { format } => {
            cli::run_events(cli::OutputFormat::from_str_opt(Some(&format)))
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
