//! CLI command implementations for clinic-dash.
//!
//! Each command drives the same [`Dashboard`] controller the web page uses,
//! then prints the affected panel:
//! - `clinic-dash patients` / `patient <id>`: patient list and history
//! - `clinic-dash chat "question"`: one round-trip with the AI assistant
//! - `clinic-dash review` / `recommend`: prescription review, medicine advice
//! - `clinic-dash slots` / `toggle`: doctor availability for a day
//! - `clinic-dash open-slots` / `book` / `events`: appointment booking
//! - `clinic-dash health`: backend reachability, config, diagnostics
//! - `clinic-dash config show|init|set|reset`: configuration management

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::{Backend, ClinicClient, ToggleAction};
use crate::config::{self, schema::DashConfig};
use crate::dashboard::{Dashboard, PatientList, Tab};
use crate::diagnostics::Diagnostics;
use crate::render::text;
use crate::web;

/// Output format for listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

fn dashboard(cfg: &DashConfig) -> Dashboard<ClinicClient> {
    Dashboard::new(ClinicClient::from_config(&cfg.backend))
        .with_diagnostics(Diagnostics::from_config(&cfg.diagnostics))
}

/// Print queued alerts and open queued URLs.
fn flush<B: Backend>(dash: &mut Dashboard<B>) {
    for alert in dash.take_alerts() {
        println!("{} {}", "!".yellow().bold(), alert.yellow());
    }
    for url in dash.take_opened() {
        println!("{} {}", "→".green().bold(), url);
        let _ = web::open_browser(&url);
    }
}

// ---------------------------------------------------------------------------
// clinic-dash patients | patient <id>
// ---------------------------------------------------------------------------

pub fn run_patients(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.activate(Tab::Patients);

    match (format, &dash.state().patients.list) {
        (OutputFormat::Json, PatientList::Loaded(list)) => {
            println!("{}", serde_json::to_string_pretty(list)?);
        }
        _ => print!("{}", text::patients(&dash.state().patients)),
    }
    Ok(())
}

pub fn run_patient(id: &str) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.show_patient_details(id)
        .with_context(|| format!("failed to load history for patient {id}"))?;

    if let Some(record) = &dash.state().patients.modal.record {
        print!("{}", text::patient_detail(record));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// clinic-dash chat | review | recommend
// ---------------------------------------------------------------------------

pub fn run_chat(message: &str) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.set_chat_input(message);
    dash.send_message();
    print!("{}", text::chat(&dash.state().chat));
    flush(&mut dash);
    Ok(())
}

pub fn run_review(prescription: &str) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.set_prescription_text(prescription);
    dash.analyze_prescription();
    print!(
        "{}",
        text::review("Prescription Review", &dash.state().prescription)
    );
    flush(&mut dash);
    Ok(())
}

pub fn run_recommend(condition: &str, pdf: bool) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.set_condition(condition);
    dash.get_medicine_recommendations();
    print!(
        "{}",
        text::review("Medicine Recommendation", &dash.state().medicine)
    );

    if pdf && dash.state().medicine.download_enabled {
        dash.download_medicine_pdf();
    }
    flush(&mut dash);
    Ok(())
}

// ---------------------------------------------------------------------------
// clinic-dash slots | toggle
// ---------------------------------------------------------------------------

/// Show the slot grid for `date`, or for today when no date is given.
pub fn run_slots(date: Option<&str>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    match date {
        Some(date) => {
            dash.set_manage_date(date);
            dash.load_doc_slots();
        }
        None => dash.activate(Tab::Calendar),
    }

    match format {
        OutputFormat::Json => {
            let cards: Vec<_> = dash
                .state()
                .calendar
                .grid
                .cards()
                .into_iter()
                .map(|card| {
                    serde_json::json!({
                        "time": card.time,
                        "status": card.state.as_str(),
                        "patient": card.patient,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&cards)?);
        }
        OutputFormat::Table => print!("{}", text::slot_grid(&dash.state().calendar)),
    }
    Ok(())
}

pub fn run_toggle(date: &str, time: &str, action: &str) -> Result<()> {
    let action = ToggleAction::parse(action)
        .with_context(|| format!("unknown action `{action}` (expected block or unblock)"))?;

    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.toggle_slot(date, time, action);
    flush(&mut dash);

    if dash.state().calendar.date == date {
        print!("{}", text::slot_grid(&dash.state().calendar));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// clinic-dash open-slots | book | events
// ---------------------------------------------------------------------------

pub fn run_open_slots(date: &str) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.set_booking_date(date);
    dash.fetch_slots();
    print!("{}", text::booking(&dash.state().booking));
    Ok(())
}

pub fn run_book(date: &str, slot: &str) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.set_booking_date(date);
    dash.select_slot(slot);
    dash.book_slot();
    flush(&mut dash);
    print!("{}", text::booking(&dash.state().booking));
    Ok(())
}

pub fn run_events(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let mut dash = dashboard(&cfg);
    dash.fetch_events();

    let events = &dash.state().booking.events;
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(events)?),
        OutputFormat::Table => {
            println!("{}", "Upcoming Appointments".bold().cyan());
            println!("{}", "=".repeat(50));
            if events.is_empty() {
                println!("{}", "No upcoming appointments.".yellow());
            }
            for event in events {
                println!(
                    "  {:<25} {}",
                    event.start.as_deref().unwrap_or("-"),
                    event.summary.as_deref().unwrap_or("-")
                );
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// clinic-dash serve
// ---------------------------------------------------------------------------

pub fn run_serve(bind: Option<String>, no_browser: bool) -> Result<()> {
    let mut cfg = config::load();
    if let Some(bind) = bind {
        cfg.server.bind = bind;
    }
    if no_browser {
        cfg.server.open_browser = false;
    }
    web::serve(&cfg)
}

// ---------------------------------------------------------------------------
// clinic-dash health
// ---------------------------------------------------------------------------

pub fn run_health() -> Result<()> {
    println!("{}", "clinic-dash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();
    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.clinic-dash/config.toml found"
        } else {
            "not found (run `clinic-dash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".clinic-dash.toml found"
        } else {
            "none (optional)"
        },
    );
    if cfg.dashboard.initial_tab.parse::<Tab>().is_err() {
        print_health_item(
            "Initial tab",
            false,
            &format!("unknown tab `{}`", cfg.dashboard.initial_tab),
        );
    }

    // 1. Backend connectivity
    let client = ClinicClient::from_config(&cfg.backend);
    let backend_ok = client.is_reachable();
    let backend_detail = if backend_ok {
        format!("reachable at {}", client.base_url())
    } else {
        format!("not reachable at {} (is the backend running?)", client.base_url())
    };
    print_health_item("Backend", backend_ok, &backend_detail);

    // 2. Diagnostics log
    let diagnostics = Diagnostics::from_config(&cfg.diagnostics);
    match diagnostics.path() {
        None => print_health_item("Diagnostics", true, "disabled"),
        Some(path) if !path.exists() => {
            print_health_item("Diagnostics", true, "no failures recorded")
        }
        Some(path) => {
            let recent = diagnostics.read_recent(5);
            print_health_item(
                "Diagnostics",
                recent.is_empty(),
                &format!("{} recent failures in {}", recent.len(), path.display()),
            );
            for entry in &recent {
                println!(
                    "    {} {} {}",
                    entry.timestamp.dimmed(),
                    entry.operation.bold(),
                    entry.detail
                );
            }
        }
    }

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let icon = if ok { "✓".green() } else { "✗".red() };
    println!("  {icon} {:<16} {}", name.bold(), detail);
}

// ---------------------------------------------------------------------------
// clinic-dash config show | init | set | reset
// ---------------------------------------------------------------------------

pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective clinic-dash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    // Show source info
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source(global_exists, "~/.clinic-dash/config.toml");
    print_source(project_exists, ".clinic-dash.toml");
    println!(
        "  {} {}",
        "·".dimmed(),
        "CLINIC_DASH_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(exists: bool, name: &str) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!("  {}", "Edit the file to point at your clinic backend.".dimmed());
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}
