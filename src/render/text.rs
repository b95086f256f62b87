//! Terminal projection of the view state.
//!
//! Each function renders one panel to a `String` (with `colored` styling) so
//! the CLI can print it and tests can inspect it.

use std::fmt::Write;

use colored::Colorize;

use crate::api::PatientRecord;
use crate::dashboard::booking::ERROR_LOADING_OPTIONS;
use crate::dashboard::calendar::{LOADING, NO_EVENING_SLOTS, NO_MORNING_SLOTS};
use crate::dashboard::patients::{FAILED_TO_LOAD_PATIENTS, LOADING_RECORDS};
use crate::dashboard::{
    BookingPanel, CalendarPanel, ChatPanel, PatientList, PatientsPanel, ReviewPanel, Role,
    SlotCard, SlotGrid, SlotOptions, ViewState,
};

use super::{or_dash, scalar_or_dash};

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "{}", title.bold().cyan());
    let _ = writeln!(out, "{}", "=".repeat(50));
}

/// Nav bar with the active tab highlighted.
pub fn tab_strip(state: &ViewState) -> String {
    state
        .tab_strip()
        .into_iter()
        .map(|t| {
            if t.active {
                format!("[{}]", t.tab.label()).bold().to_string()
            } else {
                t.tab.label().dimmed().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

pub fn patients(panel: &PatientsPanel) -> String {
    let mut out = String::new();
    header(&mut out, "Patients");

    match &panel.list {
        PatientList::Idle => {}
        PatientList::Loading => {
            let _ = writeln!(out, "{}", LOADING_RECORDS.dimmed());
        }
        PatientList::Failed => {
            let _ = writeln!(out, "{}", FAILED_TO_LOAD_PATIENTS.red());
        }
        PatientList::Loaded(list) => {
            for patient in list {
                let _ = writeln!(out, "  {}", patient.name.bold());
                let _ = writeln!(
                    out,
                    "    ID: {} | Age: {}",
                    patient.id,
                    scalar_or_dash(patient.age.as_ref())
                );
                let _ = writeln!(
                    out,
                    "    Last Visit: {}",
                    or_dash(patient.last_visit.as_deref())
                );
            }
        }
    }
    out
}

pub fn patient_detail(record: &PatientRecord) -> String {
    let mut out = String::new();
    header(&mut out, &record.name);
    let _ = writeln!(out, "  {} {}", "Age:       ".bold(), scalar_or_dash(record.age.as_ref()));
    let _ = writeln!(out, "  {} {}", "Last visit:".bold(), or_dash(record.last_visit.as_deref()));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", "--- History ---".dimmed());
    let _ = writeln!(out, "{}", or_dash(record.history.as_deref()));
    out
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

pub fn chat(panel: &ChatPanel) -> String {
    let mut out = String::new();
    for message in &panel.messages {
        let who = match message.role {
            Role::User => "you".green().bold(),
            Role::Ai if message.pending => "ai".dimmed(),
            Role::Ai => "ai".blue().bold(),
        };
        let _ = writeln!(out, "{who} | {}", message.text);
    }
    out
}

// ---------------------------------------------------------------------------
// Prescription / medicine
// ---------------------------------------------------------------------------

pub fn review(title: &str, panel: &ReviewPanel) -> String {
    let mut out = String::new();
    header(&mut out, title);
    let _ = writeln!(out, "{}", panel.output);
    out
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn slot_line(card: &SlotCard) -> String {
    let status = card.status_label();
    let status = match card.state {
        crate::api::SlotState::Available => status.green(),
        crate::api::SlotState::Booked => status.blue(),
        crate::api::SlotState::Blocked => status.red(),
        crate::api::SlotState::Unknown => status.normal(),
    };

    let mut line = format!("  {}  {:<10}", card.time.bold(), status);
    if let Some(patient) = &card.patient {
        let _ = write!(line, " {patient}");
    }
    if let Some(label) = card.action_label() {
        let _ = write!(line, "  {}", format!("[{label}]").dimmed());
    }
    line
}

fn partition(out: &mut String, title: &str, cards: &[SlotCard], empty: &str) {
    let _ = writeln!(out, "{}", title.bold());
    if cards.is_empty() {
        let _ = writeln!(out, "  {}", empty.dimmed());
    }
    for card in cards {
        let _ = writeln!(out, "{}", slot_line(card));
    }
}

pub fn slot_grid(panel: &CalendarPanel) -> String {
    let mut out = String::new();
    header(&mut out, &format!("Slots for {}", panel.date));

    match &panel.grid {
        SlotGrid::Idle => {}
        SlotGrid::Loading => {
            let _ = writeln!(out, "{LOADING}");
        }
        SlotGrid::Failed(message) => {
            let _ = writeln!(out, "{}", message.red());
        }
        SlotGrid::Ready {
            morning, evening, ..
        } => {
            partition(&mut out, "Morning", morning, NO_MORNING_SLOTS);
            partition(&mut out, "Evening", evening, NO_EVENING_SLOTS);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

pub fn booking(panel: &BookingPanel) -> String {
    let mut out = String::new();
    header(&mut out, &format!("Open slots for {}", panel.date));

    match &panel.options {
        SlotOptions::Open(slots) => {
            let _ = writeln!(out, "  {}", slots.join("  "));
        }
        SlotOptions::Failed => {
            let _ = writeln!(out, "{}", ERROR_LOADING_OPTIONS.red());
        }
        other => {
            let _ = writeln!(out, "{}", other.placeholder().unwrap_or_default().yellow());
        }
    }

    if !panel.events.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "Upcoming".bold());
        for event in &panel.events {
            let _ = writeln!(
                out,
                "  {}  {}",
                or_dash(event.start.as_deref()),
                or_dash(event.summary.as_deref())
            );
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
