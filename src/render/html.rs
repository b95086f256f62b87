//! HTML projection of the view state, served by the local dashboard.
//!
//! The page is plain server-rendered HTML: every control is a form posting
//! to one of the routes in [`crate::web`], which applies the action to the
//! controller and redirects back to `/`. No script, no external assets.

use std::fmt::Write;

use crate::api::SlotState;
use crate::dashboard::booking::NO_SLOTS_AVAILABLE;
use crate::dashboard::calendar::{LOADING, NO_EVENING_SLOTS, NO_MORNING_SLOTS};
use crate::dashboard::patients::{FAILED_TO_LOAD_PATIENTS, LOADING_RECORDS};
use crate::dashboard::{
    BookingPanel, CalendarPanel, ChatPanel, PatientList, PatientsPanel, ReviewPanel, Role,
    SlotCard, SlotGrid, SlotOptions, Tab, ViewState,
};

use super::{or_dash, scalar_or_dash};

const STYLESHEET: &str = r#"
:root {
  --bg: #0d1117;
  --surface: #161b22;
  --border: #30363d;
  --text: #e6edf3;
  --text-muted: #8b949e;
  --accent: #58a6ff;
  --green: #3fb950;
  --yellow: #d29922;
  --red: #f85149;
  --radius: 8px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; line-height: 1.5; }
header { display: flex; gap: 8px; padding: 12px 24px; border-bottom: 1px solid var(--border); background: var(--surface); }
main { padding: 24px; max-width: 1100px; margin: 0 auto; }
button, input, select, textarea { font: inherit; color: var(--text); background: var(--bg); border: 1px solid var(--border); border-radius: var(--radius); padding: 6px 10px; }
button { cursor: pointer; }
button:disabled { opacity: 0.5; cursor: default; }
.nav-btn.active { border-color: var(--accent); color: var(--accent); }
.tab-content { display: none; }
.tab-content.active { display: block; }
.alert { border: 1px solid var(--yellow); color: var(--yellow); border-radius: var(--radius); padding: 8px 12px; margin-bottom: 12px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 12px; margin-bottom: 8px; }
.muted { color: var(--text-muted); }
.error { color: var(--red); }
.chat-box { display: flex; flex-direction: column; gap: 6px; margin-bottom: 12px; }
.message.user { align-self: flex-end; color: var(--green); }
.message.ai { align-self: flex-start; }
.message.pending { color: var(--text-muted); font-style: italic; }
.output { white-space: pre-wrap; margin-top: 12px; }
.slots { display: grid; grid-template-columns: repeat(auto-fill, minmax(160px, 1fr)); gap: 8px; margin-bottom: 16px; }
.slot.available { border-color: var(--green); }
.slot.booked { border-color: var(--accent); }
.slot.blocked { border-color: var(--red); }
.modal { position: fixed; inset: 0; background: rgba(0, 0, 0, 0.6); display: flex; align-items: center; justify-content: center; }
.modal-backdrop { position: absolute; inset: 0; margin: 0; }
.modal-backdrop button { width: 100%; height: 100%; padding: 0; border: 0; background: transparent; cursor: default; }
.modal-content { position: relative; background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 24px; min-width: 360px; max-width: 640px; }
"#;

/// Escape text for element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn active_class(active: bool) -> &'static str {
    if active { " active" } else { "" }
}

fn disabled_attr(disabled: bool) -> &'static str {
    if disabled { " disabled" } else { "" }
}

/// The full dashboard page, including pending alerts and opened links.
pub fn page(state: &ViewState) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>Clinic Dashboard</title>\n<style>{STYLESHEET}</style>\n</head>\n<body>\n"
    );

    out.push_str(&nav(state));
    out.push_str("<main>\n");
    out.push_str(&notices(&state.alerts, &state.opened));

    let panels = [
        (Tab::Patients, patients(&state.patients)),
        (Tab::Calendar, calendar(&state.calendar) + &booking(&state.booking)),
        (Tab::Chat, chat(&state.chat)),
        (Tab::Prescription, prescription(&state.prescription)),
        (Tab::Medicine, medicine(&state.medicine)),
    ];
    for (tab, body) in panels {
        let _ = writeln!(
            out,
            "<section id=\"{}\" class=\"tab-content{}\">\n{body}</section>",
            tab.id(),
            active_class(tab == state.current_tab)
        );
    }

    out.push_str("</main>\n");
    out.push_str(&modal(&state.patients));
    out.push_str("</body>\n</html>\n");
    out
}

fn nav(state: &ViewState) -> String {
    let mut out = String::from("<header>\n");
    for entry in state.tab_strip() {
        let _ = writeln!(
            out,
            "<form method=\"post\" action=\"/tab\"><input type=\"hidden\" name=\"tab\" value=\"{}\">\
             <button class=\"nav-btn{}\">{}</button></form>",
            entry.tab.id(),
            active_class(entry.active),
            escape(entry.tab.label())
        );
    }
    out.push_str("</header>\n");
    out
}

fn notices(alerts: &[String], opened: &[String]) -> String {
    let mut out = String::new();
    for alert in alerts {
        let _ = writeln!(out, "<div class=\"alert\" role=\"alert\">{}</div>", escape(alert));
    }
    for url in opened {
        let url = escape(url);
        let _ = writeln!(
            out,
            "<div class=\"alert\"><a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a></div>"
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

fn patients(panel: &PatientsPanel) -> String {
    let mut out = String::from("<h2>Patients</h2>\n<div id=\"patient-list\">\n");
    match &panel.list {
        PatientList::Idle => {}
        PatientList::Loading => {
            let _ = writeln!(out, "<div class=\"muted\">{LOADING_RECORDS}</div>");
        }
        PatientList::Failed => {
            let _ = writeln!(out, "<p class=\"error\">{FAILED_TO_LOAD_PATIENTS}</p>");
        }
        PatientList::Loaded(list) => {
            for patient in list {
                let _ = writeln!(
                    out,
                    "<form class=\"card\" method=\"post\" action=\"/patients/open\">\
                     <input type=\"hidden\" name=\"id\" value=\"{}\">\
                     <h3>{}</h3><p>ID: {} | Age: {}</p><p class=\"muted\">Last Visit: {}</p>\
                     <button>View history</button></form>",
                    escape(&patient.id.to_string()),
                    escape(&patient.name),
                    escape(&patient.id.to_string()),
                    escape(&scalar_or_dash(patient.age.as_ref())),
                    escape(or_dash(patient.last_visit.as_deref()))
                );
            }
        }
    }
    out.push_str("</div>\n");
    out
}

fn modal(panel: &PatientsPanel) -> String {
    let modal = &panel.modal;
    let Some(record) = modal.record.as_ref().filter(|_| modal.visible) else {
        return String::new();
    };
    format!(
        "<div id=\"patient-modal\" class=\"modal\">\n\
         <form class=\"modal-backdrop\" method=\"post\" action=\"/modal/backdrop\">\
         <button aria-label=\"Close\"></button></form>\n<div class=\"modal-content\">\n\
         <form method=\"post\" action=\"/modal/close\"><button>&times;</button></form>\n\
         <h2>{}</h2>\n<p><strong>Age:</strong> {}</p>\n<p><strong>Last Visit:</strong> {}</p>\n\
         <h3>History</h3>\n<div class=\"output\">{}</div>\n</div>\n</div>\n",
        escape(&record.name),
        escape(&scalar_or_dash(record.age.as_ref())),
        escape(or_dash(record.last_visit.as_deref())),
        escape(or_dash(record.history.as_deref()))
    )
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

fn chat(panel: &ChatPanel) -> String {
    let mut out = String::from("<h2>AI Assistant</h2>\n<div id=\"chat-box\" class=\"chat-box\">\n");
    for message in &panel.messages {
        let pending = if message.pending { " pending" } else { "" };
        let role = match message.role {
            Role::User => "user",
            Role::Ai => "ai",
        };
        let _ = writeln!(
            out,
            "<div class=\"card message {role}{pending}\">{}</div>",
            escape(&message.text)
        );
    }
    let _ = writeln!(
        out,
        "</div>\n<form method=\"post\" action=\"/chat\">\
         <input name=\"message\" value=\"{}\" placeholder=\"Ask the AI assistant\" autofocus>\
         <button>Send</button></form>",
        escape(&panel.input)
    );
    out
}

// ---------------------------------------------------------------------------
// Prescription / medicine
// ---------------------------------------------------------------------------

fn prescription(panel: &ReviewPanel) -> String {
    format!(
        "<h2>Prescription Review</h2>\n<form method=\"post\" action=\"/prescription\">\
         <textarea name=\"text\" rows=\"6\" cols=\"80\">{}</textarea><br>\
         <button>Analyze</button></form>\n<div id=\"prescription-output\" class=\"output\">{}</div>\n\
         <button type=\"button\"{}>Download PDF</button>\n",
        escape(&panel.input),
        escape(&panel.output),
        disabled_attr(!panel.download_enabled)
    )
}

fn medicine(panel: &ReviewPanel) -> String {
    format!(
        "<h2>Medicine Recommendation</h2>\n<form method=\"post\" action=\"/medicine\">\
         <input name=\"condition\" value=\"{}\" placeholder=\"Condition\">\
         <button>Recommend</button></form>\n<div id=\"medicine-output\" class=\"output\">{}</div>\n\
         <form method=\"post\" action=\"/medicine/pdf\"><button{}>Download PDF</button></form>\n",
        escape(&panel.input),
        escape(&panel.output),
        disabled_attr(!panel.download_enabled)
    )
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn slot_card(date: &str, card: &SlotCard) -> String {
    let mut out = format!(
        "<div class=\"card slot {}\"><strong>{}</strong> <span>{}</span>",
        card.state.as_str(),
        escape(&card.time),
        escape(&card.status_label())
    );
    if let Some(patient) = &card.patient {
        let _ = write!(out, "<p>{}</p>", escape(patient));
    }
    match (card.action, card.action_label()) {
        (Some(action), Some(label)) => {
            let _ = write!(
                out,
                "<form method=\"post\" action=\"/calendar/toggle\">\
                 <input type=\"hidden\" name=\"date\" value=\"{}\">\
                 <input type=\"hidden\" name=\"time\" value=\"{}\">\
                 <input type=\"hidden\" name=\"action\" value=\"{}\">\
                 <button>{label}</button></form>",
                escape(date),
                escape(&card.time),
                action.as_str()
            );
        }
        (None, Some(label)) if card.state == SlotState::Booked => {
            let _ = write!(out, "<p class=\"muted\">{label}</p>");
        }
        _ => {}
    }
    out.push_str("</div>\n");
    out
}

fn slot_container(id: &str, date: &str, cards: &[SlotCard], empty: &str) -> String {
    let mut out = format!("<div id=\"{id}\" class=\"slots\">\n");
    if cards.is_empty() {
        let _ = writeln!(out, "<p class=\"muted\">{empty}</p>");
    }
    for card in cards {
        out.push_str(&slot_card(date, card));
    }
    out.push_str("</div>\n");
    out
}

fn calendar(panel: &CalendarPanel) -> String {
    let mut out = format!(
        "<h2>Manage Availability</h2>\n<form method=\"post\" action=\"/calendar/date\">\
         <input type=\"date\" name=\"date\" value=\"{}\"><button>Load</button></form>\n",
        escape(&panel.date)
    );

    match &panel.grid {
        SlotGrid::Idle => {}
        SlotGrid::Loading => {
            let _ = writeln!(out, "<h3>Morning</h3>\n<p class=\"muted\">{LOADING}</p>");
            let _ = writeln!(out, "<h3>Evening</h3>\n<p class=\"muted\">{LOADING}</p>");
        }
        SlotGrid::Failed(message) => {
            let _ = writeln!(
                out,
                "<h3>Morning</h3>\n<p class=\"error\">{}</p>\n<h3>Evening</h3>",
                escape(message)
            );
        }
        SlotGrid::Ready {
            date,
            morning,
            evening,
        } => {
            out.push_str("<h3>Morning</h3>\n");
            out.push_str(&slot_container("morning-slots", date, morning, NO_MORNING_SLOTS));
            out.push_str("<h3>Evening</h3>\n");
            out.push_str(&slot_container("evening-slots", date, evening, NO_EVENING_SLOTS));
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Booking
// ---------------------------------------------------------------------------

fn booking(panel: &BookingPanel) -> String {
    let mut out = format!(
        "<h2>Book Appointment</h2>\n<form method=\"post\" action=\"/booking/date\">\
         <input type=\"date\" name=\"date\" value=\"{}\"><button>Find slots</button></form>\n\
         <form method=\"post\" action=\"/booking/book\"><select name=\"slot\"{}>",
        escape(&panel.date),
        disabled_attr(!panel.select_enabled())
    );

    match &panel.options {
        SlotOptions::Open(slots) => {
            for slot in slots {
                let selected = if *slot == panel.selected { " selected" } else { "" };
                let slot = escape(slot);
                let _ = write!(out, "<option value=\"{slot}\"{selected}>{slot}</option>");
            }
        }
        SlotOptions::NoneAvailable => {
            let _ = write!(out, "<option value=\"\" disabled>{NO_SLOTS_AVAILABLE}</option>");
        }
        other => {
            let _ = write!(
                out,
                "<option value=\"\">{}</option>",
                other.placeholder().unwrap_or_default()
            );
        }
    }
    out.push_str("</select><button>Book</button></form>\n");

    if !panel.events.is_empty() {
        out.push_str("<h3>Upcoming</h3>\n<ul>\n");
        for event in &panel.events {
            let _ = writeln!(
                out,
                "<li>{} {}</li>",
                escape(or_dash(event.start.as_deref())),
                escape(or_dash(event.summary.as_deref()))
            );
        }
        out.push_str("</ul>\n");
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::api::{PatientRecord, SlotEntry};
    use crate::dashboard::PatientModal;

    #[test]
    fn escape_handles_markup_characters() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn exactly_one_panel_and_nav_button_active() {
        let mut state = ViewState::default();
        state.current_tab = Tab::Medicine;
        let html = page(&state);
        assert_eq!(html.matches("class=\"tab-content active\"").count(), 1);
        assert_eq!(html.matches("class=\"nav-btn active\"").count(), 1);
        assert!(html.contains("<section id=\"medicine\" class=\"tab-content active\">"));
    }

    #[test]
    fn modal_only_rendered_when_visible() {
        let mut state = ViewState::default();
        let record = PatientRecord {
            name: "Meera <Iyer>".to_string(),
            age: None,
            last_visit: None,
            history: Some("Asthma".to_string()),
        };
        state.patients.modal = PatientModal {
            visible: false,
            record: Some(record.clone()),
        };
        assert!(!page(&state).contains("patient-modal"));

        state.patients.modal.visible = true;
        let html = page(&state);
        assert!(html.contains("patient-modal"));
        assert!(html.contains("action=\"/modal/backdrop\""));
        assert!(html.contains("Meera &lt;Iyer&gt;"));
        assert!(html.contains("Asthma"));
    }

    #[test]
    fn slot_cards_carry_toggle_forms() {
        let mut slots = BTreeMap::new();
        slots.insert("09:00".to_string(), SlotEntry::new(SlotState::Available, None));
        slots.insert("17:00".to_string(), SlotEntry::new(SlotState::Booked, None));
        let mut panel = CalendarPanel::default();
        panel.date = "2024-05-01".to_string();
        panel.grid = SlotGrid::build("2024-05-01", &slots);

        let html = calendar(&panel);
        assert!(html.contains("name=\"action\" value=\"block\""));
        assert!(html.contains("name=\"time\" value=\"09:00\""));
        assert!(html.contains("Unknown Patient"));
        assert_eq!(html.matches("/calendar/toggle").count(), 1);
    }

    #[test]
    fn no_slots_option_is_disabled() {
        let panel = BookingPanel {
            date: "2024-05-01".to_string(),
            options: SlotOptions::NoneAvailable,
            ..BookingPanel::default()
        };
        assert!(booking(&panel).contains("<option value=\"\" disabled>No slots available</option>"));
    }

    #[test]
    fn failed_slot_load_reenables_select() {
        let mut panel = BookingPanel {
            date: "2024-05-01".to_string(),
            options: SlotOptions::Loading,
            ..BookingPanel::default()
        };
        assert!(booking(&panel).contains("<select name=\"slot\" disabled>"));

        panel.options = SlotOptions::Failed;
        let html = booking(&panel);
        assert!(html.contains("<select name=\"slot\">"));
        assert!(html.contains("Error loading slots"));
    }

    #[test]
    fn download_button_follows_panel_flag() {
        let mut panel = ReviewPanel::default();
        assert!(medicine(&panel).contains("<button disabled>Download PDF</button>"));
        panel.download_enabled = true;
        assert!(medicine(&panel).contains("<button>Download PDF</button>"));
    }

    #[test]
    fn opened_urls_become_new_window_links() {
        let html = notices(&[], &["http://127.0.0.1:5000/static/r.pdf".to_string()]);
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("href=\"http://127.0.0.1:5000/static/r.pdf\""));
    }
}
