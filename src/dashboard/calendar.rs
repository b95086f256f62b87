/// Calendar slot manager.
///
/// Loads a day's slot-status map and lays it out as two partitions of slot
/// cards. A slot belongs to the morning partition when the hour in front of
/// its `:` is below [`MORNING_CUTOFF_HOUR`]; everything else, including
/// times whose hour can't be read, goes to the evening partition.
///
/// Available and blocked slots carry a toggle action. Toggling posts the
/// mutation and, on success, reloads the whole grid; there is no local
/// patching of cards.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::Dashboard;
use super::request::{Generation, Ticket};
use crate::api::{ApiResult, Backend, SlotEntry, SlotState, SlotStatusResponse, ToggleAction};

/// First hour that counts as evening.
pub const MORNING_CUTOFF_HOUR: i64 = 14;

pub const LOADING: &str = "Loading...";
pub const ERROR_LOADING_SLOTS: &str = "Error loading slots.";
pub const NO_MORNING_SLOTS: &str = "No morning slots.";
pub const NO_EVENING_SLOTS: &str = "No evening slots.";
pub const UNKNOWN_PATIENT: &str = "Unknown Patient";
pub const BOOKED_LABEL: &str = "Booked";

/// Leading integer of a time string, read the way `parseInt` reads it:
/// optional whitespace, an optional sign, then digits.
static LEADING_HOUR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("hour regex must compile"));

/// Hour component of an `"HH:MM"` key, or `None` if it has no leading digits.
pub fn slot_hour(time: &str) -> Option<i64> {
    let head = time.split(':').next().unwrap_or(time);
    LEADING_HOUR
        .captures(head)
        .and_then(|caps| caps[1].parse().ok())
}

pub fn is_morning(time: &str) -> bool {
    slot_hour(time).is_some_and(|hour| hour < MORNING_CUTOFF_HOUR)
}

// ---------------------------------------------------------------------------
// Grid model
// ---------------------------------------------------------------------------

/// One rendered slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotCard {
    pub time: String,
    pub state: SlotState,
    /// Patient shown on booked slots.
    pub patient: Option<String>,
    /// Toggle offered by the card; `None` for booked or unrecognized slots.
    pub action: Option<ToggleAction>,
}

impl SlotCard {
    pub fn from_entry(time: &str, entry: &SlotEntry) -> Self {
        let (patient, action) = match entry.status {
            SlotState::Available => (None, Some(ToggleAction::Block)),
            SlotState::Blocked => (None, Some(ToggleAction::Unblock)),
            SlotState::Booked => {
                let name = entry
                    .details
                    .as_deref()
                    .filter(|d| !d.is_empty())
                    .unwrap_or(UNKNOWN_PATIENT);
                (Some(name.to_string()), None)
            }
            SlotState::Unknown => (None, None),
        };
        Self {
            time: time.to_string(),
            state: entry.status,
            patient,
            action,
        }
    }

    /// Status caption, upper-cased.
    pub fn status_label(&self) -> String {
        self.state.as_str().to_ascii_uppercase()
    }

    /// Caption of the card's action area.
    pub fn action_label(&self) -> Option<&'static str> {
        match (self.state, self.action) {
            (_, Some(ToggleAction::Block)) => Some("Mark Unavailable"),
            (_, Some(ToggleAction::Unblock)) => Some("Mark Available"),
            (SlotState::Booked, None) => Some(BOOKED_LABEL),
            _ => None,
        }
    }
}

/// Content of the two slot containers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlotGrid {
    /// No date chosen yet.
    #[default]
    Idle,
    Loading,
    /// Only the message is shown, in the morning container.
    Failed(String),
    Ready {
        date: String,
        morning: Vec<SlotCard>,
        evening: Vec<SlotCard>,
    },
}

impl SlotGrid {
    /// Lay out a status map. Cards are ordered by time key; for `"HH:MM"`
    /// keys lexicographic order is chronological order.
    pub fn build(date: &str, slots: &BTreeMap<String, SlotEntry>) -> Self {
        let mut times: Vec<&String> = slots.keys().collect();
        times.sort();

        let (morning, evening): (Vec<SlotCard>, Vec<SlotCard>) = times
            .into_iter()
            .map(|time| SlotCard::from_entry(time, &slots[time]))
            .partition(|card| is_morning(&card.time));

        Self::Ready {
            date: date.to_string(),
            morning,
            evening,
        }
    }

    pub fn from_response(date: &str, response: SlotStatusResponse) -> Self {
        match response {
            SlotStatusResponse::Error(message) => Self::Failed(message),
            SlotStatusResponse::Slots(slots) => Self::build(date, &slots),
        }
    }

    /// Every card, morning first.
    pub fn cards(&self) -> Vec<&SlotCard> {
        match self {
            Self::Ready {
                morning, evening, ..
            } => morning.iter().chain(evening.iter()).collect(),
            _ => Vec::new(),
        }
    }

    /// Look up the card for `time`.
    pub fn card(&self, time: &str) -> Option<&SlotCard> {
        self.cards().into_iter().find(|card| card.time == time)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CalendarPanel {
    /// The manage-date input, `YYYY-MM-DD`.
    pub date: String,
    pub grid: SlotGrid,
    generation: Generation,
}

/// An outstanding slot-status load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLoad {
    ticket: Ticket,
    pub date: String,
}

impl<B: Backend> Dashboard<B> {
    pub fn set_manage_date(&mut self, date: impl Into<String>) {
        self.state.calendar.date = date.into();
    }

    /// Fetch and lay out the slots for the manage date. No-op without a date.
    pub fn load_doc_slots(&mut self) {
        let Some(load) = self.begin_slot_load() else {
            return;
        };
        let result = self.backend.slot_status(&load.date);
        self.complete_slot_load(&load, result);
    }

    /// First half of [`load_doc_slots`](Self::load_doc_slots): put the grid
    /// into its loading state and issue a ticket.
    pub fn begin_slot_load(&mut self) -> Option<SlotLoad> {
        let date = self.state.calendar.date.trim().to_string();
        if date.is_empty() {
            return None;
        }
        self.state.calendar.grid = SlotGrid::Loading;
        Some(SlotLoad {
            ticket: self.state.calendar.generation.issue(),
            date,
        })
    }

    /// Second half of [`load_doc_slots`](Self::load_doc_slots). A response
    /// to a superseded load is dropped; returns whether it was applied.
    pub fn complete_slot_load(&mut self, load: &SlotLoad, result: ApiResult<SlotStatusResponse>) -> bool {
        if !self.state.calendar.generation.is_current(load.ticket) {
            return false;
        }
        self.state.calendar.grid = match result {
            Ok(response) => SlotGrid::from_response(&load.date, response),
            Err(err) => {
                self.log_failure("load_doc_slots", &err);
                SlotGrid::Failed(ERROR_LOADING_SLOTS.to_string())
            }
        };
        true
    }

    /// Block or unblock one slot, then reload that date's grid.
    pub fn toggle_slot(&mut self, date: &str, time: &str, action: ToggleAction) {
        match self.backend.toggle_slot(date, time, action) {
            Ok(reply) if reply.is_success() => {
                self.state.calendar.date = date.to_string();
                self.load_doc_slots();
            }
            Ok(reply) => {
                let message = format!("Failed: {}", reply.failure_message());
                self.alert(message);
            }
            Err(err) => {
                self.log_failure("toggle_slot", &err);
                self.alert(format!("Failed: {err}"));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
