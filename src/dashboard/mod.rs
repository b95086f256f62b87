//! Dashboard controller and view state.
//!
//! [`Dashboard`] owns the backend client and a single [`ViewState`]. Every
//! user action is a method on the controller: it validates input, updates
//! the state to its "working" shape, calls the backend, and writes the
//! result (or a fixed error message) back into the state. Renderers in
//! [`crate::render`] are pure functions of the state.
//!
//! Blocking alerts and "open in a new window" requests are queued on the
//! state and drained by whichever surface is driving the controller.

pub mod booking;
pub mod calendar;
pub mod chat;
pub mod patients;
pub mod request;
pub mod review;
pub mod tabs;

use chrono::{NaiveDate, Utc};

use crate::api::{ApiError, Backend};
use crate::diagnostics::Diagnostics;

pub use booking::{BookingPanel, SlotOptions};
pub use calendar::{CalendarPanel, SlotCard, SlotGrid};
pub use chat::{ChatMessage, ChatPanel, ChatTicket, Role};
pub use patients::{ClickTarget, PatientList, PatientModal, PatientsPanel};
pub use review::{ReviewPanel, ReviewTicket};
pub use tabs::{Tab, TabState};

/// Errors surfaced to the caller of a controller operation.
///
/// Most failures are rendered into the view state instead; these are the
/// few cases with no on-screen failure path.
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("unknown tab: {0}")]
    UnknownTab(String),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Everything the dashboard shows.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub current_tab: Tab,
    pub patients: PatientsPanel,
    pub chat: ChatPanel,
    pub prescription: ReviewPanel,
    pub medicine: ReviewPanel,
    pub calendar: CalendarPanel,
    pub booking: BookingPanel,
    /// Blocking alerts not yet shown.
    pub alerts: Vec<String>,
    /// URLs to open in a new browsing context, not yet opened.
    pub opened: Vec<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Patients,
            patients: PatientsPanel::default(),
            chat: ChatPanel::default(),
            prescription: ReviewPanel::default(),
            medicine: ReviewPanel::default(),
            calendar: CalendarPanel::default(),
            booking: BookingPanel::default(),
            alerts: Vec::new(),
            opened: Vec::new(),
        }
    }
}

impl ViewState {
    /// Activation of every tab panel / nav control.
    pub fn tab_strip(&self) -> Vec<TabState> {
        Tab::ALL
            .into_iter()
            .map(|tab| TabState {
                tab,
                active: tab == self.current_tab,
            })
            .collect()
    }
}

/// The controller. Generic over the backend so tests can substitute a fake.
pub struct Dashboard<B: Backend> {
    backend: B,
    state: ViewState,
    diagnostics: Diagnostics,
    clock: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl<B: Backend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            state: ViewState::default(),
            diagnostics: Diagnostics::disabled(),
            clock: utc_today,
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the source of "today" used by the calendar tab.
    pub fn with_clock(mut self, clock: fn() -> NaiveDate) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Drain pending alerts.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.state.alerts)
    }

    /// Drain pending URLs to open.
    pub fn take_opened(&mut self) -> Vec<String> {
        std::mem::take(&mut self.state.opened)
    }

    fn alert(&mut self, message: impl Into<String>) {
        self.state.alerts.push(message.into());
    }

    fn log_failure(&self, operation: &str, err: &ApiError) {
        self.diagnostics.record(operation, &err.to_string());
    }
}
