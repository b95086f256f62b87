/// Booking flow: pick an open slot for a date and book it.
use super::Dashboard;
use super::calendar::LOADING;
use crate::api::{Backend, CalendarEvent};

pub const SELECT_DATE_FIRST: &str = "Select a date first";
pub const NO_SLOTS_AVAILABLE: &str = "No slots available";
pub const ERROR_LOADING_OPTIONS: &str = "Error loading slots";
pub const SELECT_DATE_AND_SLOT: &str = "Select a date and time slot.";
pub const BOOKED: &str = "Appointment Booked!";

/// Summary attached to every booking made from the dashboard.
pub const BOOKING_SUMMARY: &str = "Patient Consultation (Booked via Dashboard)";

/// Content of the slot selection control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SlotOptions {
    #[default]
    SelectDateFirst,
    Loading,
    /// A single disabled placeholder option.
    NoneAvailable,
    Open(Vec<String>),
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct BookingPanel {
    /// The booking-date input, `YYYY-MM-DD`.
    pub date: String,
    pub options: SlotOptions,
    /// Selected slot value; empty when nothing is selected.
    pub selected: String,
    /// Upcoming appointments, refreshed after each booking.
    pub events: Vec<CalendarEvent>,
}

impl SlotOptions {
    /// Caption of the single placeholder option, if this state shows one.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self {
            Self::SelectDateFirst => Some(SELECT_DATE_FIRST),
            Self::Loading => Some(LOADING),
            Self::NoneAvailable => Some(NO_SLOTS_AVAILABLE),
            Self::Failed => Some(ERROR_LOADING_OPTIONS),
            Self::Open(_) => None,
        }
    }
}

impl BookingPanel {
    /// Whether the select control accepts input. It is disabled only while
    /// a load is outstanding.
    pub fn select_enabled(&self) -> bool {
        !matches!(self.options, SlotOptions::Loading)
    }
}

/// Start time sent to the backend: `<date>T<slot>:00`.
pub fn start_time(date: &str, slot: &str) -> String {
    format!("{date}T{slot}:00")
}

impl<B: Backend> Dashboard<B> {
    pub fn set_booking_date(&mut self, date: impl Into<String>) {
        self.state.booking.date = date.into();
    }

    pub fn select_slot(&mut self, slot: impl Into<String>) {
        self.state.booking.selected = slot.into();
    }

    /// Load the open slots for the booking date into the selection control.
    ///
    /// A selection that is still offered survives; otherwise the first slot
    /// is selected, as a freshly filled select control would.
    pub fn fetch_slots(&mut self) {
        let date = self.state.booking.date.trim().to_string();
        if date.is_empty() {
            self.state.booking.options = SlotOptions::SelectDateFirst;
            self.state.booking.selected.clear();
            return;
        }

        self.state.booking.options = SlotOptions::Loading;
        let result = self.backend.open_slots(&date);

        let booking = &mut self.state.booking;
        match result {
            Ok(slots) if slots.is_empty() => {
                booking.options = SlotOptions::NoneAvailable;
                booking.selected.clear();
            }
            Ok(slots) => {
                if !slots.contains(&booking.selected) {
                    booking.selected = slots[0].clone();
                }
                booking.options = SlotOptions::Open(slots);
            }
            Err(err) => {
                booking.options = SlotOptions::Failed;
                booking.selected.clear();
                self.log_failure("fetch_slots", &err);
            }
        }
    }

    /// Book the selected slot on the booking date.
    ///
    /// On success: alert, refresh upcoming events, clear the selection and
    /// reload the open slots.
    pub fn book_slot(&mut self) {
        let date = self.state.booking.date.trim().to_string();
        let slot = self.state.booking.selected.trim().to_string();
        if date.is_empty() || slot.is_empty() {
            return self.alert(SELECT_DATE_AND_SLOT);
        }

        let start = start_time(&date, &slot);
        match self.backend.book(&start, BOOKING_SUMMARY) {
            Ok(reply) if reply.is_success() => {
                self.alert(BOOKED);
                self.fetch_events();
                self.state.booking.selected.clear();
                self.fetch_slots();
            }
            Ok(reply) => {
                let message = format!("Booking failed: {}", reply.failure_message());
                self.alert(message);
            }
            Err(err) => {
                self.log_failure("book_slot", &err);
                self.alert(format!("Booking failed: {err}"));
            }
        }
    }

    /// Refresh the upcoming-events list. Failures keep the previous list.
    pub fn fetch_events(&mut self) {
        match self.backend.upcoming_events() {
            Ok(events) => self.state.booking.events = events,
            Err(err) => self.log_failure("fetch_events", &err),
        }
    }
}
