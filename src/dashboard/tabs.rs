/// Tab controller.
///
/// The dashboard has a fixed set of mutually exclusive tabs. The active tab
/// is a single field of the view state; panel and nav-control activation are
/// derived from it, so exactly one of each is active at any time.
use std::fmt;
use std::str::FromStr;

use super::{DashError, Dashboard};
use crate::api::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Patients,
    Calendar,
    Chat,
    Prescription,
    Medicine,
}

impl Tab {
    /// Every tab, in nav-bar order.
    pub const ALL: [Tab; 5] = [
        Tab::Patients,
        Tab::Calendar,
        Tab::Chat,
        Tab::Prescription,
        Tab::Medicine,
    ];

    /// Identifier used in URLs, config and the CLI.
    pub fn id(self) -> &'static str {
        match self {
            Self::Patients => "patients",
            Self::Calendar => "calendar",
            Self::Chat => "chat",
            Self::Prescription => "prescription",
            Self::Medicine => "medicine",
        }
    }

    /// Nav-control caption.
    pub fn label(self) -> &'static str {
        match self {
            Self::Patients => "Patients",
            Self::Calendar => "Calendar",
            Self::Chat => "AI Assistant",
            Self::Prescription => "Prescription Review",
            Self::Medicine => "Medicine",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Tab {
    type Err = DashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == s)
            .ok_or_else(|| DashError::UnknownTab(s.to_string()))
    }
}

/// Activation of one tab panel and its nav control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabState {
    pub tab: Tab,
    pub active: bool,
}

impl<B: Backend> Dashboard<B> {
    /// Activate `tab_id` and run its load routine.
    ///
    /// Patients reloads the patient list; calendar resets the manage date to
    /// today (UTC) and reloads the slot grid. The other tabs have no initial
    /// load. Unknown ids are rejected and leave the state untouched.
    pub fn switch_tab(&mut self, tab_id: &str) -> Result<(), DashError> {
        let tab: Tab = tab_id.parse()?;
        self.activate(tab);
        Ok(())
    }

    /// Typed form of [`switch_tab`](Self::switch_tab).
    pub fn activate(&mut self, tab: Tab) {
        self.state.current_tab = tab;

        match tab {
            Tab::Patients => self.load_patients(),
            Tab::Calendar => {
                self.state.calendar.date = (self.clock)().format("%Y-%m-%d").to_string();
                self.load_doc_slots();
            }
            Tab::Chat | Tab::Prescription | Tab::Medicine => {}
        }
    }
}
