/// Patient list and detail modal.
use super::Dashboard;
use super::DashError;
use crate::api::{Backend, PatientRecord, PatientSummary};

pub const LOADING_RECORDS: &str = "Loading records...";
pub const FAILED_TO_LOAD_PATIENTS: &str = "Failed to load patients.";

/// Content of the patient list container.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PatientList {
    /// Never loaded.
    #[default]
    Idle,
    Loading,
    Loaded(Vec<PatientSummary>),
    Failed,
}

/// The patient detail modal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientModal {
    pub visible: bool,
    pub record: Option<PatientRecord>,
}

#[derive(Debug, Clone, Default)]
pub struct PatientsPanel {
    pub list: PatientList,
    pub modal: PatientModal,
}

/// What a click landed on, for click-outside-to-close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the modal content.
    ModalBackdrop,
    Elsewhere,
}

impl<B: Backend> Dashboard<B> {
    /// Replace the patient list with a fresh fetch.
    pub fn load_patients(&mut self) {
        self.state.patients.list = PatientList::Loading;
        self.state.patients.list = match self.backend.list_patients() {
            Ok(patients) => PatientList::Loaded(patients),
            Err(err) => {
                self.log_failure("load_patients", &err);
                PatientList::Failed
            }
        };
    }

    /// Fetch one patient's full record into the modal and show it.
    ///
    /// There is no on-screen failure state: on error the modal keeps its
    /// previous contents and visibility, and the error is returned.
    pub fn show_patient_details(&mut self, id: &str) -> Result<(), DashError> {
        match self.backend.patient_history(id) {
            Ok(record) => {
                self.state.patients.modal = PatientModal {
                    visible: true,
                    record: Some(record),
                };
                Ok(())
            }
            Err(err) => {
                self.log_failure("show_patient_details", &err);
                Err(err.into())
            }
        }
    }

    pub fn close_modal(&mut self) {
        self.state.patients.modal.visible = false;
    }

    /// Document-level click handler: clicking the modal backdrop closes it.
    pub fn click(&mut self, target: ClickTarget) {
        if target == ClickTarget::ModalBackdrop {
            self.close_modal();
        }
    }
}
