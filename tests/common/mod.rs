//! In-memory clinic backend shared by the integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use clinic_dash::api::{
    ApiError, ApiResult, Backend, CalendarEvent, MutationReply, PatientRecord, PatientSummary,
    PdfReply, Scalar, SlotEntry, SlotState, SlotStatusResponse, ToggleAction,
};
use clinic_dash::dashboard::Dashboard;

pub const TODAY: &str = "2024-05-01";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

/// Backend double. Calls are recorded by endpoint name; endpoints listed in
/// `failing` return a transport error.
#[derive(Default)]
pub struct FakeBackend {
    pub calls: RefCell<Vec<String>>,
    pub failing: RefCell<HashSet<&'static str>>,
    pub patients: Vec<PatientSummary>,
    pub records: BTreeMap<String, PatientRecord>,
    /// date -> time -> entry
    pub slots: RefCell<BTreeMap<String, BTreeMap<String, SlotEntry>>>,
    /// Sent instead of the slot map when set.
    pub slot_error: Option<String>,
    pub pdf_url: Option<String>,
    pub booked: RefCell<Vec<(String, String)>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patient(mut self, id: i64, name: &str, history: &str) -> Self {
        self.patients.push(PatientSummary {
            id: Scalar::Int(id),
            name: name.to_string(),
            age: Some(Scalar::Int(40)),
            last_visit: Some("2024-04-02".to_string()),
        });
        self.records.insert(
            id.to_string(),
            PatientRecord {
                name: name.to_string(),
                age: Some(Scalar::Int(40)),
                last_visit: Some("2024-04-02".to_string()),
                history: Some(history.to_string()),
            },
        );
        self
    }

    pub fn with_slot(self, date: &str, time: &str, status: SlotState, details: Option<&str>) -> Self {
        self.slots
            .borrow_mut()
            .entry(date.to_string())
            .or_default()
            .insert(time.to_string(), SlotEntry::new(status, details));
        self
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.failing.borrow_mut().insert(endpoint);
    }

    pub fn calls_to(&self, endpoint: &str) -> usize {
        self.calls.borrow().iter().filter(|c| *c == endpoint).count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn status_of(&self, date: &str, time: &str) -> Option<SlotState> {
        self.slots
            .borrow()
            .get(date)
            .and_then(|day| day.get(time))
            .map(|entry| entry.status)
    }

    fn hit(&self, endpoint: &'static str) -> ApiResult<()> {
        self.calls.borrow_mut().push(endpoint.to_string());
        if self.failing.borrow().contains(endpoint) {
            return Err(ApiError::transport(endpoint, "connection refused"));
        }
        Ok(())
    }
}

impl Backend for FakeBackend {
    fn list_patients(&self) -> ApiResult<Vec<PatientSummary>> {
        self.hit("patients")?;
        Ok(self.patients.clone())
    }

    fn patient_history(&self, id: &str) -> ApiResult<PatientRecord> {
        self.hit("history")?;
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::decode("history", "missing field `name`"))
    }

    fn rag_query(&self, message: &str) -> ApiResult<String> {
        self.hit("rag")?;
        Ok(format!("answer to {message}"))
    }

    fn review_prescription(&self, prescription_text: &str) -> ApiResult<String> {
        self.hit("review")?;
        Ok(format!("analysis of {prescription_text}"))
    }

    fn recommend_medicine(&self, condition: &str) -> ApiResult<String> {
        self.hit("recommend")?;
        Ok(format!("medicines for {condition}"))
    }

    fn generate_medicine_pdf(&self, condition: &str, _recommendation: &str) -> ApiResult<PdfReply> {
        self.hit("pdf")?;
        Ok(PdfReply {
            pdf_url: self.pdf_url.clone(),
            error: self
                .pdf_url
                .is_none()
                .then(|| format!("no template for {condition}")),
        })
    }

    fn slot_status(&self, date: &str) -> ApiResult<SlotStatusResponse> {
        self.hit("status")?;
        if let Some(err) = &self.slot_error {
            return Ok(SlotStatusResponse::Error(err.clone()));
        }
        let day = self.slots.borrow().get(date).cloned().unwrap_or_default();
        Ok(SlotStatusResponse::Slots(day))
    }

    fn toggle_slot(&self, date: &str, time: &str, action: ToggleAction) -> ApiResult<MutationReply> {
        self.hit("toggle")?;
        let mut slots = self.slots.borrow_mut();
        let Some(entry) = slots.get_mut(date).and_then(|day| day.get_mut(time)) else {
            return Ok(MutationReply::failure("Slot not found"));
        };
        match (entry.status, action) {
            (SlotState::Available, ToggleAction::Block) => entry.status = SlotState::Blocked,
            (SlotState::Blocked, ToggleAction::Unblock) => entry.status = SlotState::Available,
            (SlotState::Booked, _) => return Ok(MutationReply::failure("Slot is booked")),
            _ => return Ok(MutationReply::default()),
        }
        Ok(MutationReply::success())
    }

    fn open_slots(&self, date: &str) -> ApiResult<Vec<String>> {
        self.hit("open_slots")?;
        Ok(self
            .slots
            .borrow()
            .get(date)
            .map(|day| {
                day.iter()
                    .filter(|(_, entry)| entry.status == SlotState::Available)
                    .map(|(time, _)| time.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    fn book(&self, start_time: &str, summary: &str) -> ApiResult<MutationReply> {
        self.hit("book")?;
        let Some((date, rest)) = start_time.split_once('T') else {
            return Ok(MutationReply::failure("Invalid start time"));
        };
        let time = &rest[..rest.len().min(5)];

        let mut slots = self.slots.borrow_mut();
        match slots.get_mut(date).and_then(|day| day.get_mut(time)) {
            Some(entry) if entry.status == SlotState::Available => {
                *entry = SlotEntry::new(SlotState::Booked, Some(summary));
            }
            _ => return Ok(MutationReply::failure("Slot not available")),
        }
        self.booked
            .borrow_mut()
            .push((start_time.to_string(), summary.to_string()));
        Ok(MutationReply::success())
    }

    fn upcoming_events(&self) -> ApiResult<Vec<CalendarEvent>> {
        self.hit("events")?;
        Ok(self
            .booked
            .borrow()
            .iter()
            .map(|(start, summary)| CalendarEvent {
                summary: Some(summary.clone()),
                start: Some(start.clone()),
            })
            .collect())
    }

    fn resolve_url(&self, url: &str) -> String {
        format!("http://backend.test/{}", url.trim_start_matches('/'))
    }
}

pub fn dashboard(backend: FakeBackend) -> Dashboard<FakeBackend> {
    Dashboard::new(backend).with_clock(today)
}
