//! Client side of the clinic backend API.
//!
//! The dashboard talks to the backend through the [`Backend`] trait so the
//! controller can be driven by an in-memory fake in tests. [`ClinicClient`]
//! is the production implementation over synchronous `ureq`.

pub mod client;
pub mod types;

pub use client::ClinicClient;
pub use types::{
    CalendarEvent, MutationReply, PatientRecord, PatientSummary, PdfReply, Scalar, SlotEntry,
    SlotState, SlotStatusResponse, ToggleAction,
};

/// Failure of a single backend call.
///
/// Application-level failures (`status != "success"`, a top-level `error`
/// field) are not errors here; they are part of the decoded reply.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout).
    #[error("request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },
    /// A response arrived but its body was not the expected JSON.
    #[error("unexpected response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },
}

impl ApiError {
    pub fn transport(endpoint: &str, reason: impl ToString) -> Self {
        Self::Transport {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn decode(endpoint: &str, reason: impl ToString) -> Self {
        Self::Decode {
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The backend endpoints the dashboard consumes, one method per endpoint.
pub trait Backend {
    /// `GET /api/patients`
    fn list_patients(&self) -> ApiResult<Vec<PatientSummary>>;

    /// `GET /api/patients/{id}/history`
    fn patient_history(&self, id: &str) -> ApiResult<PatientRecord>;

    /// `POST /api/rag/query`, returns the agent's answer text.
    fn rag_query(&self, message: &str) -> ApiResult<String>;

    /// `POST /api/prescription/review`, returns the analysis text.
    fn review_prescription(&self, prescription_text: &str) -> ApiResult<String>;

    /// `POST /api/medicine/recommend`, returns the recommendation text.
    fn recommend_medicine(&self, condition: &str) -> ApiResult<String>;

    /// `POST /api/medicine/generate_pdf`
    fn generate_medicine_pdf(&self, condition: &str, recommendation: &str)
    -> ApiResult<PdfReply>;

    /// `GET /api/calendar/manage/status?date=`
    fn slot_status(&self, date: &str) -> ApiResult<SlotStatusResponse>;

    /// `POST /api/calendar/manage/toggle`
    fn toggle_slot(&self, date: &str, time: &str, action: ToggleAction)
    -> ApiResult<MutationReply>;

    /// `GET /api/calendar/slots?date=`
    fn open_slots(&self, date: &str) -> ApiResult<Vec<String>>;

    /// `POST /api/calendar/book`
    fn book(&self, start_time: &str, summary: &str) -> ApiResult<MutationReply>;

    /// `GET /api/calendar/events`
    fn upcoming_events(&self) -> ApiResult<Vec<CalendarEvent>>;

    /// Turn a URL returned by the backend (possibly relative) into one a
    /// browser can open.
    fn resolve_url(&self, url: &str) -> String {
        url.to_string()
    }
}
