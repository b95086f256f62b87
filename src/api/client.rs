/// HTTP client for the clinic backend.
///
/// Synchronous `ureq` calls against the fixed endpoint set. Each method is a
/// single request with no retry; callers decide what a failure looks like on
/// screen.
///
/// The backend reports application failures with non-2xx status codes but
/// still sends a JSON body (`{"status": "error", "message": ...}` with 500,
/// `{"error": ...}` with 400/404). Those bodies are decoded like any other
/// response so the message can reach the user.
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    BookRequest, CalendarEvent, GeneratePdfRequest, MutationReply, PatientRecord,
    PatientSummary, PdfReply, PrescriptionReviewRequest, PrescriptionReviewResponse,
    RagQueryRequest, RagQueryResponse, RecommendRequest, RecommendResponse, SlotStatusResponse,
    ToggleAction, ToggleRequest,
};
use super::{ApiError, ApiResult, Backend};
use crate::config::schema::BackendConfig;

/// Synchronous backend client.
///
/// Cheap to build; the CLI creates one per invocation and the dashboard
/// server keeps one for its lifetime.
#[derive(Debug, Clone)]
pub struct ClinicClient {
    base_url: String,
    timeout: Duration,
}

impl ClinicClient {
    /// Build a client from the resolved config.
    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        // "localhost" may resolve to ::1 first, which stalls against servers
        // bound to IPv4 only.
        let base_url = base_url
            .trim_end_matches('/')
            .replace("://localhost", "://127.0.0.1");
        Self { base_url, timeout }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the backend answers at all. Used by `clinic-dash health`.
    pub fn is_reachable(&self) -> bool {
        let url = self.url("/api/patients");
        match ureq::get(&url).timeout(Duration::from_secs(5)).call() {
            Ok(_) | Err(ureq::Error::Status(..)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: &str, path: &str) -> ApiResult<T> {
        let result = ureq::get(&self.url(path)).timeout(self.timeout).call();
        decode(endpoint, accept_any_status(endpoint, result)?)
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> ApiResult<T> {
        let result = ureq::post(&self.url(endpoint))
            .timeout(self.timeout)
            .send_json(body);
        decode(endpoint, accept_any_status(endpoint, result)?)
    }
}

/// Treat HTTP error statuses as ordinary responses; only transport failures
/// are errors.
fn accept_any_status(
    endpoint: &str,
    result: Result<ureq::Response, ureq::Error>,
) -> ApiResult<ureq::Response> {
    match result {
        Ok(resp) => Ok(resp),
        Err(ureq::Error::Status(_, resp)) => Ok(resp),
        Err(ureq::Error::Transport(t)) => Err(ApiError::transport(endpoint, t)),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, resp: ureq::Response) -> ApiResult<T> {
    resp.into_json::<T>()
        .map_err(|e| ApiError::decode(endpoint, e))
}

/// Build `path?date=<encoded>`.
fn with_date(path: &str, date: &str) -> String {
    format!("{path}?date={}", urlencoding::encode(date))
}

impl Backend for ClinicClient {
    fn list_patients(&self) -> ApiResult<Vec<PatientSummary>> {
        self.get_json("/api/patients", "/api/patients")
    }

    fn patient_history(&self, id: &str) -> ApiResult<PatientRecord> {
        let path = format!("/api/patients/{}/history", urlencoding::encode(id));
        self.get_json("/api/patients/{id}/history", &path)
    }

    fn rag_query(&self, message: &str) -> ApiResult<String> {
        let resp: RagQueryResponse =
            self.post_json("/api/rag/query", &RagQueryRequest { message })?;
        Ok(resp.response)
    }

    fn review_prescription(&self, prescription_text: &str) -> ApiResult<String> {
        let resp: PrescriptionReviewResponse = self.post_json(
            "/api/prescription/review",
            &PrescriptionReviewRequest { prescription_text },
        )?;
        Ok(resp.analysis)
    }

    fn recommend_medicine(&self, condition: &str) -> ApiResult<String> {
        let resp: RecommendResponse =
            self.post_json("/api/medicine/recommend", &RecommendRequest { condition })?;
        Ok(resp.recommendations)
    }

    fn generate_medicine_pdf(
        &self,
        condition: &str,
        recommendation: &str,
    ) -> ApiResult<PdfReply> {
        self.post_json(
            "/api/medicine/generate_pdf",
            &GeneratePdfRequest {
                condition,
                recommendation,
            },
        )
    }

    fn slot_status(&self, date: &str) -> ApiResult<SlotStatusResponse> {
        const ENDPOINT: &str = "/api/calendar/manage/status";
        let raw: serde_json::Value = self.get_json(ENDPOINT, &with_date(ENDPOINT, date))?;
        SlotStatusResponse::from_value(raw).map_err(|e| ApiError::decode(ENDPOINT, e))
    }

    fn toggle_slot(
        &self,
        date: &str,
        time: &str,
        action: ToggleAction,
    ) -> ApiResult<MutationReply> {
        self.post_json(
            "/api/calendar/manage/toggle",
            &ToggleRequest { date, time, action },
        )
    }

    fn open_slots(&self, date: &str) -> ApiResult<Vec<String>> {
        const ENDPOINT: &str = "/api/calendar/slots";
        self.get_json(ENDPOINT, &with_date(ENDPOINT, date))
    }

    fn book(&self, start_time: &str, summary: &str) -> ApiResult<MutationReply> {
        self.post_json(
            "/api/calendar/book",
            &BookRequest {
                start_time,
                summary,
            },
        )
    }

    fn upcoming_events(&self) -> ApiResult<Vec<CalendarEvent>> {
        self.get_json("/api/calendar/events", "/api/calendar/events")
    }

    fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            url.to_string()
        } else {
            format!("{}/{}", self.base_url, url.trim_start_matches('/'))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
