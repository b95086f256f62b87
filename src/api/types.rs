/// Wire types for the clinic backend.
///
/// Request bodies borrow from the caller; response bodies own their data.
/// Field names match the backend's JSON exactly.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// A JSON value the backend sends either as a string or as a number.
///
/// Patient ids are document ids (strings) in one deployment and integers in
/// another; ages show up both ways too. The dashboard only ever displays them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

// ---------------------------------------------------------------------------
// Patients
// ---------------------------------------------------------------------------

/// One entry of `GET /api/patients`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Scalar,
    pub name: String,
    #[serde(default)]
    pub age: Option<Scalar>,
    #[serde(default)]
    pub last_visit: Option<String>,
}

/// Body of `GET /api/patients/{id}/history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: String,
    #[serde(default)]
    pub age: Option<Scalar>,
    #[serde(default)]
    pub last_visit: Option<String>,
    #[serde(default)]
    pub history: Option<String>,
}

// ---------------------------------------------------------------------------
// AI endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct RagQueryRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RagQueryResponse {
    pub response: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PrescriptionReviewRequest<'a> {
    pub prescription_text: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PrescriptionReviewResponse {
    pub analysis: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RecommendRequest<'a> {
    pub condition: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecommendResponse {
    pub recommendations: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct GeneratePdfRequest<'a> {
    pub condition: &'a str,
    pub recommendation: &'a str,
}

/// Body of `POST /api/medicine/generate_pdf`.
///
/// `pdf_url` is absent when generation failed; the backend then sends
/// `{"error": ...}` instead.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PdfReply {
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

/// Availability of a single slot. Statuses are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Available,
    Booked,
    Blocked,
    #[serde(other)]
    Unknown,
}

impl SlotState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Blocked => "blocked",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SlotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value side of the slot-status map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub status: SlotState,
    #[serde(default)]
    pub details: Option<String>,
}

impl SlotEntry {
    pub fn new(status: SlotState, details: Option<&str>) -> Self {
        Self {
            status,
            details: details.map(str::to_string),
        }
    }
}

/// Decoded body of `GET /api/calendar/manage/status`.
///
/// The backend answers with either a bare `time -> entry` map or an object
/// with a top-level `error` field. The map is keyed by `"HH:MM"` and kept in
/// a `BTreeMap`, whose iteration order is the lexicographic key order.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotStatusResponse {
    Slots(BTreeMap<String, SlotEntry>),
    Error(String),
}

impl SlotStatusResponse {
    /// Decode from raw JSON. An `error` key wins over any slot keys.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(serde::de::Error::custom("slot status must be a JSON object"));
        };

        if let Some(err) = map.remove("error") {
            let text = match err {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            return Ok(Self::Error(text));
        }

        let mut slots = BTreeMap::new();
        for (time, entry) in map {
            slots.insert(time, serde_json::from_value::<SlotEntry>(entry)?);
        }
        Ok(Self::Slots(slots))
    }
}

/// Action carried by a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToggleAction {
    Block,
    Unblock,
}

impl ToggleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Unblock => "unblock",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "unblock" => Some(Self::Unblock),
            _ => None,
        }
    }
}

impl fmt::Display for ToggleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ToggleRequest<'a> {
    pub date: &'a str,
    pub time: &'a str,
    pub action: ToggleAction,
}

#[derive(Debug, Serialize)]
pub(crate) struct BookRequest<'a> {
    pub start_time: &'a str,
    pub summary: &'a str,
}

/// Reply to a calendar mutation (toggle or book).
///
/// Success is signalled by `status == "success"`; anything else is a failure
/// whose `message` is shown to the user.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MutationReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl MutationReply {
    pub fn success() -> Self {
        Self {
            status: Some("success".to_string()),
            ..Self::default()
        }
    }

    pub fn failure(message: &str) -> Self {
        Self {
            status: Some("error".to_string()),
            message: Some(message.to_string()),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Text shown after `Failed: ` / `Booking failed: `.
    ///
    /// Falls back to the `error` field (validation failures) and then to
    /// `undefined`, which is what the dashboard has always printed when the
    /// backend sent neither.
    pub fn failure_message(&self) -> &str {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .unwrap_or("undefined")
    }
}

/// One upcoming calendar event from `GET /api/calendar/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patient_summary_accepts_string_and_numeric_ids() {
        let a: PatientSummary =
            serde_json::from_value(json!({"id": "65f0", "name": "Asha", "age": 54})).unwrap();
        assert_eq!(a.id, Scalar::Text("65f0".to_string()));
        assert_eq!(a.age, Some(Scalar::Int(54)));
        assert_eq!(a.last_visit, None);

        let b: PatientSummary =
            serde_json::from_value(json!({"id": 7, "name": "Ravi", "last_visit": "2024-04-02"}))
                .unwrap();
        assert_eq!(b.id.to_string(), "7");
        assert_eq!(b.last_visit.as_deref(), Some("2024-04-02"));
    }

    #[test]
    fn slot_status_decodes_map() {
        let raw = json!({
            "14:30": {"status": "booked", "details": "J. Doe"},
            "09:00": {"status": "available", "details": null},
        });
        let SlotStatusResponse::Slots(slots) = SlotStatusResponse::from_value(raw).unwrap() else {
            panic!("expected slots");
        };
        let keys: Vec<_> = slots.keys().cloned().collect();
        assert_eq!(keys, vec!["09:00", "14:30"]);
        assert_eq!(slots["14:30"].details.as_deref(), Some("J. Doe"));
        assert_eq!(slots["09:00"].status, SlotState::Available);
    }

    #[test]
    fn slot_status_error_field_wins() {
        let raw = json!({"error": "Date required", "10:00": {"status": "available"}});
        assert_eq!(
            SlotStatusResponse::from_value(raw).unwrap(),
            SlotStatusResponse::Error("Date required".to_string())
        );
    }

    #[test]
    fn slot_status_rejects_non_object() {
        assert!(SlotStatusResponse::from_value(json!(["10:00"])).is_err());
    }

    #[test]
    fn unknown_slot_state_is_tolerated() {
        let entry: SlotEntry = serde_json::from_value(json!({"status": "tentative"})).unwrap();
        assert_eq!(entry.status, SlotState::Unknown);
    }

    #[test]
    fn toggle_action_serializes_lowercase() {
        let req = ToggleRequest {
            date: "2024-05-01",
            time: "10:00",
            action: ToggleAction::Unblock,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"date": "2024-05-01", "time": "10:00", "action": "unblock"}));
    }

    #[test]
    fn toggle_action_parse() {
        assert_eq!(ToggleAction::parse("block"), Some(ToggleAction::Block));
        assert_eq!(ToggleAction::parse(" UNBLOCK "), Some(ToggleAction::Unblock));
        assert_eq!(ToggleAction::parse("delete"), None);
    }

    #[test]
    fn mutation_reply_failure_message_fallbacks() {
        let reply: MutationReply =
            serde_json::from_value(json!({"status": "error", "message": "Slot was not blocked"}))
                .unwrap();
        assert!(!reply.is_success());
        assert_eq!(reply.failure_message(), "Slot was not blocked");

        let reply: MutationReply =
            serde_json::from_value(json!({"error": "Missing fields"})).unwrap();
        assert_eq!(reply.failure_message(), "Missing fields");

        assert_eq!(MutationReply::default().failure_message(), "undefined");
        assert!(MutationReply::success().is_success());
    }
}
