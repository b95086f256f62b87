/// HTTP client tests against a throwaway local server.
///
/// Each test starts a `tiny_http` server on an ephemeral port that answers a
/// single request with a canned response and reports what it received.
use std::io::Read;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clinic_dash::api::{ApiError, Backend, ClinicClient, SlotState, SlotStatusResponse, ToggleAction};
use tiny_http::{Header, Response, Server};

struct Received {
    method: String,
    url: String,
    body: String,
}

fn serve_once(status: u16, body: &'static str) -> (ClinicClient, JoinHandle<Received>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();

    let handle = thread::spawn(move || {
        let mut request = server.recv().unwrap();
        let mut received = String::new();
        request.as_reader().read_to_string(&mut received).unwrap();
        let seen = Received {
            method: request.method().to_string(),
            url: request.url().to_string(),
            body: received,
        };
        let header = Header::from_bytes("Content-Type", "application/json").unwrap();
        let response = Response::from_string(body)
            .with_header(header)
            .with_status_code(status);
        request.respond(response).unwrap();
        seen
    });

    let client = ClinicClient::new(&format!("http://{addr}"), Duration::from_secs(5));
    (client, handle)
}

#[test]
fn error_status_body_is_decoded() {
    let (client, server) = serve_once(500, r#"{"status": "error", "message": "Slot is booked"}"#);
    let reply = client
        .toggle_slot("2024-05-01", "17:00", ToggleAction::Block)
        .unwrap();
    assert!(!reply.is_success());
    assert_eq!(reply.failure_message(), "Slot is booked");

    let seen = server.join().unwrap();
    assert_eq!(seen.method, "POST");
    assert_eq!(seen.url, "/api/calendar/manage/toggle");
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(
        body,
        serde_json::json!({"date": "2024-05-01", "time": "17:00", "action": "block"})
    );
}

#[test]
fn slot_status_decodes_map_and_encodes_date() {
    let (client, server) = serve_once(
        200,
        r#"{"09:00": {"status": "available", "details": ""}, "17:00": {"status": "booked", "details": null}}"#,
    );
    let SlotStatusResponse::Slots(slots) = client.slot_status("2024-05-01 ").unwrap() else {
        panic!("expected slots");
    };
    assert_eq!(slots["09:00"].status, SlotState::Available);
    assert_eq!(slots["17:00"].details, None);

    let seen = server.join().unwrap();
    assert_eq!(seen.url, "/api/calendar/manage/status?date=2024-05-01%20");
}

#[test]
fn slot_status_error_object_short_circuits() {
    let (client, server) = serve_once(400, r#"{"error": "Date required"}"#);
    assert_eq!(
        client.slot_status("").unwrap(),
        SlotStatusResponse::Error("Date required".to_string())
    );
    server.join().unwrap();
}

#[test]
fn booking_sends_start_time_and_summary() {
    let (client, server) = serve_once(200, r#"{"status": "success"}"#);
    let reply = client
        .book("2024-05-01T10:00:00", "Patient Consultation (Booked via Dashboard)")
        .unwrap();
    assert!(reply.is_success());

    let seen = server.join().unwrap();
    let body: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
    assert_eq!(body["start_time"], "2024-05-01T10:00:00");
    assert_eq!(body["summary"], "Patient Consultation (Booked via Dashboard)");
}

#[test]
fn rag_reply_text_is_extracted() {
    let (client, server) = serve_once(200, r#"{"response": "Take with food."}"#);
    assert_eq!(client.rag_query("ibuprofen?").unwrap(), "Take with food.");
    let seen = server.join().unwrap();
    assert_eq!(seen.url, "/api/rag/query");
    assert!(seen.body.contains("\"message\":\"ibuprofen?\""));
}

#[test]
fn malformed_body_is_a_decode_error() {
    let (client, server) = serve_once(200, "<html>oops</html>");
    let err = client.list_patients().unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }), "got {err:?}");
    server.join().unwrap();
}

#[test]
fn connection_refused_is_a_transport_error() {
    // Bind and immediately drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = ClinicClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(2));
    let err = client.upcoming_events().unwrap_err();
    assert!(matches!(err, ApiError::Transport { .. }), "got {err:?}");
    assert!(!client.is_reachable());
}

#[test]
fn relative_pdf_urls_resolve_against_backend() {
    let client = ClinicClient::new("http://localhost:5000/", Duration::from_secs(1));
    assert_eq!(
        client.resolve_url("/static/r.pdf"),
        "http://127.0.0.1:5000/static/r.pdf"
    );
    assert_eq!(
        client.resolve_url("https://cdn.example/r.pdf"),
        "https://cdn.example/r.pdf"
    );
}
