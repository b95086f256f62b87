/// Dashboard server routing tests.
///
/// Drives `web::route` directly with form bodies, the way the browser posts
/// them, and checks the resulting page.
mod common;

use clinic_dash::api::SlotState;
use clinic_dash::web::{Reply, route};
use tiny_http::Method;

use common::{FakeBackend, TODAY, dashboard};

fn page_of(reply: Reply) -> String {
    match reply {
        Reply::Page(html) => html,
        other => panic!("expected a page, got {other:?}"),
    }
}

#[test]
fn form_posts_redirect_to_dashboard() {
    let mut dash = dashboard(FakeBackend::new());
    let reply = route(&mut dash, &Method::Post, "/chat", Some("message=hi+there"));
    assert_eq!(reply, Reply::Redirect);
    assert_eq!(dash.state().chat.messages[0].text, "hi there");
}

#[test]
fn tab_query_switches_before_render() {
    let backend = FakeBackend::new().with_slot(TODAY, "09:00", SlotState::Available, None);
    let mut dash = dashboard(backend);

    let html = page_of(route(&mut dash, &Method::Get, "/?tab=calendar", None));
    assert!(html.contains("<section id=\"calendar\" class=\"tab-content active\">"));
    assert!(html.contains("name=\"time\" value=\"09:00\""));
}

#[test]
fn unknown_tab_is_a_bad_request() {
    let mut dash = dashboard(FakeBackend::new());
    let reply = route(&mut dash, &Method::Post, "/tab", Some("tab=billing"));
    assert_eq!(reply, Reply::BadRequest("unknown tab: billing".to_string()));

    let reply = route(&mut dash, &Method::Get, "/?tab=billing", None);
    assert!(matches!(reply, Reply::BadRequest(_)));
}

#[test]
fn alerts_are_shown_once() {
    let mut dash = dashboard(FakeBackend::new());
    route(&mut dash, &Method::Post, "/medicine", Some("condition="));

    let first = page_of(route(&mut dash, &Method::Get, "/", None));
    assert!(first.contains("Enter a condition."));
    let second = page_of(route(&mut dash, &Method::Get, "/", None));
    assert!(!second.contains("Enter a condition."));
}

#[test]
fn toggle_form_round_trip() {
    let backend = FakeBackend::new().with_slot(TODAY, "10:00", SlotState::Available, None);
    let mut dash = dashboard(backend);
    route(&mut dash, &Method::Post, "/calendar/date", Some("date=2024-05-01"));

    let body = "date=2024-05-01&time=10%3A00&action=block";
    assert_eq!(
        route(&mut dash, &Method::Post, "/calendar/toggle", Some(body)),
        Reply::Redirect
    );
    assert_eq!(dash.backend().status_of(TODAY, "10:00"), Some(SlotState::Blocked));

    let body = "date=2024-05-01&time=10%3A00&action=explode";
    assert!(matches!(
        route(&mut dash, &Method::Post, "/calendar/toggle", Some(body)),
        Reply::BadRequest(_)
    ));
}

#[test]
fn booking_form_books_selected_slot() {
    let backend = FakeBackend::new()
        .with_slot(TODAY, "10:00", SlotState::Available, None)
        .with_slot(TODAY, "12:00", SlotState::Available, None);
    let mut dash = dashboard(backend);

    route(&mut dash, &Method::Post, "/booking/date", Some("date=2024-05-01"));
    route(&mut dash, &Method::Post, "/booking/book", Some("slot=12%3A00"));

    let booked = dash.backend().booked.borrow();
    assert_eq!(booked[0].0, "2024-05-01T12:00:00");
}

#[test]
fn patient_modal_routes() {
    let backend = FakeBackend::new().with_patient(3, "Meera Iyer", "Asthma");
    let mut dash = dashboard(backend);

    route(&mut dash, &Method::Post, "/patients/open", Some("id=3"));
    assert!(page_of(route(&mut dash, &Method::Get, "/", None)).contains("patient-modal"));

    route(&mut dash, &Method::Post, "/modal/close", Some(""));
    assert!(!page_of(route(&mut dash, &Method::Get, "/", None)).contains("patient-modal"));
}

#[test]
fn backdrop_click_closes_modal() {
    let backend = FakeBackend::new().with_patient(3, "Meera Iyer", "Asthma");
    let mut dash = dashboard(backend);

    route(&mut dash, &Method::Post, "/patients/open", Some("id=3"));
    let html = page_of(route(&mut dash, &Method::Get, "/", None));
    // The backdrop form closes before the content box opens.
    let backdrop = html.find("action=\"/modal/backdrop\"").unwrap();
    let content = html.find("class=\"modal-content\"").unwrap();
    assert!(backdrop < content);
    assert!(!html[backdrop..content].contains("modal-content"));
    assert!(html[backdrop..content].contains("</form>"));

    assert_eq!(
        route(&mut dash, &Method::Post, "/modal/backdrop", Some("")),
        Reply::Redirect
    );
    assert!(!dash.state().patients.modal.visible);
    assert!(!page_of(route(&mut dash, &Method::Get, "/", None)).contains("patient-modal"));
}

#[test]
fn health_and_unknown_routes() {
    let mut dash = dashboard(FakeBackend::new());
    let Reply::Json(body) = route(&mut dash, &Method::Get, "/health", None) else {
        panic!("expected json");
    };
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["status"], "ok");
    assert_eq!(value["tab"], "patients");

    assert_eq!(route(&mut dash, &Method::Get, "/nope", None), Reply::NotFound);
    assert_eq!(route(&mut dash, &Method::Get, "/chat", None), Reply::NotFound);
}
