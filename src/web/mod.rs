//! Local web dashboard for clinic-dash.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that owns one
//! [`Dashboard`] and serves its view state as a server-rendered page. Every
//! control on the page posts a form; the route applies the matching
//! controller action and redirects back to `/`.
//!
//! Launched via `clinic-dash serve` (default: `http://127.0.0.1:9750`).

pub mod form;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::{Backend, ClinicClient, ToggleAction};
use crate::config::schema::DashConfig;
use crate::dashboard::{ClickTarget, Dashboard, Tab};
use crate::diagnostics::Diagnostics;
use crate::render::html;

use self::form::Form;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server with the resolved config.
///
/// Blocks the current thread. Handles requests sequentially (sufficient for
/// a local single-user dashboard); backend calls run inline, so a slow AI
/// request holds the page until it answers.
pub fn serve(config: &DashConfig) -> Result<()> {
    let initial: Tab = config
        .dashboard
        .initial_tab
        .parse()
        .context("invalid dashboard.initial_tab")?;

    let client = ClinicClient::from_config(&config.backend);
    let mut dashboard = Dashboard::new(client)
        .with_diagnostics(Diagnostics::from_config(&config.diagnostics));
    dashboard.activate(initial);
    dashboard.fetch_events();

    let addr = &config.server.bind;
    let server = Server::http(addr.as_str())
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("clinic dashboard running at http://{addr}");
    println!("backend: {}", dashboard.backend().base_url());
    println!("Press Ctrl+C to stop.\n");

    if config.server.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let body = if method == Method::Post {
            let mut buf = String::new();
            let _ = request.as_reader().read_to_string(&mut buf);
            Some(buf)
        } else {
            None
        };

        let reply = route(&mut dashboard, &method, &url, body.as_deref());
        let _ = request.respond(reply.into_response());

        // Brief access log
        println!(
            "{} {} {}",
            method,
            url,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Outcome of one request, before it becomes an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// The rendered dashboard.
    Page(String),
    /// `303 See Other` back to the dashboard.
    Redirect,
    Json(String),
    BadRequest(String),
    NotFound,
}

/// Apply a request to the dashboard.
pub fn route<B: Backend>(
    dashboard: &mut Dashboard<B>,
    method: &Method,
    url: &str,
    body: Option<&str>,
) -> Reply {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);
    let form = Form::parse(body.unwrap_or(""));

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => {
            let query = Form::from_query(url);
            if let Some(tab) = query.get("tab")
                && let Err(e) = dashboard.switch_tab(tab)
            {
                return Reply::BadRequest(e.to_string());
            }
            render_page(dashboard)
        }
        (&Method::Get, "/health") => Reply::Json(
            serde_json::json!({
                "status": "ok",
                "tab": dashboard.state().current_tab.id(),
            })
            .to_string(),
        ),

        (&Method::Post, "/tab") => match dashboard.switch_tab(form.field("tab")) {
            Ok(()) => Reply::Redirect,
            Err(e) => Reply::BadRequest(e.to_string()),
        },

        (&Method::Post, "/patients/open") => {
            // Failures leave the modal as it was; the error is in the
            // diagnostics log.
            let _ = dashboard.show_patient_details(form.field("id"));
            Reply::Redirect
        }
        (&Method::Post, "/modal/close") => {
            dashboard.close_modal();
            Reply::Redirect
        }
        (&Method::Post, "/modal/backdrop") => {
            dashboard.click(ClickTarget::ModalBackdrop);
            Reply::Redirect
        }

        (&Method::Post, "/chat") => {
            dashboard.set_chat_input(form.field("message"));
            dashboard.send_message();
            Reply::Redirect
        }
        (&Method::Post, "/prescription") => {
            dashboard.set_prescription_text(form.field("text"));
            dashboard.analyze_prescription();
            Reply::Redirect
        }
        (&Method::Post, "/medicine") => {
            dashboard.set_condition(form.field("condition"));
            dashboard.get_medicine_recommendations();
            Reply::Redirect
        }
        (&Method::Post, "/medicine/pdf") => {
            dashboard.download_medicine_pdf();
            Reply::Redirect
        }

        (&Method::Post, "/calendar/date") => {
            dashboard.set_manage_date(form.field("date"));
            dashboard.load_doc_slots();
            Reply::Redirect
        }
        (&Method::Post, "/calendar/toggle") => {
            let Some(action) = ToggleAction::parse(form.field("action")) else {
                return Reply::BadRequest(format!("unknown action: {}", form.field("action")));
            };
            dashboard.toggle_slot(form.field("date"), form.field("time"), action);
            Reply::Redirect
        }

        (&Method::Post, "/booking/date") => {
            dashboard.set_booking_date(form.field("date"));
            dashboard.fetch_slots();
            Reply::Redirect
        }
        (&Method::Post, "/booking/book") => {
            dashboard.select_slot(form.field("slot"));
            dashboard.book_slot();
            Reply::Redirect
        }

        _ => Reply::NotFound,
    }
}

/// Render the page, then drop the alerts and links it showed.
fn render_page<B: Backend>(dashboard: &mut Dashboard<B>) -> Reply {
    let page = html::page(dashboard.state());
    dashboard.take_alerts();
    dashboard.take_opened();
    Reply::Page(page)
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

impl Reply {
    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        match self {
            Self::Page(html) => Response::from_data(html.into_bytes())
                .with_header(content_type_html())
                .with_status_code(StatusCode(200)),
            Self::Redirect => Response::from_data(Vec::new())
                .with_header(location("/"))
                .with_status_code(StatusCode(303)),
            Self::Json(body) => Response::from_data(body.into_bytes())
                .with_header(content_type_json())
                .with_status_code(StatusCode(200)),
            Self::BadRequest(message) => {
                let body = serde_json::json!({ "error": message }).to_string();
                Response::from_data(body.into_bytes())
                    .with_header(content_type_json())
                    .with_status_code(StatusCode(400))
            }
            Self::NotFound => Response::from_data(br#"{"error": "not found"}"#.to_vec())
                .with_header(content_type_json())
                .with_status_code(StatusCode(404)),
        }
    }
}

fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid")
}

fn location(target: &str) -> Header {
    Header::from_bytes("Location", target).expect("static header is valid")
}

/// Attempt to open a URL in the system default browser.
pub fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}
