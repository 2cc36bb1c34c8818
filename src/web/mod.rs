//! Local dashboard server.
//!
//! A small synchronous HTTP server (`tiny_http`) that renders the model
//! comparison dashboard on each request:
//!
//! - `GET /` and `/dashboard` — the HTML dashboard
//! - `GET /api/models` — the active record set, ranked, as JSON
//! - `GET /health` — liveness plus whether live or sample data is active
//!
//! Launched via `textclass serve` (default: `http://127.0.0.1:9747`).

mod api;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::analytics::EventLogger;
use crate::api::{ApiClient, ModelSource};
use crate::config::TextclassConfig;

pub(crate) type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server. Blocks the current thread.
///
/// Requests are handled one at a time; a failing handler produces a 500
/// response and the loop carries on.
pub fn serve(config: &TextclassConfig) -> Result<()> {
    let addr = config.web.addr.as_str();
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    let client = ApiClient::from_config(config);
    let logger = EventLogger::from_config(config);

    println!("textclass dashboard running at http://{addr}");
    println!("Backend: {}", client.base_url());
    println!("Press Ctrl+C to stop.\n");

    if config.web.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let resp = dispatch(&method, &url, &client, &logger).unwrap_or_else(|e| error_response(&e));
        let status = resp.status_code().0;
        let _ = request.respond(resp);

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub(crate) fn dispatch(
    method: &Method,
    url: &str,
    source: &dyn ModelSource,
    logger: &EventLogger,
) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") | (&Method::Get, "/dashboard") => {
            Ok(api::get_dashboard(source, logger))
        }
        (&Method::Get, "/api/models") => api::get_models(source, logger),
        (&Method::Get, "/health") => api::get_health(source, logger),
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn not_found() -> HttpResponse {
    let body = r#"{"error": "not found"}"#;
    Response::from_data(body.as_bytes().to_vec())
        .with_header(content_type_json())
        .with_status_code(StatusCode(404))
}

fn error_response(err: &anyhow::Error) -> HttpResponse {
    let body = serde_json::json!({ "error": format!("{err:#}") }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(500))
}

pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8").unwrap()
}

pub(crate) fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").unwrap()
}

/// Best-effort: open a URL in the system browser.
fn open_browser(url: &str) -> Result<()> {
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

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Read;

    use super::*;
    use crate::api::ApiError;
    use crate::models::ModelRecord;

    struct Offline;

    impl ModelSource for Offline {
        fn fetch_models(&self) -> Result<Vec<ModelRecord>, ApiError> {
            Err(ApiError::Transport("connection refused".to_string()))
        }
    }

    fn body(resp: HttpResponse) -> String {
        let mut out = String::new();
        resp.into_reader().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn unknown_route_is_404() {
        let resp = dispatch(&Method::Get, "/nope", &Offline, &EventLogger::disabled()).unwrap();
        assert_eq!(resp.status_code().0, 404);
    }

    #[test]
    fn dashboard_route_serves_html() {
        let resp = dispatch(&Method::Get, "/?x=1", &Offline, &EventLogger::disabled()).unwrap();
        assert_eq!(resp.status_code().0, 200);
        let html = body(resp);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Passive Aggressive"));
    }

    #[test]
    fn post_to_dashboard_is_404() {
        let resp = dispatch(&Method::Post, "/", &Offline, &EventLogger::disabled()).unwrap();
        assert_eq!(resp.status_code().0, 404);
    }

    #[test]
    fn error_response_is_json_500() {
        let resp = error_response(&anyhow::anyhow!("boom"));
        assert_eq!(resp.status_code().0, 500);
        assert_eq!(body(resp), r#"{"error":"boom"}"#);
    }
}
