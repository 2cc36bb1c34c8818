//! Route handlers for the dashboard server.

use anyhow::{Context, Result};
use serde::Serialize;
use tiny_http::{Header, Response, StatusCode};

use crate::analytics::EventLogger;
use crate::api::ModelSource;
use crate::dashboard::{DashboardModel, DashboardState, DataSource, HtmlDashboard, render};

use super::{HttpResponse, content_type_html, content_type_json};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    /// `"live"` or `"sample"`.
    data_source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    fallback_reason: Option<String>,
}

fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

fn source_label(source: &DataSource) -> &'static str {
    match source {
        DataSource::Live => "live",
        DataSource::Sample { .. } => "sample",
    }
}

/// `GET /` — dashboard page, rendered from a fresh fetch.
pub fn get_dashboard(source: &dyn ModelSource, logger: &EventLogger) -> HttpResponse {
    let state = DashboardState::load(source, logger);
    let mut view = HtmlDashboard::new();
    render(&DashboardModel::build(&state), &mut view);

    Response::from_data(view.to_html().into_bytes())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// `GET /api/models` — active records, ranked by macro F1.
///
/// The `X-Data-Source` header says whether these are live or sample records.
pub fn get_models(source: &dyn ModelSource, logger: &EventLogger) -> Result<HttpResponse> {
    let state = DashboardState::load(source, logger);
    let model = DashboardModel::build(&state);

    let mut resp = json_response(&model.ranked)?;
    if let Ok(header) = Header::from_bytes("X-Data-Source", source_label(state.source())) {
        resp.add_header(header);
    }
    Ok(resp)
}

/// `GET /health`
pub fn get_health(source: &dyn ModelSource, logger: &EventLogger) -> Result<HttpResponse> {
    let state = DashboardState::load(source, logger);
    let fallback_reason = match state.source() {
        DataSource::Live => None,
        DataSource::Sample { reason } => Some(reason.clone()),
    };

    json_response(&HealthResponse {
        status: "healthy",
        data_source: source_label(state.source()),
        fallback_reason,
    })
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

    struct Fixed(Vec<ModelRecord>);

    impl ModelSource for Fixed {
        fn fetch_models(&self) -> Result<Vec<ModelRecord>, ApiError> {
            Ok(self.0.clone())
        }
    }

    fn body(resp: HttpResponse) -> String {
        let mut out = String::new();
        resp.into_reader().read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn models_are_ranked_with_backend_field_names() {
        let source = Fixed(vec![
            ModelRecord::new("B", 0.2, 0.2, 0.2, 1.0),
            ModelRecord::new("A", 0.8, 0.8, 0.8, 2.0),
        ]);
        let resp = get_models(&source, &EventLogger::disabled()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body(resp)).unwrap();
        assert_eq!(json[0]["Model"], "A");
        assert_eq!(json[1]["Model"], "B");
    }

    #[test]
    fn empty_backend_serves_sample_set() {
        let resp = get_models(&Fixed(vec![]), &EventLogger::disabled()).unwrap();
        let records: Vec<ModelRecord> = serde_json::from_str(&body(resp)).unwrap();
        assert_eq!(records.len(), 10);
        assert_eq!(records[0].name, "Passive Aggressive");
    }

    #[test]
    fn health_reports_data_source() {
        let resp = get_health(&Fixed(vec![]), &EventLogger::disabled()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body(resp)).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["data_source"], "sample");
        assert_eq!(json["fallback_reason"], "backend returned no records");

        let live = Fixed(vec![ModelRecord::new("A", 0.5, 0.5, 0.5, 1.0)]);
        let resp = get_health(&live, &EventLogger::disabled()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body(resp)).unwrap();
        assert_eq!(json["data_source"], "live");
        assert!(json.get("fallback_reason").is_none());
    }
}
