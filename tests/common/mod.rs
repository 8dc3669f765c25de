//! Shared test utilities for statuswatch integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use statuswatch::board::{BoardService, PlotOptions, TerminalBoard, TerminalCharts};
use statuswatch::dashboard::Dashboard;
use statuswatch::poller::{ClientConfig, StatusClient};
use statuswatch::render::Renderer;
use statuswatch::status::ServiceKey;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// Well-Known Test Constants
// =============================================================================

/// Path the mock status API serves on.
pub const STATUS_PATH: &str = "/api/status";

/// 2024-01-01T00:00:00Z in milliseconds.
pub const T0_MS: i64 = 1_704_067_200_000;

/// An endpoint nothing listens on.
pub const REFUSED_ENDPOINT: &str = "http://127.0.0.1:1/api/status";

// =============================================================================
// Response Builders
// =============================================================================

/// One service entry as the status API sends it.
pub fn service_json(status: &str, url: Option<&str>, history: &[(&str, &str)]) -> Value {
    json!({
        "status": status,
        "url": url,
        "history": history
            .iter()
            .map(|(ts, s)| json!([ts, s]))
            .collect::<Vec<_>>(),
    })
}

/// A three-service report, one service per bucket, keys deliberately out of
/// alphabetical order.
pub fn sample_report() -> Value {
    json!({
        "zeta": service_json(
            "online",
            Some("https://zeta.example.com"),
            &[
                ("2024-01-01T00:00:00Z", "online"),
                ("2024-01-01T00:01:00Z", "online"),
            ],
        ),
        "alpha": service_json(
            "offline_conn_error",
            None,
            &[
                ("2024-01-01T00:00:00Z", "online"),
                ("2024-01-01T00:01:00Z", "offline_conn_error"),
            ],
        ),
        "mid": service_json("error_503", Some("https://mid.example.com"), &[]),
    })
}

// =============================================================================
// Mock Server Helpers
// =============================================================================

/// Serve `body` as the status report.
pub async fn mount_report(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path(STATUS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

pub fn endpoint(server: &MockServer) -> String {
    format!("{}{}", server.uri(), STATUS_PATH)
}

pub fn client_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        endpoint: endpoint(server),
        interval_seconds: 1,
        timeout_seconds: 2,
    }
}

pub fn client_for(server: &MockServer) -> StatusClient {
    StatusClient::new(client_config(server)).unwrap()
}

// =============================================================================
// Dashboard Builders
// =============================================================================

pub fn key(s: &str) -> ServiceKey {
    ServiceKey::parse(s).unwrap()
}

/// Terminal dashboard with one card per key, colors off.
pub fn terminal_dashboard(keys: &[&str]) -> Dashboard<TerminalBoard, TerminalCharts> {
    let board = TerminalBoard::new(keys.iter().map(|k| BoardService::new(key(k), *k)));
    let charts = TerminalCharts::new(PlotOptions {
        recent_changes: 3,
        color: false,
    });
    Dashboard::new(Renderer::new(board, charts))
}
