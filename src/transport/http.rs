//! The `/api/hash` endpoint and its JSON envelope.

use super::ip_filter::IpFilterLayer;
use crate::service::ValuesService;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::{net::IpAddr, time::Duration};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Settings for the HTTP layer.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    pub request_timeout: Duration,
    pub blocked_ips: Vec<IpAddr>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(7),
            blocked_ips: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ValuesBody<'a> {
    status: u16,
    values: [&'a str; 2],
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    status: u16,
    message: String,
}

async fn latest_values(State(service): State<ValuesService>) -> Response {
    match service.latest() {
        Ok([older, newer]) => {
            let body = ValuesBody {
                status: StatusCode::OK.as_u16(),
                values: [older.as_str(), newer.as_str()],
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "latest values unavailable");
            let status = StatusCode::INTERNAL_SERVER_ERROR;
            let body = ErrorBody {
                status: status.as_u16(),
                message: e.to_string(),
            };
            (status, Json(body)).into_response()
        }
    }
}

/// Build the HTTP router around `service`.
///
/// Requests are traced, bounded by `config.request_timeout` and filtered
/// against `config.blocked_ips`.
pub fn router(service: ValuesService, config: &TransportConfig) -> Router {
    Router::new()
        .route("/api/hash", get(latest_values))
        .with_state(service)
        .layer(IpFilterLayer::new(config.blocked_ips.iter().copied()))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
