//! API routes for puented.

use crate::serial;
use crate::server::{page_response, AppState};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use puente_common::{ErrorEvent, ErrorLevel, Interception};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

type AppStateArc = Arc<AppState>;

// ============================================================================
// Health Routes
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub debug: bool,
}

pub fn health_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/health", get(health))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        debug: state.policy.debug,
    })
}

// ============================================================================
// Device Routes
// ============================================================================

pub fn device_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/device/status", get(device_status))
        .route("/v1/device/errors", get(device_errors))
        .route("/v1/device/selftest", get(device_selftest))
}

#[derive(Debug, Serialize)]
struct DeviceStatus {
    port: Option<String>,
    baudrate: Option<u32>,
    reachable: bool,
    /// Failure detail; present only when policy lets the error display.
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

async fn device_status(State(state): State<AppStateArc>) -> Response {
    let device = &state.config.device;

    let event = match serial::probe_port(device) {
        Ok(()) => {
            return Json(DeviceStatus {
                port: device.port.clone(),
                baudrate: device.baudrate,
                reachable: true,
                error: None,
            })
            .into_response();
        }
        Err(event) => event,
    };

    let detail = event.message.clone();
    match state.interceptor.intercept(&event) {
        Interception::Escalated(fault) => {
            page_response(state.dispatcher.dispatch(&fault.into()))
        }
        Interception::Suppressed => Json(DeviceStatus {
            port: device.port.clone(),
            baudrate: device.baudrate,
            reachable: false,
            error: None,
        })
        .into_response(),
        Interception::PassThrough => Json(DeviceStatus {
            port: device.port.clone(),
            baudrate: device.baudrate,
            reachable: false,
            error: Some(detail),
        })
        .into_response(),
    }
}

#[derive(Debug, Serialize)]
struct DeviceErrors {
    count: usize,
    records: Vec<String>,
}

async fn device_errors(State(state): State<AppStateArc>) -> Json<DeviceErrors> {
    let records = state.interceptor.device_log().recent(20);
    Json(DeviceErrors {
        count: records.len(),
        records,
    })
}

#[derive(Debug, Serialize)]
struct SelftestResponse {
    status: &'static str,
}

/// User-triggered check. A failure here is reported at user-error level,
/// which always escalates into the dispatcher.
async fn device_selftest(State(state): State<AppStateArc>) -> Response {
    let probe = match serial::probe_port(&state.config.device) {
        Ok(()) => {
            info!("device selftest passed");
            return Json(SelftestResponse { status: "ok" }).into_response();
        }
        Err(probe) => probe,
    };

    let event = ErrorEvent::new(
        ErrorLevel::UserError,
        format!("selftest: {}", probe.message),
        probe.file.clone(),
        probe.line,
    );

    match state.interceptor.intercept(&event) {
        Interception::Escalated(fault) => {
            page_response(state.dispatcher.dispatch(&fault.into()))
        }
        // User-level errors always escalate; nothing reaches these arms.
        Interception::Suppressed | Interception::PassThrough => {
            Json(SelftestResponse { status: "failed" }).into_response()
        }
    }
}
