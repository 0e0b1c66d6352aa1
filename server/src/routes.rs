//! HTTP handlers for the three client endpoints plus the bus manifest.
//!
//! Attendance verdicts are always `200 OK` with a `{status, message}` body; only a
//! body that cannot be read at all is an HTTP error.

use crate::error::AppError;
use crate::geofence;
use crate::state::{AttendanceRecord, ServerState};
use crate::token;
use attendance::{AttendanceResult, AttendanceSubmission, LocationUpdate, Position};
use attendance::types::TokenResponse;
use axum::{
    Json, Router,
    extract::{Query, State, rejection::JsonRejection},
    routing::{get, post},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const MANIFEST_LIMIT: usize = 50;
pub const ALREADY_MARKED: &str = "Attendance already marked with this QR Code";

pub fn routes() -> Router<ServerState> {
    Router::new()
        .route("/get-qr", get(get_qr))
        .route("/update-location", post(update_location))
        .route("/driver-heartbeat", post(update_location))
        .route("/mark-attendance", post(mark_attendance))
        .route("/bus-manifest", get(bus_manifest))
}

#[derive(Debug, Deserialize)]
pub struct BusQuery {
    pub bus_no: Option<String>,
}

impl BusQuery {
    fn resolve(self, state: &ServerState) -> String {
        self.bus_no
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| state.settings.default_bus_no.clone())
    }
}

fn checked_bus_no(bus_no: String) -> Result<String, AppError> {
    if token::is_valid_bus_no(&bus_no) {
        Ok(bus_no)
    } else {
        Err(AppError::InvalidBusNumber(bus_no))
    }
}

async fn get_qr(
    State(state): State<ServerState>,
    Query(query): Query<BusQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let bus_no = checked_bus_no(query.resolve(&state))?;
    let qr_data = token::mint(&bus_no, Utc::now());
    tracing::debug!(%bus_no, %qr_data, "Minted token");
    Ok(Json(TokenResponse { qr_data }))
}

async fn update_location(
    State(state): State<ServerState>,
    payload: Result<Json<LocationUpdate>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(update) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let bus_no = checked_bus_no(update.bus_no)?;
    let position = Position::new(update.lat, update.lng).ok_or(AppError::InvalidPosition)?;

    state.update_bus(&bus_no, position).await;
    tracing::debug!(%bus_no, ?position, "Bus location updated");
    Ok(Json(json!({ "status": "success", "sync": true })))
}

async fn mark_attendance(
    State(state): State<ServerState>,
    payload: Result<Json<AttendanceSubmission>, JsonRejection>,
) -> Result<Json<AttendanceResult>, AppError> {
    let Json(submission) = payload.map_err(|e| AppError::MalformedPayload(e.body_text()))?;
    let verdict = verify(&state, &submission).await;
    match &verdict {
        Ok(()) => tracing::info!(
            qr_data = %submission.qr_data,
            device_id = %submission.device_id,
            "Attendance marked"
        ),
        Err(reason) => tracing::info!(qr_data = %submission.qr_data, %reason, "Attendance rejected"),
    }
    Ok(Json(match verdict {
        Ok(()) => AttendanceResult::success("Attendance Marked Successfully"),
        Err(reason) => AttendanceResult::failure(reason),
    }))
}

async fn verify(state: &ServerState, submission: &AttendanceSubmission) -> Result<(), String> {
    let (bus_no, issued) = token::split(&submission.qr_data).ok_or("Invalid QR Code")?;

    let bus = state
        .bus(bus_no)
        .await
        .ok_or("Bus not active/Syncing...")?;

    let now = Utc::now();
    let fresh = token::issued_at(issued)
        .is_some_and(|at| token::is_fresh(at, now, state.settings.token_max_age_seconds));
    if !fresh {
        return Err("QR Code expired".into());
    }

    let student = Position::new(submission.lat, submission.lng).ok_or("Invalid coordinates")?;
    let distance = geofence::check(student, bus.position, state.settings.geofence_radius_meters)
        .map_err(|d| format!("Geofence Failed! Too far from bus ({}m).", d as i64))?;

    if submission.device_id.trim().is_empty() {
        return Err("Missing Device Identifier".into());
    }

    let recorded = state
        .try_record(AttendanceRecord {
            bus_no: bus_no.to_owned(),
            device_id: submission.device_id.clone(),
            qr_data: submission.qr_data.clone(),
            position: student,
            distance_meters: distance,
            marked_at: now,
        })
        .await;
    if !recorded {
        return Err(ALREADY_MARKED.into());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    device_id: String,
    timestamp: String,
    distance_meters: f64,
    status: &'static str,
    method: &'static str,
}

async fn bus_manifest(State(state): State<ServerState>, Query(query): Query<BusQuery>) -> Json<Value> {
    let bus_no = query.resolve(&state);
    let manifest: Vec<ManifestEntry> = state
        .manifest(&bus_no, Utc::now().date_naive(), MANIFEST_LIMIT)
        .await
        .into_iter()
        .map(|r| ManifestEntry {
            device_id: r.device_id,
            timestamp: r.marked_at.format("%H:%M:%S").to_string(),
            distance_meters: (r.distance_meters * 10.0).round() / 10.0,
            status: "VERIFIED",
            method: "QR",
        })
        .collect();
    let count = manifest.len();
    Json(json!({ "bus_no": bus_no, "manifest": manifest, "count": count }))
}
