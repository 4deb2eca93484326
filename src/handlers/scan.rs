// src/handlers/scan.rs

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use personnel_gate_api::{ScanRequest, ScanResponse, ScanStatus};
use std::path::Path;

use crate::app::AppState;
use crate::error::AppError;
use crate::scan::ScanDecision;
use crate::security::extractors::ServiceCaller;

/// POST /gate/scan
/// Analyse un fichier déposé avant son stockage définitif
pub async fn scan_file(
    State(state): State<AppState>,
    _caller: ServiceCaller,
    payload: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<Json<ScanResponse>, AppError> {
    let Json(payload) = payload?;

    let decision = state.scan.scan_file_or_throw(Path::new(&payload.path)).await?;

    let status = match decision {
        ScanDecision::Skipped => ScanStatus::Skipped,
        ScanDecision::Clean | ScanDecision::FailedOpen => ScanStatus::Clean,
    };
    Ok(Json(ScanResponse { status }))
}
