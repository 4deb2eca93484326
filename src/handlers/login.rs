// src/handlers/login.rs

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Json, http::StatusCode};
use personnel_gate_api::{LoginCheckRequest, LoginCheckResponse, LoginOutcomeRequest};

use super::blocking;
use crate::app::AppState;
use crate::error::AppError;
use crate::security::extractors::{ClientAddress, ServiceCaller};

/// POST /gate/login/check
/// À appeler avant de vérifier les identifiants: ban, puis verrou
pub async fn check_login(
    State(state): State<AppState>,
    _caller: ServiceCaller,
    ClientAddress(address): ClientAddress,
    payload: Result<Json<LoginCheckRequest>, JsonRejection>,
) -> Result<Json<LoginCheckResponse>, AppError> {
    let Json(payload) = payload?;
    if payload.identifier.trim().is_empty() {
        return Err(AppError::validation("identifier must not be empty"));
    }

    let gate = state.gate.clone();
    let client_address = address.clone();
    blocking(move || {
        gate.check(&address, &payload.identifier)?;
        Ok(())
    })
    .await?;

    Ok(Json(LoginCheckResponse {
        allowed: true,
        client_address,
    }))
}

/// POST /gate/login/outcome
/// Reporte le résultat de la vérification des identifiants
pub async fn report_login(
    State(state): State<AppState>,
    _caller: ServiceCaller,
    ClientAddress(address): ClientAddress,
    payload: Result<Json<LoginOutcomeRequest>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(payload) = payload?;
    if payload.identifier.trim().is_empty() {
        return Err(AppError::validation("identifier must not be empty"));
    }

    let gate = state.gate.clone();
    blocking(move || {
        gate.report(&address, &payload.identifier, payload.success)?;
        Ok(())
    })
    .await?;

    Ok(StatusCode::NO_CONTENT)
}
