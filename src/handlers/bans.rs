// src/handlers/bans.rs

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::{Json, http::StatusCode};
use personnel_gate_api::{ActiveBanQuery, BanResponse, CreateBanRequest, CreateBanResponse};

use super::blocking;
use crate::app::AppState;
use crate::audit::{self, GateOutcome};
use crate::error::AppError;
use crate::security::extractors::ServiceCaller;
use crate::security::identity::{
    MAX_ADDRESS_LEN, MAX_IDENTIFIER_LEN, address_fits, identifier_fits, normalize_address,
    normalize_identifier,
};

// Un an
const MAX_BAN_MINUTES: i64 = 60 * 24 * 365;

/// POST /gate/bans
/// Crée un ban explicite (décision d'opérateur ou règle d'escalade)
pub async fn create_ban(
    State(state): State<AppState>,
    _caller: ServiceCaller,
    payload: Result<Json<CreateBanRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateBanResponse>), AppError> {
    let Json(payload) = payload?;

    let address = subject(payload.address.as_deref(), normalize_address);
    let identifier = subject(payload.identifier.as_deref(), normalize_identifier);
    if address.is_none() && identifier.is_none() {
        return Err(AppError::validation(
            "At least one of address or identifier is required",
        ));
    }
    if !address.as_deref().is_none_or(address_fits) {
        return Err(AppError::validation(format!(
            "address must be at most {MAX_ADDRESS_LEN} characters"
        )));
    }
    if !identifier.as_deref().is_none_or(identifier_fits) {
        return Err(AppError::validation(format!(
            "identifier must be at most {MAX_IDENTIFIER_LEN} characters"
        )));
    }
    if !(1..=MAX_BAN_MINUTES).contains(&payload.minutes) {
        return Err(AppError::validation(format!(
            "minutes must be between 1 and {MAX_BAN_MINUTES}"
        )));
    }
    if payload.reason.trim().is_empty() {
        return Err(AppError::validation("reason must not be empty"));
    }

    let gate = state.gate.clone();
    let ban = blocking(move || {
        gate.bans()
            .create_ban(
                address.as_deref(),
                identifier.as_deref(),
                payload.reason.trim(),
                payload.minutes,
            )
            .map_err(AppError::from)
    })
    .await?;

    let audit_subject = format!(
        "{}|{}",
        ban.address.as_deref().unwrap_or("-"),
        ban.identifier.as_deref().unwrap_or("-")
    );
    audit::record(GateOutcome::BanCreated, &audit_subject, Some(&ban.reason));

    Ok((
        StatusCode::CREATED,
        Json(CreateBanResponse {
            id: ban.id,
            banned_until: ban.banned_until,
        }),
    ))
}

/// GET /gate/bans/active?address=&identifier=
/// Ban actif le plus long pour l'adresse ou l'identifiant
pub async fn active_ban(
    State(state): State<AppState>,
    _caller: ServiceCaller,
    query: Result<Query<ActiveBanQuery>, QueryRejection>,
) -> Result<Json<BanResponse>, AppError> {
    let Query(query) = query?;

    let address = subject(query.address.as_deref(), normalize_address);
    let identifier = subject(query.identifier.as_deref(), normalize_identifier);

    let gate = state.gate.clone();
    let ban = blocking(move || {
        gate.bans()
            .get_active_ban(address.as_deref(), identifier.as_deref())
            .map_err(AppError::from)
    })
    .await?;

    ban.map(|ban| Json(BanResponse::from(ban)))
        .ok_or_else(|| AppError::not_found("No active ban"))
}

/// Valeur normalisée, `None` si absente ou vide
fn subject(raw: Option<&str>, normalize: fn(&str) -> String) -> Option<String> {
    raw.map(normalize).filter(|value| !value.is_empty())
}
