use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts};
use std::convert::Infallible;
use std::net::SocketAddr;

use crate::app::AppState;
use crate::error::AppError;
use crate::security::identity::derive_client_address;

const FORWARDED_FOR: &str = "x-forwarded-for";
const UNKNOWN_ADDRESS: &str = "unknown";
const BEARER: &str = "Bearer ";

/// Adresse client canonique de la requête.
///
/// Dérivée de l'adresse de connexion et, si le proxy est de confiance, de la
/// première valeur de `X-Forwarded-For`. N'échoue jamais.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl FromRequestParts<AppState> for ClientAddress {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let connection = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map_or_else(
                || {
                    tracing::debug!("No peer address on request, using placeholder");
                    UNKNOWN_ADDRESS.to_string()
                },
                |ConnectInfo(addr)| addr.ip().to_string(),
            );

        let forwarded = parts
            .headers
            .get(FORWARDED_FOR)
            .and_then(|h| h.to_str().ok());

        Ok(ClientAddress(derive_client_address(
            &connection,
            forwarded,
            state.trust_proxy(),
        )))
    }
}

/// Appelant interne authentifié par le jeton de service partagé.
///
/// Exige `Authorization: Bearer <GATE_SERVICE_TOKEN>`. Requis par toutes les
/// routes `/gate`.
#[derive(Debug, Clone, Copy)]
pub struct ServiceCaller;

impl FromRequestParts<AppState> for ServiceCaller {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing service token"))?;

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|value| value.strip_prefix(BEARER))
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header"))?;

        if !state.accepts_service_token(token) {
            tracing::warn!("Rejected gate call with an invalid service token");
            return Err(AppError::unauthorized("Invalid service token"));
        }

        Ok(ServiceCaller)
    }
}

/// Comparaison en temps constant pour des longueurs égales
pub(crate) fn tokens_match(expected: &[u8], provided: &[u8]) -> bool {
    if expected.len() != provided.len() {
        return false;
    }
    expected
        .iter()
        .zip(provided)
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_match_requires_identical_bytes() {
        assert!(tokens_match(b"s3cret-service-token", b"s3cret-service-token"));
        assert!(!tokens_match(b"s3cret-service-token", b"s3cret-service-tokeN"));
        assert!(!tokens_match(b"s3cret-service-token", b"s3cret"));
        assert!(!tokens_match(b"s3cret-service-token", b""));
    }
}
