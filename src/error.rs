// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use personnel_gate_api::ErrorResponse;

use crate::db::error::RepositoryError;
use crate::scan::ScanError;
use crate::security::GateError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    // === Erreurs du gate de connexion ===
    #[error("Too many attempts")]
    Locked,
    #[error("Access banned")]
    Banned,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // === Erreurs d'analyse ===
    #[error("Infected file: {}", .signature.as_deref().unwrap_or("unknown signature"))]
    InfectedFile { signature: Option<String> },
    #[error("Scan backend unavailable: {0}")]
    ScanBackendUnavailable(String),

    // === Erreurs Repository ===
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),

    // === Erreurs de Validation ===
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // === Erreurs internes ===
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details, internal_detail) = self.get_error_info();

        if let Some(ref detail) = internal_detail {
            tracing::error!(error_code, %status, detail, "Request failed");
        }

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl AppError {
    /// Informations de réponse: (status, code, message public, détails publics, détail interne)
    fn get_error_info(
        &self,
    ) -> (
        StatusCode,
        &'static str,
        String,
        Option<String>,
        Option<String>,
    ) {
        match self {
            // 429 Too Many Requests, sans exposer les compteurs
            AppError::Locked => (
                StatusCode::TOO_MANY_REQUESTS,
                "TOO_MANY_ATTEMPTS",
                "Too many attempts, try again later".to_string(),
                None,
                None,
            ),

            // 403 Forbidden
            AppError::Banned => (
                StatusCode::FORBIDDEN,
                "ACCESS_BANNED",
                "Access temporarily blocked".to_string(),
                None,
                None,
            ),

            // 401 Unauthorized, appelant interne non authentifié
            AppError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
                None,
                None,
            ),

            // 423 Locked, la signature sert au tri par les opérateurs
            AppError::InfectedFile { signature } => (
                StatusCode::LOCKED,
                crate::scan::policy::VIRUS_DETECTED,
                "File rejected: malware detected".to_string(),
                signature.clone(),
                None,
            ),

            // 503 Service Unavailable
            AppError::ScanBackendUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SCAN_UNAVAILABLE",
                "File scanning is currently unavailable".to_string(),
                None,
                Some(msg.clone()),
            ),

            // 404 Not Found
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone(), None, None)
            }

            // 400 Bad Request
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
                None,
                None,
            ),
            AppError::InvalidInput(msg) => (
                StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                msg.clone(),
                None,
                None,
            ),

            // 500 Internal Server Error
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred with the database".to_string(),
                None,
                Some(msg.clone()),
            ),
            AppError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal server error occurred".to_string(),
                None,
                Some(msg.clone()),
            ),
        }
    }

    // === Constructeurs helpers ===
    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        AppError::DatabaseError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::InternalServerError(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        AppError::Unauthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    /// Retourne le code de statut HTTP
    pub fn status_code(&self) -> StatusCode {
        self.get_error_info().0
    }
}

// === Conversions automatiques depuis d'autres types d'erreurs ===

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::database(err.to_string())
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        match err {
            GateError::Locked { .. } => AppError::Locked,
            GateError::Banned { .. } => AppError::Banned,
            GateError::InvalidSubject(msg) => AppError::validation(msg),
            GateError::Store(e) => AppError::from(e),
        }
    }
}

impl From<ScanError> for AppError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::Infected { signature } => AppError::InfectedFile { signature },
            ScanError::BackendUnavailable(e) => AppError::ScanBackendUnavailable(e.to_string()),
            ScanError::InvalidPath(path) => {
                AppError::validation(format!("Path cannot be scanned: {path:?}"))
            }
        }
    }
}

// Depuis tokio::task::JoinError (appels au store sur le pool bloquant)
impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::internal(format!("Blocking task failed: {err}"))
    }
}

// Depuis axum::extract::rejection::JsonRejection
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::invalid_input(format!("Invalid JSON: {err}"))
    }
}

// Depuis axum::extract::rejection::QueryRejection
impl From<axum::extract::rejection::QueryRejection> for AppError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        AppError::invalid_input(format!("Invalid query: {err}"))
    }
}
