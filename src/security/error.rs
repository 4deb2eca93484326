use crate::db::error::RepositoryError;
use chrono::{DateTime, Utc};

/// Refus rendus par le gate de connexion
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Too many failed attempts, locked until {until}")]
    Locked { until: DateTime<Utc> },
    #[error("Banned until {until}: {reason}")]
    Banned {
        until: DateTime<Utc>,
        reason: String,
    },
    /// Adresse ou identifiant trop long pour être compté
    #[error("Invalid subject: {0}")]
    InvalidSubject(&'static str),
    #[error(transparent)]
    Store(#[from] RepositoryError),
}
