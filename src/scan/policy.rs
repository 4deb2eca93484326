use super::{BackendError, ScanBackend, ScanOutcome};
use crate::audit::{self, GateOutcome};
use crate::config::ScanConfig;
use std::path::Path;

/// Code de classification d'une détection
pub const VIRUS_DETECTED: &str = "virus_detected";
/// Statut HTTP `423 Locked` d'une détection
pub const VIRUS_DETECTED_STATUS: u16 = 423;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Virus detected: {}", .signature.as_deref().unwrap_or("unknown signature"))]
    Infected { signature: Option<String> },
    #[error("Scan backend unavailable: {0}")]
    BackendUnavailable(#[from] BackendError),
    #[error("Invalid scan path: {0}")]
    InvalidPath(String),
}

impl ScanError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Infected { .. } => VIRUS_DETECTED,
            Self::BackendUnavailable(_) => "scan_unavailable",
            Self::InvalidPath(_) => "invalid_path",
        }
    }

    pub fn status(&self) -> u16 {
        match self {
            Self::Infected { .. } => VIRUS_DETECTED_STATUS,
            Self::BackendUnavailable(_) => 503,
            Self::InvalidPath(_) => 400,
        }
    }
}

/// Issue non bloquante d'une analyse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanDecision {
    /// Analyse désactivée: aucun backend contacté, ce n'est pas un verdict « sain »
    Skipped,
    Clean,
    /// Backend en échec, fichier accepté (mode fail-open)
    FailedOpen,
}

/// Politique d'analyse appliquée au fichier déposé avant son stockage définitif.
#[derive(Debug, Clone)]
pub struct ScanPolicy {
    enabled: bool,
    fail_closed: bool,
    backend: ScanBackend,
}

impl ScanPolicy {
    pub fn new(backend: ScanBackend, enabled: bool, fail_closed: bool) -> Self {
        Self {
            enabled,
            fail_closed,
            backend,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(
            ScanBackend::from_config(config),
            config.enabled,
            config.fail_closed,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Analyse `path` une seule fois (pas de nouvelle tentative).
    ///
    /// Une détection est toujours une erreur. Un échec du backend n'en est une
    /// qu'en mode fail-closed; en fail-open il est journalisé et le fichier passe.
    pub async fn scan_file_or_throw(&self, path: &Path) -> Result<ScanDecision, ScanError> {
        let subject = path.display().to_string();

        if !self.enabled {
            audit::record(GateOutcome::ScanSkipped, &subject, None);
            return Ok(ScanDecision::Skipped);
        }

        if !self.backend.accepts(path) {
            audit::record(GateOutcome::ScanRejectedPath, &subject, None);
            return Err(ScanError::InvalidPath(subject));
        }

        match self.backend.scan(path).await {
            Ok(ScanOutcome::Clean) => {
                audit::record(GateOutcome::ScanClean, &subject, None);
                Ok(ScanDecision::Clean)
            }
            Ok(ScanOutcome::Infected { reason, signature }) => {
                audit::record(GateOutcome::ScanInfected, &subject, Some(&reason));
                Err(ScanError::Infected { signature })
            }
            Err(e) if self.fail_closed => {
                tracing::error!(
                    backend = %self.backend.describe(),
                    error = %e,
                    "Scan backend failed, rejecting file (fail-closed)"
                );
                audit::record(GateOutcome::ScanFailedClosed, &subject, Some(&e.to_string()));
                Err(ScanError::BackendUnavailable(e))
            }
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend.describe(),
                    error = %e,
                    "Scan backend failed, accepting file (fail-open)"
                );
                audit::record(GateOutcome::ScanFailedOpen, &subject, Some(&e.to_string()));
                Ok(ScanDecision::FailedOpen)
            }
        }
    }
}
