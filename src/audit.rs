//! Enregistrements d'issue du gate.
//!
//! Chaque décision produit un événement `tracing` de cible `audit`; le puits
//! (fichier, SIEM, table) est configuré côté subscriber et ne relève pas de ce crate.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    LoginAllowed,
    LoginBanned,
    LoginLocked,
    LoginFailed,
    LoginSucceeded,
    BanCreated,
    ScanSkipped,
    ScanClean,
    ScanInfected,
    ScanFailedOpen,
    ScanFailedClosed,
    ScanRejectedPath,
}

impl GateOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginAllowed => "login_allowed",
            Self::LoginBanned => "login_banned",
            Self::LoginLocked => "login_locked",
            Self::LoginFailed => "login_failed",
            Self::LoginSucceeded => "login_succeeded",
            Self::BanCreated => "ban_created",
            Self::ScanSkipped => "scan_skipped",
            Self::ScanClean => "scan_clean",
            Self::ScanInfected => "scan_infected",
            Self::ScanFailedOpen => "scan_failed_open",
            Self::ScanFailedClosed => "scan_failed_closed",
            Self::ScanRejectedPath => "scan_rejected_path",
        }
    }

    /// Issue qui bloque l'opération demandée
    pub fn is_blocking(self) -> bool {
        matches!(
            self,
            Self::LoginBanned
                | Self::LoginLocked
                | Self::ScanInfected
                | Self::ScanFailedClosed
                | Self::ScanRejectedPath
        )
    }
}

impl std::fmt::Display for GateOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Émet l'enregistrement d'audit d'une décision
pub fn record(outcome: GateOutcome, subject: &str, detail: Option<&str>) {
    if outcome.is_blocking() {
        tracing::warn!(
            target: "audit",
            outcome = outcome.as_str(),
            subject,
            detail,
            "gate decision"
        );
    } else {
        tracing::info!(
            target: "audit",
            outcome = outcome.as_str(),
            subject,
            detail,
            "gate decision"
        );
    }
}
