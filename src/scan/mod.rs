//! Analyse antivirus des documents déposés.
//!
//! Deux backends interchangeables (démon TCP ou binaire en sous-processus),
//! choisis une fois au démarrage, et la politique qui les enveloppe.

pub mod cli;
pub mod daemon;
pub mod policy;
pub mod protocol;

pub use cli::CliScanner;
pub use daemon::DaemonScanner;
pub use policy::{ScanDecision, ScanError, ScanPolicy};

use crate::config::{ScanConfig, ScanMode};
use std::path::Path;
use std::time::Duration;

/// Verdict d'une analyse; jamais persisté
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Clean,
    Infected {
        reason: String,
        signature: Option<String>,
    },
}

impl ScanOutcome {
    pub fn is_infected(&self) -> bool {
        matches!(self, Self::Infected { .. })
    }

    pub fn signature(&self) -> Option<&str> {
        match self {
            Self::Infected { signature, .. } => signature.as_deref(),
            Self::Clean => None,
        }
    }
}

/// Échec du backend lui-même (distinct d'une détection)
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("scan timed out after {0:?}")]
    Timeout(Duration),
    #[error("cannot connect to scan daemon at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scan daemon I/O error: {0}")]
    Io(#[source] std::io::Error),
    #[error("cannot run scanner {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("scanner exited with status {code:?} without a detection: {output}")]
    Exit { code: Option<i32>, output: String },
    #[error("path cannot be sent to the scanner: {0}")]
    InvalidPath(String),
}

#[derive(Debug, Clone)]
pub enum ScanBackend {
    Daemon(DaemonScanner),
    Cli(CliScanner),
}

impl ScanBackend {
    pub fn from_config(config: &ScanConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        match config.mode {
            ScanMode::Daemon => Self::Daemon(DaemonScanner::new(
                &config.daemon_host,
                config.daemon_port,
                timeout,
            )),
            ScanMode::Cli => Self::Cli(CliScanner::new(&config.cli_path, timeout)),
        }
    }

    pub async fn scan(&self, path: &Path) -> Result<ScanOutcome, BackendError> {
        match self {
            Self::Daemon(scanner) => scanner.scan(path).await,
            Self::Cli(scanner) => scanner.scan(path).await,
        }
    }

    /// Vrai si le chemin peut être transmis tel quel à ce backend
    pub fn accepts(&self, path: &Path) -> bool {
        match self {
            Self::Daemon(_) => protocol::scan_command(path).is_some(),
            Self::Cli(_) => protocol::is_scannable_path(path),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Daemon(scanner) => format!("daemon {}", scanner.address()),
            Self::Cli(scanner) => format!("cli {}", scanner.program().display()),
        }
    }
}
