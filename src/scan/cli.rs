use super::protocol;
use super::{BackendError, ScanOutcome};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::time::timeout;

const NO_SUMMARY_FLAG: &str = "--no-summary";
// Taille maximale de sortie reprise dans l'erreur
const OUTPUT_EXCERPT_LEN: usize = 512;

/// Scanner invoqué en sous-processus: `<program> --no-summary <path>`.
///
/// Code 0 = sain, 1 = détection, 2 = erreur. Un code non nul sans `FOUND`
/// dans la sortie est un échec du backend, pas une détection.
#[derive(Debug, Clone)]
pub struct CliScanner {
    program: PathBuf,
    timeout: Duration,
}

impl CliScanner {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub async fn scan(&self, path: &Path) -> Result<ScanOutcome, BackendError> {
        if !protocol::is_scannable_path(path) {
            return Err(BackendError::InvalidPath(path.display().to_string()));
        }

        let mut child = Command::new(&self.program)
            .arg(NO_SUMMARY_FLAG)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let run = async {
            let (stdout, stderr, status) =
                tokio::try_join!(drain(stdout), drain(stderr), child.wait())?;
            Ok::<_, std::io::Error>((stdout, stderr, status))
        };

        let result = timeout(self.timeout, run).await;
        let (mut output, stderr, status) = match result {
            Ok(Ok(collected)) => collected,
            Ok(Err(e)) => {
                reap(&mut child).await;
                return Err(BackendError::Io(e));
            }
            Err(_) => {
                reap(&mut child).await;
                return Err(BackendError::Timeout(self.timeout));
            }
        };
        output.extend_from_slice(&stderr);
        let output = String::from_utf8_lossy(&output);

        if output.contains(protocol::FOUND_TOKEN) {
            return Ok(protocol::interpret(&output));
        }

        if !status.success() {
            return Err(BackendError::Exit {
                code: status.code(),
                output: excerpt(&output),
            });
        }

        tracing::debug!(
            program = %self.program.display(),
            path = %path.display(),
            "Subprocess scan completed clean"
        );
        Ok(ScanOutcome::Clean)
    }
}

async fn drain<R: AsyncRead + Unpin>(reader: Option<R>) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}

/// Tue le processus et attend sa fin: aucun zombie ne survit à l'appel
async fn reap(child: &mut tokio::process::Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!(error = %e, "Failed to kill scanner process");
    }
}

fn excerpt(output: &str) -> String {
    let trimmed = output.trim();
    match trimmed.char_indices().nth(OUTPUT_EXCERPT_LEN) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
