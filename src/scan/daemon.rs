use super::protocol;
use super::{BackendError, ScanOutcome};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Client du démon d'analyse: une connexion neuve par fichier.
#[derive(Debug, Clone)]
pub struct DaemonScanner {
    address: String,
    timeout: Duration,
}

impl DaemonScanner {
    pub fn new(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            address: format!("{host}:{port}"),
            timeout,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Envoie `SCAN <path>` et lit jusqu'à la fermeture par le démon.
    ///
    /// Le délai couvre connexion, écriture et lecture. La socket appartient au
    /// futur de l'échange: elle est fermée dès qu'il se termine ou est abandonné
    /// à l'expiration, quel que soit le chemin de sortie.
    pub async fn scan(&self, path: &Path) -> Result<ScanOutcome, BackendError> {
        let command = protocol::scan_command(path)
            .ok_or_else(|| BackendError::InvalidPath(path.display().to_string()))?;

        let exchange = async {
            let mut stream = TcpStream::connect(&self.address).await.map_err(|source| {
                BackendError::Connect {
                    address: self.address.clone(),
                    source,
                }
            })?;

            stream
                .write_all(command.as_bytes())
                .await
                .map_err(BackendError::Io)?;

            let mut response = Vec::new();
            stream
                .read_to_end(&mut response)
                .await
                .map_err(BackendError::Io)?;

            Ok::<_, BackendError>(response)
        };

        let response = timeout(self.timeout, exchange)
            .await
            .map_err(|_| BackendError::Timeout(self.timeout))??;

        let response = String::from_utf8_lossy(&response);
        for line in protocol::anomalies(&response) {
            tracing::warn!(daemon = %self.address, line, "Unexpected scan daemon response");
        }

        let outcome = protocol::interpret(&response);
        tracing::debug!(
            daemon = %self.address,
            path = %path.display(),
            infected = outcome.is_infected(),
            "Daemon scan completed"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Démon factice: lit la commande, répond `reply` puis ferme
    async fn fake_daemon(reply: &'static str) -> (u16, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let mut command = String::new();
            reader.read_line(&mut command).await.unwrap();
            reader.get_mut().write_all(reply.as_bytes()).await.unwrap();
            let _ = tx.send(command);
        });

        (port, rx)
    }

    #[tokio::test]
    async fn sends_scan_command_and_reports_clean() {
        let (port, command) = fake_daemon("/tmp/a.pdf: OK\n").await;
        let scanner = DaemonScanner::new("127.0.0.1", port, Duration::from_secs(2));

        let outcome = scanner.scan(Path::new("/tmp/a.pdf")).await.unwrap();

        assert_eq!(outcome, ScanOutcome::Clean);
        assert_eq!(command.await.unwrap(), "SCAN /tmp/a.pdf\n");
    }

    #[tokio::test]
    async fn reports_signature_when_found() {
        let (port, _command) = fake_daemon("/tmp/b.exe: Win.Test.EICAR_HDB-1 FOUND\n").await;
        let scanner = DaemonScanner::new("127.0.0.1", port, Duration::from_secs(2));

        let outcome = scanner.scan(Path::new("/tmp/b.exe")).await.unwrap();

        assert_eq!(outcome.signature(), Some("Win.Test.EICAR_HDB-1"));
    }

    #[tokio::test]
    async fn empty_response_is_clean() {
        let (port, _command) = fake_daemon("").await;
        let scanner = DaemonScanner::new("127.0.0.1", port, Duration::from_secs(2));

        let outcome = scanner.scan(Path::new("/tmp/a.pdf")).await.unwrap();

        assert_eq!(outcome, ScanOutcome::Clean);
    }

    #[tokio::test]
    async fn refused_connection_is_backend_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let scanner = DaemonScanner::new("127.0.0.1", port, Duration::from_secs(2));
        let err = scanner.scan(Path::new("/tmp/a.pdf")).await.unwrap_err();

        assert!(matches!(err, BackendError::Connect { .. }));
    }

    #[tokio::test]
    async fn timeout_closes_the_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        // Ne répond jamais; signale quand le client a fermé sa socket
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 256];
            loop {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }
            let _ = tx.send(());
        });

        let scanner = DaemonScanner::new("127.0.0.1", port, Duration::from_millis(100));
        let err = scanner.scan(Path::new("/tmp/slow.bin")).await.unwrap_err();
        assert!(matches!(err, BackendError::Timeout(_)));

        tokio::time::timeout(Duration::from_secs(2), rx)
            .await
            .expect("daemon should observe the client closing")
            .unwrap();
    }
}
