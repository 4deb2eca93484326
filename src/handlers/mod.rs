pub mod bans;
pub mod health;
pub mod login;
pub mod scan;

use crate::error::AppError;

/// Exécute un appel au store (diesel, bloquant) hors du runtime async
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await?
}
