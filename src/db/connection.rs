use super::error::RepositoryError;
use super::{DbConnection, DbPool};
use anyhow::{Result, anyhow};
use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;

const POOL_MAX_SIZE: u32 = 5;

/// Construit le pool de connexions Postgres.
///
/// Le pool est créé une seule fois au démarrage puis injecté dans les stores,
/// jamais exposé comme global de module.
pub fn create_pool(database_url: &str) -> Result<DbPool> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);

    diesel::r2d2::Pool::builder()
        .max_size(POOL_MAX_SIZE)
        .build(manager)
        .map_err(|e| anyhow!("Failed to create pool: {e}"))
}

/// Récupère une connexion du pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, RepositoryError> {
    pool.get().map_err(RepositoryError::from)
}
