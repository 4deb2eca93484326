use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::security_ban::{NewSecurityBan, SecurityBan};
use crate::db::repositories::BanStore;
use crate::db::schema::security_bans;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Store Postgres de la table `security_bans` (append-only).
#[derive(Clone)]
pub struct SecurityBanRepository {
    pool: DbPool,
}

impl SecurityBanRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl BanStore for SecurityBanRepository {
    fn insert(&self, ban: NewSecurityBan) -> Result<SecurityBan, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::insert_into(security_bans::table)
            .values(&ban)
            .get_result::<SecurityBan>(&mut conn)
            .map_err(Into::into)
    }

    fn find_active(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<SecurityBan>, RepositoryError> {
        let query = security_bans::table
            .filter(security_bans::banned_until.gt(now))
            .into_boxed();

        let query = match (address, identifier) {
            (Some(address), Some(identifier)) => query.filter(
                security_bans::address
                    .eq(address)
                    .or(security_bans::identifier.eq(identifier)),
            ),
            (Some(address), None) => query.filter(security_bans::address.eq(address)),
            (None, Some(identifier)) => query.filter(security_bans::identifier.eq(identifier)),
            (None, None) => return Ok(None),
        };

        let mut conn = get_connection(&self.pool)?;

        query
            .order_by(security_bans::banned_until.desc())
            .first::<SecurityBan>(&mut conn)
            .optional()
            .map_err(Into::into)
    }
}
