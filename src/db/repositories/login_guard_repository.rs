use crate::db::DbPool;
use crate::db::connection::get_connection;
use crate::db::error::RepositoryError;
use crate::db::models::login_guard::{LoginGuardEntry, NewLoginGuardEntry};
use crate::db::repositories::LoginGuardStore;
use crate::db::schema::login_guard;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Store Postgres de la table `login_guard`.
#[derive(Clone)]
pub struct LoginGuardRepository {
    pool: DbPool,
}

impl LoginGuardRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl LoginGuardStore for LoginGuardRepository {
    fn find(
        &self,
        address: &str,
        identifier: &str,
    ) -> Result<Option<LoginGuardEntry>, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        login_guard::table
            .filter(login_guard::address.eq(address))
            .filter(login_guard::identifier.eq(identifier))
            .select(LoginGuardEntry::as_select())
            .first::<LoginGuardEntry>(&mut conn)
            .optional()
            .map_err(Into::into)
    }

    fn increment_failures(
        &self,
        address: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<i32, RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        let new_entry = NewLoginGuardEntry {
            address,
            identifier,
            attempts: 1,
            last_attempt_at: now,
        };

        // INSERT ... ON CONFLICT DO UPDATE: seule primitive d'ordre entre requêtes
        diesel::insert_into(login_guard::table)
            .values(&new_entry)
            .on_conflict((login_guard::address, login_guard::identifier))
            .do_update()
            .set((
                login_guard::attempts.eq(login_guard::attempts + 1),
                login_guard::last_attempt_at.eq(now),
            ))
            .returning(login_guard::attempts)
            .get_result::<i32>(&mut conn)
            .map_err(Into::into)
    }

    fn set_locked_until(
        &self,
        address: &str,
        identifier: &str,
        until: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::update(
            login_guard::table
                .filter(login_guard::address.eq(address))
                .filter(login_guard::identifier.eq(identifier)),
        )
        .set(login_guard::locked_until.eq(Some(until)))
        .execute(&mut conn)?;

        Ok(())
    }

    fn clear(&self, address: &str, identifier: &str) -> Result<(), RepositoryError> {
        let mut conn = get_connection(&self.pool)?;

        diesel::delete(
            login_guard::table
                .filter(login_guard::address.eq(address))
                .filter(login_guard::identifier.eq(identifier)),
        )
        .execute(&mut conn)?;

        Ok(())
    }
}
