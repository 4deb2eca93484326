use crate::db::schema::login_guard;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};

/// Une ligne par couple (adresse, identifiant).
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = login_guard)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LoginGuardEntry {
    pub address: String,
    pub identifier: String,
    pub attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub last_attempt_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = login_guard)]
pub struct NewLoginGuardEntry<'a> {
    pub address: &'a str,
    pub identifier: &'a str,
    pub attempts: i32,
    pub last_attempt_at: DateTime<Utc>,
}

/// Vue publique d'une entrée: compteur et fenêtre de verrouillage.
///
/// Une entrée absente vaut `{ attempts: 0, locked_until: None }`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockStatus {
    pub attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

impl LockStatus {
    /// Vrai tant que la fenêtre de verrouillage n'est pas écoulée
    pub fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| until > now)
    }
}

impl From<LoginGuardEntry> for LockStatus {
    fn from(entry: LoginGuardEntry) -> Self {
        Self {
            attempts: entry.attempts,
            locked_until: entry.locked_until,
        }
    }
}
