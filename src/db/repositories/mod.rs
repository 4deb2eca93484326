//! Stores persistants du gate.
//!
//! Chaque composant reçoit son store par injection (`Arc<dyn ...>`), ce qui
//! permet de substituer l'implémentation mémoire en test ou en mode mono-nœud.

pub mod login_guard_repository;
pub mod memory;
pub mod security_ban_repository;

use crate::db::error::RepositoryError;
use crate::db::models::login_guard::LoginGuardEntry;
use crate::db::models::security_ban::{NewSecurityBan, SecurityBan};
use chrono::{DateTime, Utc};

pub trait LoginGuardStore: Send + Sync {
    /// Lit l'entrée (adresse, identifiant), `None` si absente
    fn find(&self, address: &str, identifier: &str)
    -> Result<Option<LoginGuardEntry>, RepositoryError>;

    /// Upsert atomique: crée l'entrée à 1 ou incrémente `attempts`, horodate
    /// `last_attempt_at`, et renvoie la valeur fraîchement écrite.
    fn increment_failures(
        &self,
        address: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<i32, RepositoryError>;

    fn set_locked_until(
        &self,
        address: &str,
        identifier: &str,
        until: DateTime<Utc>,
    ) -> Result<(), RepositoryError>;

    /// Supprime l'entrée; sans effet si elle n'existe pas
    fn clear(&self, address: &str, identifier: &str) -> Result<(), RepositoryError>;
}

pub trait BanStore: Send + Sync {
    fn insert(&self, ban: NewSecurityBan) -> Result<SecurityBan, RepositoryError>;

    /// Ban actif (`banned_until > now`) correspondant à l'adresse OU à
    /// l'identifiant, celui qui expire le plus tard en premier.
    fn find_active(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<SecurityBan>, RepositoryError>;
}
