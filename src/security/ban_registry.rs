use crate::db::error::RepositoryError;
use crate::db::models::security_ban::{NewSecurityBan, SecurityBan};
use crate::db::repositories::BanStore;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Registre des bannissements explicites, indépendant du compteur d'échecs.
///
/// Les bans sont créés par une décision extérieure (opérateur, règle
/// d'escalade) et consultés en tout premier dans le flux de connexion.
#[derive(Clone)]
pub struct BanRegistry {
    store: Arc<dyn BanStore>,
}

impl BanRegistry {
    pub fn new(store: Arc<dyn BanStore>) -> Self {
        Self { store }
    }

    /// Ajoute un ban actif jusqu'à `now + minutes`.
    ///
    /// L'appelant garantit qu'au moins un sujet (adresse ou identifiant) est
    /// fourni; le registre ne le vérifie pas.
    pub fn create_ban(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        reason: &str,
        minutes: i64,
    ) -> Result<SecurityBan, RepositoryError> {
        self.create_ban_at(address, identifier, reason, minutes, Utc::now())
    }

    pub fn create_ban_at(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        reason: &str,
        minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<SecurityBan, RepositoryError> {
        let ban = self.store.insert(NewSecurityBan {
            id: Uuid::new_v4(),
            address: address.map(str::to_string),
            identifier: identifier.map(str::to_string),
            reason: reason.to_string(),
            banned_until: now + Duration::minutes(minutes),
            created_at: now,
        })?;

        tracing::info!(
            ban_id = %ban.id,
            address = ?ban.address,
            identifier = ?ban.identifier,
            reason = %ban.reason,
            banned_until = %ban.banned_until,
            "Security ban created"
        );

        Ok(ban)
    }

    /// Ban actif correspondant à l'adresse ou à l'identifiant; quand plusieurs
    /// correspondent, celui qui expire le plus tard.
    pub fn get_active_ban(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
    ) -> Result<Option<SecurityBan>, RepositoryError> {
        self.get_active_ban_at(address, identifier, Utc::now())
    }

    pub fn get_active_ban_at(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<SecurityBan>, RepositoryError> {
        self.store.find_active(address, identifier, now)
    }
}
