//! Stores en mémoire, pour les tests et le mode mono-nœud (`GATE_STORE=memory`).
//!
//! Même sémantique que les stores Postgres, état partagé derrière un `Mutex`.
//! L'état n'est pas partagé entre processus.

use crate::db::error::RepositoryError;
use crate::db::models::login_guard::LoginGuardEntry;
use crate::db::models::security_ban::{NewSecurityBan, SecurityBan};
use crate::db::repositories::{BanStore, LoginGuardStore};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

type GuardKey = (String, String);

#[derive(Default)]
pub struct MemoryLoginGuardStore {
    entries: Mutex<HashMap<GuardKey, LoginGuardEntry>>,
}

impl MemoryLoginGuardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(address: &str, identifier: &str) -> GuardKey {
    (address.to_string(), identifier.to_string())
}

impl LoginGuardStore for MemoryLoginGuardStore {
    fn find(
        &self,
        address: &str,
        identifier: &str,
    ) -> Result<Option<LoginGuardEntry>, RepositoryError> {
        let entries = self.entries.lock()?;
        Ok(entries.get(&key(address, identifier)).cloned())
    }

    fn increment_failures(
        &self,
        address: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<i32, RepositoryError> {
        let mut entries = self.entries.lock()?;
        let entry = entries
            .entry(key(address, identifier))
            .or_insert_with(|| LoginGuardEntry {
                address: address.to_string(),
                identifier: identifier.to_string(),
                attempts: 0,
                locked_until: None,
                last_attempt_at: now,
            });

        entry.attempts = entry.attempts.saturating_add(1);
        entry.last_attempt_at = now;
        Ok(entry.attempts)
    }

    fn set_locked_until(
        &self,
        address: &str,
        identifier: &str,
        until: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock()?;
        if let Some(entry) = entries.get_mut(&key(address, identifier)) {
            entry.locked_until = Some(until);
        }
        Ok(())
    }

    fn clear(&self, address: &str, identifier: &str) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock()?;
        entries.remove(&key(address, identifier));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBanStore {
    bans: Mutex<Vec<SecurityBan>>,
}

impl MemoryBanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BanStore for MemoryBanStore {
    fn insert(&self, ban: NewSecurityBan) -> Result<SecurityBan, RepositoryError> {
        let mut bans = self.bans.lock()?;
        if bans.iter().any(|existing| existing.id == ban.id) {
            return Err(RepositoryError::UniqueViolation(format!(
                "security_bans.id {}",
                ban.id
            )));
        }

        let ban = SecurityBan::from(ban);
        bans.push(ban.clone());
        Ok(ban)
    }

    fn find_active(
        &self,
        address: Option<&str>,
        identifier: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Option<SecurityBan>, RepositoryError> {
        let bans = self.bans.lock()?;
        Ok(bans
            .iter()
            .filter(|ban| ban.is_active_at(now) && ban.matches(address, identifier))
            .max_by_key(|ban| ban.banned_until)
            .cloned())
    }
}
