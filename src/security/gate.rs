use super::ban_registry::BanRegistry;
use super::error::GateError;
use super::identity::{address_fits, identifier_fits, normalize_identifier};
use super::login_guard::LoginGuard;
use crate::audit::{self, GateOutcome};
use crate::config::GuardConfig;
use crate::db::models::login_guard::LockStatus;
use chrono::{DateTime, Utc};

/// Enchaînement ban → verrou autour de la vérification des identifiants.
///
/// Le handler de connexion appelle `check` avant de vérifier le mot de passe,
/// puis `report` avec le résultat.
#[derive(Clone)]
pub struct LoginGate {
    bans: BanRegistry,
    guard: LoginGuard,
    settings: GuardConfig,
}

impl LoginGate {
    pub fn new(bans: BanRegistry, guard: LoginGuard, settings: GuardConfig) -> Self {
        Self {
            bans,
            guard,
            settings,
        }
    }

    pub fn bans(&self) -> &BanRegistry {
        &self.bans
    }

    pub fn settings(&self) -> &GuardConfig {
        &self.settings
    }

    pub fn check(&self, address: &str, identifier: &str) -> Result<LockStatus, GateError> {
        self.check_at(address, identifier, Utc::now())
    }

    /// Refuse si un ban actif vise l'adresse ou l'identifiant, puis si le
    /// couple est dans sa fenêtre de verrouillage.
    pub fn check_at(
        &self,
        address: &str,
        identifier: &str,
        now: DateTime<Utc>,
    ) -> Result<LockStatus, GateError> {
        let identifier = normalize_identifier(identifier);
        ensure_storable(address, &identifier)?;
        let subject = format!("{address}|{identifier}");

        if let Some(ban) = self
            .bans
            .get_active_ban_at(Some(address), Some(&identifier), now)?
        {
            audit::record(GateOutcome::LoginBanned, &subject, Some(&ban.reason));
            return Err(GateError::Banned {
                until: ban.banned_until,
                reason: ban.reason,
            });
        }

        let status = self.guard.get_lock(address, &identifier)?;
        if let Some(until) = status.locked_until.filter(|until| *until > now) {
            audit::record(GateOutcome::LoginLocked, &subject, None);
            return Err(GateError::Locked { until });
        }

        audit::record(GateOutcome::LoginAllowed, &subject, None);
        Ok(status)
    }

    pub fn report(
        &self,
        address: &str,
        identifier: &str,
        success: bool,
    ) -> Result<LockStatus, GateError> {
        self.report_at(address, identifier, success, Utc::now())
    }

    /// Reporte l'issue de la vérification dans le compteur d'échecs
    pub fn report_at(
        &self,
        address: &str,
        identifier: &str,
        success: bool,
        now: DateTime<Utc>,
    ) -> Result<LockStatus, GateError> {
        let identifier = normalize_identifier(identifier);
        ensure_storable(address, &identifier)?;
        let status = self.guard.record_attempt_at(
            address,
            &identifier,
            success,
            self.settings.max_attempts,
            self.settings.lock_minutes,
            now,
        )?;

        let outcome = if success {
            GateOutcome::LoginSucceeded
        } else {
            GateOutcome::LoginFailed
        };
        audit::record(outcome, &format!("{address}|{identifier}"), None);

        Ok(status)
    }
}

/// Refuse un sujet qui ne tient pas dans les colonnes du store.
fn ensure_storable(address: &str, identifier: &str) -> Result<(), GateError> {
    if !address_fits(address) {
        tracing::warn!(len = address.len(), "Client address too long, refusing");
        return Err(GateError::InvalidSubject("client address is too long"));
    }
    if !identifier_fits(identifier) {
        tracing::warn!(len = identifier.len(), "Login identifier too long, refusing");
        return Err(GateError::InvalidSubject("identifier is too long"));
    }
    Ok(())
}
