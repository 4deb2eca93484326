use crate::db::error::RepositoryError;
use crate::db::models::login_guard::LockStatus;
use crate::db::repositories::LoginGuardStore;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

/// Compteur d'échecs et fenêtre de verrouillage par couple (adresse, identifiant).
///
/// Le verrou est indicatif: c'est l'appelant qui refuse de vérifier les
/// identifiants tant que `locked_until > now`.
///
/// L'incrément et la pose du verrou sont deux écritures distinctes. Deux échecs
/// concurrents au seuil peuvent tous deux poser le verrou; c'est sans effet
/// visible (même valeur à quelques ms près) et volontairement non transactionnel.
#[derive(Clone)]
pub struct LoginGuard {
    store: Arc<dyn LoginGuardStore>,
}

impl LoginGuard {
    pub fn new(store: Arc<dyn LoginGuardStore>) -> Self {
        Self { store }
    }

    /// `{ attempts: 0, locked_until: None }` si aucune ligne n'existe
    pub fn get_lock(&self, address: &str, identifier: &str) -> Result<LockStatus, RepositoryError> {
        Ok(self
            .store
            .find(address, identifier)?
            .map(LockStatus::from)
            .unwrap_or_default())
    }

    pub fn record_attempt(
        &self,
        address: &str,
        identifier: &str,
        success: bool,
        max_attempts: i32,
        lock_minutes: i64,
    ) -> Result<LockStatus, RepositoryError> {
        self.record_attempt_at(
            address,
            identifier,
            success,
            max_attempts,
            lock_minutes,
            Utc::now(),
        )
    }

    /// Enregistre une tentative et renvoie l'état résultant.
    ///
    /// Succès: la ligne est supprimée. Échec: incrément atomique, puis verrou
    /// `now + lock_minutes` dès que le compteur relu atteint `max_attempts`;
    /// chaque échec au-delà du seuil repousse la fenêtre.
    pub fn record_attempt_at(
        &self,
        address: &str,
        identifier: &str,
        success: bool,
        max_attempts: i32,
        lock_minutes: i64,
        now: DateTime<Utc>,
    ) -> Result<LockStatus, RepositoryError> {
        if success {
            self.store.clear(address, identifier)?;
            return Ok(LockStatus::default());
        }

        let attempts = self.store.increment_failures(address, identifier, now)?;

        if attempts < max_attempts {
            tracing::debug!(address, identifier, attempts, "Failed login attempt recorded");
            return Ok(LockStatus {
                attempts,
                locked_until: None,
            });
        }

        let until = now + Duration::minutes(lock_minutes);
        self.store.set_locked_until(address, identifier, until)?;
        tracing::warn!(
            address,
            identifier,
            attempts,
            locked_until = %until,
            "Login locked after repeated failures"
        );

        Ok(LockStatus {
            attempts,
            locked_until: Some(until),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::memory::MemoryLoginGuardStore;

    const ADDRESS: &str = "203.0.113.5";
    const IDENTIFIER: &str = "agent@example.gov";

    fn guard() -> LoginGuard {
        LoginGuard::new(Arc::new(MemoryLoginGuardStore::new()))
    }

    #[test]
    fn get_lock_returns_zero_for_unknown_pair() {
        let status = guard().get_lock(ADDRESS, IDENTIFIER).expect("lookup");
        assert_eq!(status, LockStatus::default());
    }

    #[test]
    fn failures_below_threshold_do_not_lock() {
        let guard = guard();
        let now = Utc::now();

        for _ in 0..4 {
            guard
                .record_attempt_at(ADDRESS, IDENTIFIER, false, 5, 15, now)
                .expect("record");
        }

        let status = guard.get_lock(ADDRESS, IDENTIFIER).expect("lookup");
        assert_eq!(status.attempts, 4);
        assert!(status.locked_until.is_none());
    }

    #[test]
    fn reaching_threshold_locks_for_configured_window() {
        let guard = guard();
        let now = Utc::now();

        for _ in 0..5 {
            guard
                .record_attempt_at(ADDRESS, IDENTIFIER, false, 5, 15, now)
                .expect("record");
        }

        let status = guard.get_lock(ADDRESS, IDENTIFIER).expect("lookup");
        assert_eq!(status.attempts, 5);
        assert_eq!(status.locked_until, Some(now + Duration::minutes(15)));
        assert!(status.is_locked_at(now));
    }

    #[test]
    fn failures_past_threshold_push_lock_forward() {
        let guard = guard();
        let start = Utc::now();

        for _ in 0..3 {
            guard
                .record_attempt_at(ADDRESS, IDENTIFIER, false, 3, 10, start)
                .expect("record");
        }
        let later = start + Duration::minutes(4);
        let status = guard
            .record_attempt_at(ADDRESS, IDENTIFIER, false, 3, 10, later)
            .expect("record");

        assert_eq!(status.attempts, 4);
        assert_eq!(status.locked_until, Some(later + Duration::minutes(10)));
    }

    #[test]
    fn success_resets_counter_and_lock() {
        let guard = guard();
        let now = Utc::now();

        for _ in 0..7 {
            guard
                .record_attempt_at(ADDRESS, IDENTIFIER, false, 5, 15, now)
                .expect("record");
        }
        guard
            .record_attempt_at(ADDRESS, IDENTIFIER, true, 5, 15, now)
            .expect("record success");

        let status = guard.get_lock(ADDRESS, IDENTIFIER).expect("lookup");
        assert_eq!(status, LockStatus::default());
    }

    #[test]
    fn pairs_are_tracked_independently() {
        let guard = guard();

        for _ in 0..5 {
            guard
                .record_attempt(ADDRESS, IDENTIFIER, false, 5, 15)
                .expect("record");
        }

        let other_address = guard.get_lock("198.51.100.1", IDENTIFIER).expect("lookup");
        let other_identifier = guard.get_lock(ADDRESS, "other@example.gov").expect("lookup");
        assert_eq!(other_address.attempts, 0);
        assert_eq!(other_identifier.attempts, 0);
    }

    #[test]
    fn concurrent_failures_are_all_counted() {
        let guard = guard();

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    guard
                        .record_attempt(ADDRESS, IDENTIFIER, false, 5, 15)
                        .expect("record");
                });
            }
        });

        let status = guard.get_lock(ADDRESS, IDENTIFIER).expect("lookup");
        assert_eq!(status.attempts, 8);
        assert!(status.locked_until.is_some());
    }
}
