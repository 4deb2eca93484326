use crate::db::schema::security_bans;
use chrono::{DateTime, Utc};
use diesel::{Insertable, Queryable, Selectable};
use personnel_gate_api::BanResponse;
use uuid::Uuid;

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = security_bans)]
pub struct NewSecurityBan {
    pub id: Uuid,
    pub address: Option<String>,
    pub identifier: Option<String>,
    pub reason: String,
    pub banned_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Bannissement explicite. Jamais modifié, expire avec le temps.
#[derive(Queryable, Selectable, Debug, Clone, PartialEq, Eq)]
#[diesel(table_name = security_bans)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SecurityBan {
    pub id: Uuid,
    pub address: Option<String>,
    pub identifier: Option<String>,
    pub reason: String,
    pub banned_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SecurityBan {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.banned_until > now
    }

    /// Vrai si l'adresse ou l'identifiant correspond
    pub fn matches(&self, address: Option<&str>, identifier: Option<&str>) -> bool {
        let by_address = address.is_some() && self.address.as_deref() == address;
        let by_identifier = identifier.is_some() && self.identifier.as_deref() == identifier;
        by_address || by_identifier
    }
}

impl From<NewSecurityBan> for SecurityBan {
    fn from(ban: NewSecurityBan) -> Self {
        Self {
            id: ban.id,
            address: ban.address,
            identifier: ban.identifier,
            reason: ban.reason,
            banned_until: ban.banned_until,
            created_at: ban.created_at,
        }
    }
}

impl From<SecurityBan> for BanResponse {
    fn from(ban: SecurityBan) -> Self {
        BanResponse {
            id: ban.id,
            address: ban.address,
            identifier: ban.identifier,
            reason: ban.reason,
            banned_until: ban.banned_until,
            created_at: ban.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ban(address: Option<&str>, identifier: Option<&str>) -> SecurityBan {
        let now = Utc::now();
        SecurityBan {
            id: Uuid::new_v4(),
            address: address.map(str::to_string),
            identifier: identifier.map(str::to_string),
            reason: "brute_force".to_string(),
            banned_until: now + Duration::minutes(60),
            created_at: now,
        }
    }

    #[test]
    fn matches_on_address_or_identifier() {
        let b = ban(Some("203.0.113.5"), Some("agent@example.gov"));

        assert!(b.matches(Some("203.0.113.5"), None));
        assert!(b.matches(None, Some("agent@example.gov")));
        assert!(b.matches(Some("10.0.0.1"), Some("agent@example.gov")));
        assert!(!b.matches(Some("10.0.0.1"), Some("other@example.gov")));
    }

    #[test]
    fn absent_subject_never_matches_null_column() {
        let b = ban(Some("203.0.113.5"), None);
        assert!(!b.matches(None, None));
        assert!(!b.matches(None, Some("agent@example.gov")));
    }
}
