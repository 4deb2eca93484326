use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginCheckResponse {
    pub allowed: bool,
    pub client_address: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BanResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub reason: String,
    pub banned_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateBanResponse {
    pub id: Uuid,
    pub banned_until: DateTime<Utc>,
}

/// Verdict rendered to the upload handler.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    /// Backend consulted and found nothing, or failed open
    Clean,
    /// Scanning disabled, no backend was contacted
    Skipped,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanResponse {
    pub status: ScanStatus,
}
