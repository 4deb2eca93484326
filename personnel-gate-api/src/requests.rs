use serde::{Deserialize, Serialize};

// -------- REQUEST DTOs --------
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginCheckRequest {
    pub identifier: String, // Email, normalized server-side
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginOutcomeRequest {
    pub identifier: String,
    pub success: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CreateBanRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    pub reason: String,
    pub minutes: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ActiveBanQuery {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanRequest {
    pub path: String, // Staged file, absolute path
}
