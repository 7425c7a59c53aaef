use serde::{Deserialize, Serialize};

/// `id` query parameter of the edit and delete routes. A missing value binds
/// to an empty string, which names no contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdQuery {
    #[serde(default, alias = "Id")]
    pub id: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
    pub contact_count: u32,
    pub version: String,
}
