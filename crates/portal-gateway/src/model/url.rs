use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
    #[serde(default)]
    pub expiration_in_minutes: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShortlinkResponse {
    pub shortlink: String,
}

/// `GET /api/info?url=<code>`
#[derive(Debug, Deserialize)]
pub struct InfoQuery {
    pub url: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub allocated: u64,
}
