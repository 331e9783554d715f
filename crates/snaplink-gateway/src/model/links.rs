use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub destination_url: String,
    #[serde(default)]
    pub custom_slug: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkResponse {
    pub slug: String,
    pub short_url_path: String,
    pub short_url: String,
    pub destination_url: String,
    pub created_at: Timestamp,
}
