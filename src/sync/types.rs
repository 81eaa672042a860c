use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One persisted gallery entry. Field names are the JSON contract the
/// site pages consume, hence the camelCase rename.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub image_url: String,
    pub artist: String,
    #[serde(default)]
    pub reactions: u64,
    pub date: String,
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("channel #{0} not found")]
    ChannelNotFound(String),
    #[error("slack api error: {0}")]
    Api(String),
    #[error("download failed with status {0}")]
    Download(u16),
    #[error("too many redirects while downloading {0}")]
    TooManyRedirects(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Io(String),
}

/// Counts reported after a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub new_records: usize,
    pub updated_records: usize,
    pub preserved_records: usize,
    pub total_records: usize,
}

// Slack wire types. Only the fields the sync reads are modeled; the
// rest of each payload is ignored.

#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: String,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsListResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationsHistoryResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub files: Vec<SlackFile>,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackFile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub url_private: Option<String>,
    #[serde(default)]
    pub url_private_download: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Reaction {
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub struct UsersInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub user: Option<SlackUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SlackUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
}
