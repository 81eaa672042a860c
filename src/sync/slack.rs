use crate::sync::types::{
    ConversationsHistoryResponse, ConversationsListResponse, Message, SlackUser, SyncError,
    UsersInfoResponse,
};
use log::{info, warn};
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

const SLACK_API_BASE: &str = "https://slack.com/api";
const CHANNEL_TYPES: &str = "public_channel,private_channel";
pub const PAGE_LIMIT: u32 = 200;

/// Thin client over the Slack Web API methods the sync needs. Keeps the
/// per-run user-name cache; the sync is strictly sequential so no
/// locking is involved.
pub struct SlackClient {
    client: Client,
    token: String,
    api_base: String,
    user_cache: HashMap<String, String>,
}

impl SlackClient {
    pub fn new(token: &str) -> Result<Self, SyncError> {
        Self::with_base(token, SLACK_API_BASE)
    }

    pub(crate) fn with_base(token: &str, api_base: &str) -> Result<Self, SyncError> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            token: token.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            user_cache: HashMap::new(),
        })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        method: &str,
        query: &[(&str, &str)],
    ) -> Result<T, SyncError> {
        let url = format!("{}/{}", self.api_base, method);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()?;
        Ok(response.json::<T>()?)
    }

    /// Resolves a channel name to its id by walking `conversations.list`
    /// until a match is found or pages run out.
    pub fn find_channel(&self, name: &str) -> Result<String, SyncError> {
        let limit = PAGE_LIMIT.to_string();
        let mut cursor = String::new();
        loop {
            let mut query = vec![("limit", limit.as_str()), ("types", CHANNEL_TYPES)];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let page: ConversationsListResponse = self.get_json("conversations.list", &query)?;
            if !page.ok {
                return Err(SyncError::Api(format!(
                    "conversations.list failed: {}",
                    page.error.unwrap_or_else(|| "unknown error".to_string())
                )));
            }
            if let Some(channel) = page.channels.iter().find(|c| c.name == name) {
                return Ok(channel.id.clone());
            }
            cursor = page
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                return Err(SyncError::ChannelNotFound(name.to_string()));
            }
        }
    }

    /// Walks `conversations.history` to exhaustion, accumulating messages
    /// in arrival order. A single failed page aborts the whole run.
    pub fn fetch_all_messages(&self, channel_id: &str) -> Result<Vec<Message>, SyncError> {
        let limit = PAGE_LIMIT.to_string();
        let mut messages = Vec::new();
        let mut cursor = String::new();
        loop {
            let mut query = vec![("channel", channel_id), ("limit", limit.as_str())];
            if !cursor.is_empty() {
                query.push(("cursor", cursor.as_str()));
            }
            let page: ConversationsHistoryResponse =
                self.get_json("conversations.history", &query)?;
            if !page.ok {
                return Err(SyncError::Api(format!(
                    "conversations.history failed: {}",
                    page.error.unwrap_or_else(|| "unknown error".to_string())
                )));
            }
            messages.extend(page.messages);
            info!("fetched {} messages...", messages.len());
            cursor = page
                .response_metadata
                .map(|m| m.next_cursor)
                .unwrap_or_default();
            if cursor.is_empty() {
                return Ok(messages);
            }
        }
    }

    /// Best-available display name for a user id, memoized for the run.
    /// Lookup failures fall back to the raw id and are cached too, so a
    /// dead id is only looked up once.
    pub fn resolve_user(&mut self, user_id: &str) -> String {
        if let Some(name) = self.user_cache.get(user_id) {
            return name.clone();
        }
        let name = match self.lookup_display_name(user_id) {
            Some(name) => name,
            None => {
                warn!("user lookup failed for {user_id}, using raw id");
                user_id.to_string()
            }
        };
        self.user_cache.insert(user_id.to_string(), name.clone());
        name
    }

    fn lookup_display_name(&self, user_id: &str) -> Option<String> {
        let page: UsersInfoResponse = self.get_json("users.info", &[("user", user_id)]).ok()?;
        if !page.ok {
            return None;
        }
        display_name_from(&page.user?)
    }
}

/// Preference order: profile display name, then real name, then the
/// account name. Blank strings count as absent, matching what the
/// upstream API returns for users who never set a display name.
pub(crate) fn display_name_from(user: &SlackUser) -> Option<String> {
    user.profile
        .as_ref()
        .and_then(|p| p.display_name.clone())
        .filter(|s| !s.trim().is_empty())
        .or_else(|| user.real_name.clone().filter(|s| !s.trim().is_empty()))
        .or_else(|| Some(user.name.clone()).filter(|s| !s.trim().is_empty()))
}

/// Sum of all reaction counts on a message, 0 when there are none.
pub fn count_reactions(message: &Message) -> u64 {
    message.reactions.iter().map(|r| r.count).sum()
}
