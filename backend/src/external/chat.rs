//! Chat directory client
//!
//! The chat provider owns the wire format; this module exposes the small set
//! of directory operations the back-office needs (user upserts, channels,
//! messages, per-user tokens) behind the [`ChatDirectory`] trait so handlers
//! and services can be tested against a fake.

use async_trait::async_trait;
use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::ChatConfig;
use crate::error::{AppError, AppResult};

/// A user entry in the external chat directory, keyed by the account's
/// opaque `chat_id`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ChatUser {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: String,
}

/// A message in a chat channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub user_id: String,
}

/// Directory + pub/sub operations delegated to the chat provider.
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    /// Create-or-update directory entries, idempotent by id.
    async fn upsert_users(&self, users: &[ChatUser]) -> AppResult<()>;

    /// Look up a single directory entry.
    async fn get_user(&self, id: &str) -> AppResult<Option<ChatUser>>;

    /// List directory entries.
    async fn query_users(&self) -> AppResult<Vec<ChatUser>>;

    /// Create (or fetch) a channel with the given members and return its
    /// current messages.
    async fn create_channel(
        &self,
        channel_id: &str,
        members: &[String],
        created_by: &str,
    ) -> AppResult<Vec<ChatMessage>>;

    /// Send a message into a channel on behalf of a directory user.
    async fn send_to_channel(&self, channel_id: &str, text: &str, sender_id: &str)
        -> AppResult<()>;

    /// Add members to an existing channel.
    async fn add_members(&self, channel_id: &str, members: &[String]) -> AppResult<()>;

    /// Mint a per-user token for the frontend chat widget.
    fn mint_token(&self, chat_id: &str) -> AppResult<String>;
}

/// Deterministic id for the direct channel between two directory users.
pub fn direct_channel_id(a: &str, b: &str) -> String {
    let mut pair = [a, b];
    pair.sort_unstable();
    pair.join("-")
}

/// Stream-style chat provider client.
///
/// Server-side calls authenticate with a JWT signed by the provider API
/// secret; per-user tokens are signed with the same secret and carry only
/// the directory user id.
#[derive(Clone)]
pub struct StreamChatClient {
    http_client: Client,
    api_key: String,
    api_secret: String,
    base_url: String,
}

#[derive(Serialize)]
struct ServerClaims {
    server: bool,
}

#[derive(Serialize)]
struct UserTokenClaims {
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    users: Vec<ChatUser>,
}

#[derive(Debug, Deserialize)]
struct ChannelStateResponse {
    #[serde(default)]
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    message: Option<String>,
}

impl StreamChatClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            http_client: Client::new(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn server_token(&self) -> AppResult<String> {
        encode(
            &Header::default(),
            &ServerClaims { server: true },
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::ChatDirectory(format!("server token signing failed: {}", e)))
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> AppResult<reqwest::Response> {
        let response = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .query(&[("api_key", self.api_key.as_str())])
            .header("Authorization", self.server_token()?)
            .header("stream-auth-type", "jwt")
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            let error: ProviderError = response
                .json()
                .await
                .unwrap_or(ProviderError { message: None });
            Err(AppError::ChatDirectory(
                error.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

#[async_trait]
impl ChatDirectory for StreamChatClient {
    async fn upsert_users(&self, users: &[ChatUser]) -> AppResult<()> {
        let entries: serde_json::Map<String, serde_json::Value> = users
            .iter()
            .map(|u| (u.id.clone(), serde_json::to_value(u).unwrap_or_default()))
            .collect();

        self.post("/users", json!({ "users": entries })).await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> AppResult<Option<ChatUser>> {
        let payload = json!({ "filter_conditions": { "id": { "$in": [id] } } });
        let response = self
            .http_client
            .get(format!("{}/users", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("payload", &payload.to_string()),
            ])
            .header("Authorization", self.server_token()?)
            .header("stream-auth-type", "jwt")
            .send()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::ChatDirectory(format!(
                "user lookup failed with status {}",
                response.status()
            )));
        }

        let users: UsersResponse = response
            .json()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;
        Ok(users.users.into_iter().next())
    }

    async fn query_users(&self) -> AppResult<Vec<ChatUser>> {
        let payload = json!({ "filter_conditions": {} });
        let response = self
            .http_client
            .get(format!("{}/users", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("payload", &payload.to_string()),
            ])
            .header("Authorization", self.server_token()?)
            .header("stream-auth-type", "jwt")
            .send()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;

        let users: UsersResponse = response
            .json()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;
        Ok(users.users)
    }

    async fn create_channel(
        &self,
        channel_id: &str,
        members: &[String],
        created_by: &str,
    ) -> AppResult<Vec<ChatMessage>> {
        let body = json!({
            "data": { "members": members, "created_by_id": created_by },
            "state": true,
        });
        let response = self
            .post(&format!("/channels/messaging/{}/query", channel_id), body)
            .await?;

        let state: ChannelStateResponse = response
            .json()
            .await
            .map_err(|e| AppError::ChatDirectory(e.to_string()))?;
        Ok(state.messages)
    }

    async fn send_to_channel(
        &self,
        channel_id: &str,
        text: &str,
        sender_id: &str,
    ) -> AppResult<()> {
        let body = json!({ "message": { "text": text, "user_id": sender_id } });
        self.post(&format!("/channels/messaging/{}/message", channel_id), body)
            .await?;
        Ok(())
    }

    async fn add_members(&self, channel_id: &str, members: &[String]) -> AppResult<()> {
        let body = json!({ "add_members": members });
        self.post(&format!("/channels/messaging/{}", channel_id), body)
            .await?;
        Ok(())
    }

    fn mint_token(&self, chat_id: &str) -> AppResult<String> {
        encode(
            &Header::default(),
            &UserTokenClaims {
                user_id: chat_id.to_string(),
            },
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )
        .map_err(|e| AppError::ChatDirectory(format!("user token signing failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_channel_id_is_order_independent() {
        assert_eq!(direct_channel_id("abc", "xyz"), "abc-xyz");
        assert_eq!(direct_channel_id("xyz", "abc"), "abc-xyz");
    }

    #[test]
    fn mint_token_produces_a_jwt() {
        let client = StreamChatClient::new(&crate::config::ChatConfig {
            api_key: "key".into(),
            api_secret: "secret".into(),
            base_url: "https://chat.example.com".into(),
            welcome_user_id: "first-chat".into(),
        });
        let token = client.mint_token("u-123").unwrap();
        assert_eq!(token.split('.').count(), 3);
    }
}
