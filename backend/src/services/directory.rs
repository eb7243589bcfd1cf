//! Directory sync bridge
//!
//! One-way, best-effort push of identity changes to the external chat
//! directory. Pushes run inline with the request but their failures are
//! logged and never roll back the already-committed relational write; there
//! is no retry or compensation queue.

use std::sync::Arc;

use crate::external::chat::{direct_channel_id, ChatDirectory, ChatUser};

/// Best-effort bridge between account writes and the chat directory.
#[derive(Clone)]
pub struct DirectorySync {
    directory: Arc<dyn ChatDirectory>,
    welcome_user_id: String,
}

impl DirectorySync {
    pub fn new(directory: Arc<dyn ChatDirectory>, welcome_user_id: String) -> Self {
        Self {
            directory,
            welcome_user_id,
        }
    }

    pub fn directory(&self) -> &Arc<dyn ChatDirectory> {
        &self.directory
    }

    /// Upsert the account's directory entry, idempotent by chat id.
    pub async fn push_profile(&self, chat_id: &str, full_name: &str, username: &str, avatar: &str) {
        let user = ChatUser {
            id: chat_id.to_string(),
            name: full_name.to_string(),
            username: username.to_string(),
            avatar: avatar.to_string(),
        };

        if let Err(e) = self.directory.upsert_users(&[user]).await {
            tracing::warn!(chat_id, "directory push failed: {}", e);
        }
    }

    /// First-time chat-id assignment: create the two-member channel between
    /// the system welcome identity and the new user, then post a single
    /// welcome message.
    pub async fn bootstrap_welcome(&self, chat_id: &str, full_name: &str) {
        let members = [self.welcome_user_id.clone(), chat_id.to_string()];
        let channel_id = direct_channel_id(&self.welcome_user_id, chat_id);

        let users: Vec<ChatUser> = members
            .iter()
            .map(|id| ChatUser {
                id: id.clone(),
                ..ChatUser::default()
            })
            .collect();

        if let Err(e) = self.directory.upsert_users(&users).await {
            tracing::warn!(chat_id, "welcome member upsert failed: {}", e);
            return;
        }

        if let Err(e) = self
            .directory
            .create_channel(&channel_id, &members, &self.welcome_user_id)
            .await
        {
            tracing::warn!(chat_id, "welcome channel creation failed: {}", e);
            return;
        }

        let text = format!(
            "Welcome to the chat, {}! Feel free to start your conversation.",
            full_name
        );
        if let Err(e) = self
            .directory
            .send_to_channel(&channel_id, &text, &self.welcome_user_id)
            .await
        {
            tracing::warn!(chat_id, "welcome message failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::{AppError, AppResult};
    use crate::external::chat::{ChatMessage, ChatUser};

    /// In-memory stand-in for the external directory, recording every call.
    #[derive(Default)]
    struct MemoryDirectory {
        fail: bool,
        upserts: Mutex<Vec<Vec<String>>>,
        channels: Mutex<Vec<String>>,
        messages: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl ChatDirectory for MemoryDirectory {
        async fn upsert_users(&self, users: &[ChatUser]) -> AppResult<()> {
            if self.fail {
                return Err(AppError::ChatDirectory("directory down".into()));
            }
            self.upserts
                .lock()
                .unwrap()
                .push(users.iter().map(|u| u.id.clone()).collect());
            Ok(())
        }

        async fn get_user(&self, _id: &str) -> AppResult<Option<ChatUser>> {
            Ok(None)
        }

        async fn query_users(&self) -> AppResult<Vec<ChatUser>> {
            Ok(vec![])
        }

        async fn create_channel(
            &self,
            channel_id: &str,
            _members: &[String],
            _created_by: &str,
        ) -> AppResult<Vec<ChatMessage>> {
            self.channels.lock().unwrap().push(channel_id.to_string());
            Ok(vec![])
        }

        async fn send_to_channel(
            &self,
            channel_id: &str,
            text: &str,
            _sender_id: &str,
        ) -> AppResult<()> {
            self.messages
                .lock()
                .unwrap()
                .push((channel_id.to_string(), text.to_string()));
            Ok(())
        }

        async fn add_members(&self, _channel_id: &str, _members: &[String]) -> AppResult<()> {
            Ok(())
        }

        fn mint_token(&self, chat_id: &str) -> AppResult<String> {
            Ok(format!("token-{}", chat_id))
        }
    }

    #[tokio::test]
    async fn welcome_bootstrap_sends_exactly_one_message() {
        let directory = Arc::new(MemoryDirectory::default());
        let sync = DirectorySync::new(directory.clone(), "first-chat".to_string());

        sync.bootstrap_welcome("abc123", "Jane Doe").await;

        let channels = directory.channels.lock().unwrap();
        assert_eq!(channels.as_slice(), ["abc123-first-chat"]);

        let messages = directory.messages.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].1.contains("Jane Doe"));
    }

    #[tokio::test]
    async fn directory_failure_is_swallowed() {
        let directory = Arc::new(MemoryDirectory {
            fail: true,
            ..MemoryDirectory::default()
        });
        let sync = DirectorySync::new(directory.clone(), "first-chat".to_string());

        // Best-effort: neither call propagates the provider error.
        sync.push_profile("abc123", "Jane", "jane_acme", "").await;
        sync.bootstrap_welcome("abc123", "Jane").await;

        // The failed upsert also short-circuits the welcome chain.
        assert!(directory.channels.lock().unwrap().is_empty());
        assert!(directory.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn profile_push_is_idempotent_by_chat_id() {
        let directory = Arc::new(MemoryDirectory::default());
        let sync = DirectorySync::new(directory.clone(), "first-chat".to_string());

        sync.push_profile("abc123", "Jane", "jane_acme", "").await;
        sync.push_profile("abc123", "Jane", "jane_acme", "").await;

        let upserts = directory.upserts.lock().unwrap();
        assert_eq!(upserts.len(), 2);
        assert!(upserts.iter().all(|ids| ids == &["abc123".to_string()]));
    }
}
