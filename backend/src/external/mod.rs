//! External API integrations

pub mod chat;
pub mod mail;

pub use chat::{ChatDirectory, StreamChatClient};
pub use mail::MailClient;
