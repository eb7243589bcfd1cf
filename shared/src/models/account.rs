//! Account models shared by all four role variants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A sanitized account as returned to clients.
///
/// The password hash never leaves the backend; the row type carrying it lives
/// in the backend's account service. `chat_id`, once assigned, is immutable
/// and identifies the account in the external chat directory. `username` is
/// globally unique across all four account variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub chat_id: Option<String>,
    pub username: Option<String>,
    pub company_name: Option<String>,
    pub physical_address: Option<String>,
    pub phone_number: Option<String>,
    pub business_registration_number: Option<String>,
    pub customs_registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Pending registration carried inside an activation token.
///
/// The password is already hashed when the token is issued, so the token
/// never transports a plaintext credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAccount {
    pub full_name: String,
    pub email: String,
    pub company_name: String,
    pub password_hash: String,
}

/// Identity fields an invite token carries to pre-fill a signup form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InvitePayload {
    /// Importer/supplier record the invite refers to, if any.
    pub id: Option<Uuid>,
    pub email: String,
    pub company_name: String,
    pub full_name: String,
}
