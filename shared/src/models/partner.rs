//! Importer and supplier records
//!
//! Importers are managed by forwarder admins, suppliers by BCOs; both share
//! the same invitation lifecycle (Pending -> Signup/Accepted).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{Company, Contact};

/// An importer managed by a forwarder admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Importer {
    pub id: Uuid,
    pub full_name: String,
    pub email_address: String,
    pub invited_status: String,
    pub forwarder_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Importer list entry with its company, contact, and tier joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImporterRecord {
    #[serde(flatten)]
    pub importer: Importer,
    pub tier: String,
    pub company: Option<Company>,
    pub contact: Option<Contact>,
}

/// A supplier managed by a BCO.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub full_name: String,
    pub email_address: String,
    pub product: Option<String>,
    pub port: Option<String>,
    pub invited_status: String,
    pub bco_id: Uuid,
    pub contact_id: Option<Uuid>,
    pub company_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Supplier list entry with its company and contact joined in.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierRecord {
    #[serde(flatten)]
    pub supplier: Supplier,
    pub company: Option<Company>,
    pub contact: Option<Contact>,
}
