//! Company, warehouse address, and contact models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A company record owned by whichever account created it (forwarder admin
/// or BCO) and referenced by importer/supplier records.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: Uuid,
    pub company_name: String,
    pub registered_address: Option<String>,
    pub business_registration_number: Option<String>,
    pub vat_number: Option<String>,
    pub unlocode_registered_address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One of a company's warehouse addresses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseAddress {
    pub id: Uuid,
    pub company_id: Uuid,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city_country: Option<String>,
    pub unlocode_warehouse_address: Option<String>,
}

/// A contact person attached to a company.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub company_id: Uuid,
    pub contact_name: String,
    pub email_address: String,
    pub phone_number: Option<String>,
    pub status: Option<String>,
    pub account_reference: Option<String>,
    pub api_customer_code: Option<String>,
}
