//! Markup tier models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A named markup-percentage tier.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub id: Uuid,
    pub tier_name: String,
    pub markup_percentage: Decimal,
}

/// Join record attaching a tier to a company. At most one active tier per
/// company; re-tiering updates the existing link rather than adding a second.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyTier {
    pub id: Uuid,
    pub company_id: Uuid,
    pub tier_id: Uuid,
}
