//! Calendar event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A calendar event scoped to the account that created it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: Uuid,
    pub all_day: bool,
    #[serde(rename = "start")]
    pub starts_at: DateTime<Utc>,
    #[serde(rename = "end")]
    pub ends_at: DateTime<Utc>,
    pub title: String,
    pub event_details: Option<String>,
    #[serde(skip_serializing)]
    pub owner_id: Uuid,
    #[serde(skip_serializing)]
    pub owner_role: String,
}
