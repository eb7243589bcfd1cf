//! Calendar event management
//!
//! Events are scoped to the authenticated account (id + role) rather than a
//! caller-supplied filter, so one account never reads another's events.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::CalendarEvent;
use shared::types::Role;

/// Input for creating a calendar event.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventInput {
    #[serde(default)]
    pub all_day: bool,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub title: String,
    pub event_details: Option<String>,
}

/// Calendar service
#[derive(Clone)]
pub struct CalendarService {
    db: PgPool,
}

impl CalendarService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn add(
        &self,
        owner_id: Uuid,
        owner_role: Role,
        input: CreateEventInput,
    ) -> AppResult<CalendarEvent> {
        let event = sqlx::query_as::<_, CalendarEvent>(
            r#"
            INSERT INTO calendar_events
                (all_day, starts_at, ends_at, title, event_details, owner_id, owner_role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, all_day, starts_at, ends_at, title, event_details,
                      owner_id, owner_role
            "#,
        )
        .bind(input.all_day)
        .bind(input.start)
        .bind(input.end)
        .bind(&input.title)
        .bind(&input.event_details)
        .bind(owner_id)
        .bind(owner_role.tag())
        .fetch_one(&self.db)
        .await?;

        Ok(event)
    }

    pub async fn list(&self, owner_id: Uuid, owner_role: Role) -> AppResult<Vec<CalendarEvent>> {
        let events = sqlx::query_as::<_, CalendarEvent>(
            r#"
            SELECT id, all_day, starts_at, ends_at, title, event_details,
                   owner_id, owner_role
            FROM calendar_events
            WHERE owner_id = $1 AND owner_role = $2
            ORDER BY starts_at
            "#,
        )
        .bind(owner_id)
        .bind(owner_role.tag())
        .fetch_all(&self.db)
        .await?;

        Ok(events)
    }

    /// Delete an event, scoped to its owner; unknown ids surface as 404.
    pub async fn delete(&self, event_id: Uuid, owner_id: Uuid, owner_role: Role) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM calendar_events WHERE id = $1 AND owner_id = $2 AND owner_role = $3",
        )
        .bind(event_id)
        .bind(owner_id)
        .bind(owner_role.tag())
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Event".to_string()));
        }

        Ok(())
    }
}
