//! PostgreSQL implementation of the event store.
//!
//! Each event is one JSONB document; engagement updates are single
//! `UPDATE` statements so they stay atomic per document.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::{CommentRemoval, EventStore, decode_events};
use crate::domain::{Comment, EventId, EventRecord, Ticket, UserProfile};
use crate::error::GatewayError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store over the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn migrate(&self) -> Result<(), GatewayError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))
    }

    async fn event_exists(&self, id: Uuid) -> Result<bool, GatewayError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn insert_event(&self, record: &EventRecord) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO events (id, doc, created_at) VALUES ($1, $2, $3)")
            .bind(*record.id.as_uuid())
            .bind(Json(record))
            .bind(record.created_at.unwrap_or_else(Utc::now))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_events(&self) -> Result<Vec<EventRecord>, GatewayError> {
        let docs = sqlx::query_scalar::<_, Json<Value>>(
            "SELECT doc FROM events ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(decode_events(docs.into_iter().map(|Json(doc)| doc)))
    }

    async fn get_event(&self, id: EventId) -> Result<Option<EventRecord>, GatewayError> {
        let doc = sqlx::query_scalar::<_, Json<Value>>("SELECT doc FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        match doc {
            Some(Json(doc)) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    async fn update_fields(
        &self,
        id: EventId,
        fields: &Map<String, Value>,
    ) -> Result<bool, GatewayError> {
        let result = sqlx::query("UPDATE events SET doc = doc || $2 WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(Json(fields))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, GatewayError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_likes(&self, id: EventId, likes: &[String]) -> Result<bool, GatewayError> {
        let result = sqlx::query("UPDATE events SET doc = jsonb_set(doc, '{likes}', $2) WHERE id = $1")
            .bind(*id.as_uuid())
            .bind(Json(likes))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn add_checkin(&self, id: EventId, user: &str) -> Result<bool, GatewayError> {
        let result = sqlx::query(
            "UPDATE events SET doc = jsonb_set(doc, '{checkins}', \
                CASE WHEN COALESCE(NULLIF(doc->'checkins', 'null'::jsonb), '[]'::jsonb) @> jsonb_build_array($2::text) \
                     THEN COALESCE(NULLIF(doc->'checkins', 'null'::jsonb), '[]'::jsonb) \
                     ELSE COALESCE(NULLIF(doc->'checkins', 'null'::jsonb), '[]'::jsonb) || jsonb_build_array($2::text) \
                END) \
             WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .bind(user)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn push_comment(&self, id: EventId, comment: &Comment) -> Result<bool, GatewayError> {
        let result = sqlx::query(
            "UPDATE events SET doc = jsonb_set(doc, '{comments}', \
                COALESCE(NULLIF(doc->'comments', 'null'::jsonb), '[]'::jsonb) || jsonb_build_array($2::jsonb)) \
             WHERE id = $1",
        )
        .bind(*id.as_uuid())
        .bind(Json(comment))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn pull_comment(
        &self,
        id: EventId,
        comment_id: &str,
    ) -> Result<CommentRemoval, GatewayError> {
        let uuid = *id.as_uuid();
        let result = sqlx::query(
            "UPDATE events SET doc = jsonb_set(doc, '{comments}', COALESCE( \
                (SELECT jsonb_agg(c) FROM jsonb_array_elements(doc->'comments') AS c \
                 WHERE c->>'id' IS DISTINCT FROM $2), \
                '[]'::jsonb)) \
             WHERE id = $1 \
               AND COALESCE(NULLIF(doc->'comments', 'null'::jsonb), '[]'::jsonb) @> jsonb_build_array(jsonb_build_object('id', $2::text))",
        )
        .bind(uuid)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            Ok(CommentRemoval::Removed)
        } else if self.event_exists(uuid).await? {
            Ok(CommentRemoval::CommentMissing)
        } else {
            Ok(CommentRemoval::EventMissing)
        }
    }

    async fn get_profile(&self, email: &str) -> Result<Option<UserProfile>, GatewayError> {
        let row = sqlx::query_as::<_, (String, Option<String>, DateTime<Utc>)>(
            "SELECT email, avatar_url, updated_at FROM user_profiles WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(email, avatar_url, updated_at)| UserProfile {
            email,
            avatar_url,
            updated_at,
        }))
    }

    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO user_profiles (email, avatar_url, updated_at) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO UPDATE \
             SET avatar_url = EXCLUDED.avatar_url, updated_at = EXCLUDED.updated_at",
        )
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn claim_ticket(&self, ticket: Ticket) -> Result<Ticket, GatewayError> {
        let event_id = *ticket.event_id.as_uuid();
        sqlx::query(
            "INSERT INTO tickets (ticket_id, event_id, user_email, doc, claimed_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (event_id, user_email) DO NOTHING",
        )
        .bind(&ticket.ticket_id)
        .bind(event_id)
        .bind(&ticket.user_email)
        .bind(Json(&ticket))
        .bind(ticket.claimed_at)
        .execute(&self.pool)
        .await?;

        let Json(stored) = sqlx::query_scalar::<_, Json<Ticket>>(
            "SELECT doc FROM tickets WHERE event_id = $1 AND user_email = $2",
        )
        .bind(event_id)
        .bind(&ticket.user_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(stored)
    }

    async fn list_tickets(&self, user_email: &str) -> Result<Vec<Ticket>, GatewayError> {
        let rows = sqlx::query_scalar::<_, Json<Ticket>>(
            "SELECT doc FROM tickets WHERE user_email = $1 ORDER BY claimed_at DESC",
        )
        .bind(user_email)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(ticket)| ticket).collect())
    }
}
