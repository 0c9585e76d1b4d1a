//! Check event repository for database operations.
//!
//! Check events are append-only; there is no update or delete path.

use domain::models::{CheckEvent, NewCheckEvent};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::CheckEventEntity;
use crate::metrics::QueryTimer;

/// Repository for check event database operations.
#[derive(Clone)]
pub struct CheckEventRepository {
    pool: PgPool,
}

impl CheckEventRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an immutable check event row.
    pub async fn append(&self, event: NewCheckEvent) -> Result<CheckEvent, sqlx::Error> {
        let _timer = QueryTimer::start("check_events_append");
        let entity = sqlx::query_as::<_, CheckEventEntity>(
            r#"
            INSERT INTO check_events (visit_id, event_type, acting_user_id)
            VALUES ($1, $2, $3)
            RETURNING id, visit_id, event_type, acting_user_id, recorded_at
            "#,
        )
        .bind(event.visit_id)
        .bind(event.event_type)
        .bind(event.acting_user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// All events for a visit, in recorded order.
    pub async fn list_for_visit(&self, visit_id: Uuid) -> Result<Vec<CheckEvent>, sqlx::Error> {
        let _timer = QueryTimer::start("check_events_list_for_visit");
        let entities = sqlx::query_as::<_, CheckEventEntity>(
            r#"
            SELECT id, visit_id, event_type, acting_user_id, recorded_at
            FROM check_events
            WHERE visit_id = $1
            ORDER BY recorded_at ASC, id ASC
            "#,
        )
        .bind(visit_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
