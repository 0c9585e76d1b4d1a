//! Visit repository for database operations.
//!
//! Lifecycle transitions are committed as guarded single-statement updates
//! (`WHERE id = $1 AND status = <expected>`), so two callers racing on the
//! same visit cannot both succeed: the loser's update matches zero rows and
//! the method returns `None`.

use chrono::{DateTime, Utc};
use domain::models::{NewVisit, Site, Visit};
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::VisitEntity;
use crate::metrics::QueryTimer;

const VISIT_COLUMNS: &str = "id, session_token, visitor_name, visitor_company, visitor_phone, \
     visitor_email, host_id, purpose, site, status, expected_date, pre_registered_by, \
     rejection_reason, check_in_at, check_out_at, approved_at, rejected_at, created_at";

/// Repository for visit database operations.
#[derive(Clone)]
pub struct VisitRepository {
    pool: PgPool,
}

impl VisitRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new visit row.
    ///
    /// The UNIQUE constraint on `session_token` is the authoritative
    /// uniqueness guarantee; a collision surfaces as a database error with
    /// code 23505 for the caller to map.
    pub async fn insert(&self, visit: NewVisit) -> Result<Visit, sqlx::Error> {
        let _timer = QueryTimer::start("visits_insert");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            INSERT INTO visits (session_token, visitor_name, visitor_company, visitor_phone, visitor_email, host_id, purpose, site, status, expected_date, pre_registered_by, check_in_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(&visit.session_token)
        .bind(&visit.visitor_name)
        .bind(&visit.visitor_company)
        .bind(&visit.visitor_phone)
        .bind(&visit.visitor_email)
        .bind(visit.host_id)
        .bind(&visit.purpose)
        .bind(visit.site)
        .bind(visit.status)
        .bind(visit.expected_date)
        .bind(visit.pre_registered_by)
        .bind(visit.check_in_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity.into())
    }

    /// Find a visit by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_find_by_id");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find a visit by session token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_find_by_token");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            "SELECT {VISIT_COLUMNS} FROM visits WHERE session_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Guarded `pending_approval -> approved`.
    pub async fn mark_approved(&self, id: Uuid) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_mark_approved");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            UPDATE visits
            SET status = 'approved', approved_at = NOW()
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Guarded `pending_approval -> rejected`.
    pub async fn mark_rejected(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_mark_rejected");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            UPDATE visits
            SET status = 'rejected', rejected_at = NOW(), rejection_reason = $2
            WHERE id = $1 AND status = 'pending_approval'
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(reason)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Guarded `approved -> checked_in`.
    pub async fn mark_checked_in(&self, id: Uuid) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_mark_checked_in");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            UPDATE visits
            SET status = 'checked_in', check_in_at = NOW()
            WHERE id = $1 AND status = 'approved'
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Guarded `checked_in -> checked_out`.
    pub async fn mark_checked_out(&self, id: Uuid) -> Result<Option<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_mark_checked_out");
        let entity = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            UPDATE visits
            SET status = 'checked_out', check_out_at = NOW()
            WHERE id = $1 AND status = 'checked_in'
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// All visits currently checked in, newest arrivals first.
    pub async fn list_active(&self, site: Option<Site>) -> Result<Vec<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_list_active");
        let entities = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            SELECT {VISIT_COLUMNS} FROM visits
            WHERE status = 'checked_in'
              AND ($1::site IS NULL OR site = $1)
            ORDER BY check_in_at DESC
            "#
        ))
        .bind(site)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }

    /// Newest-first page of visits matching the optional filters.
    ///
    /// Returns the page plus the total match count.
    pub async fn list_history(
        &self,
        site: Option<Site>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<Visit>, i64), sqlx::Error> {
        let _timer = QueryTimer::start("visits_list_history");
        let offset = ((page.max(1) - 1) * per_page) as i64;

        const WHERE_CLAUSE: &str = r#"
            WHERE ($1::site IS NULL OR site = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
        "#;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM visits {WHERE_CLAUSE}"
        ))
        .bind(site)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            SELECT {VISIT_COLUMNS} FROM visits
            {WHERE_CLAUSE}
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(site)
        .bind(from)
        .bind(to)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((entities.into_iter().map(Into::into).collect(), total))
    }

    /// Pending pre-registrations for a host, oldest first.
    pub async fn list_pending_for_host(
        &self,
        host_id: Uuid,
    ) -> Result<Vec<Visit>, sqlx::Error> {
        let _timer = QueryTimer::start("visits_list_pending_for_host");
        let entities = sqlx::query_as::<_, VisitEntity>(&format!(
            r#"
            SELECT {VISIT_COLUMNS} FROM visits
            WHERE host_id = $1 AND status = 'pending_approval'
            ORDER BY created_at ASC
            "#
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entities.into_iter().map(Into::into).collect())
    }
}
