//! Host repository for database operations.
//!
//! Hosts are administered outside the visit core; only lookups live here.

use domain::models::Host;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::HostEntity;
use crate::metrics::QueryTimer;

const HOST_COLUMNS: &str =
    "id, name, company, email, phone, site, account_user_id, active, created_at, deleted_at";

/// Repository for host database operations.
#[derive(Clone)]
pub struct HostRepository {
    pool: PgPool,
}

impl HostRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a host by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Host>, sqlx::Error> {
        let _timer = QueryTimer::start("hosts_find_by_id");
        let entity = sqlx::query_as::<_, HostEntity>(&format!(
            "SELECT {HOST_COLUMNS} FROM hosts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }

    /// Find the host a portal user acts for.
    pub async fn find_by_account_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<Host>, sqlx::Error> {
        let _timer = QueryTimer::start("hosts_find_by_account_user");
        let entity = sqlx::query_as::<_, HostEntity>(&format!(
            "SELECT {HOST_COLUMNS} FROM hosts WHERE account_user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity.map(Into::into))
    }
}
