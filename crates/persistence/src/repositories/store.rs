//! PostgreSQL implementation of the domain record-store interface.

use async_trait::async_trait;
use domain::models::{CheckEvent, Host, NewCheckEvent, NewVisit, Site, Visit};
use domain::services::{HistoryFilter, HistoryPage, StoreError, VisitStore};
use sqlx::PgPool;
use uuid::Uuid;

use super::{CheckEventRepository, HostRepository, VisitRepository};

/// PostgreSQL-unique-violation SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// [`VisitStore`] backed by the per-entity repositories.
#[derive(Clone)]
pub struct PgVisitStore {
    hosts: HostRepository,
    visits: VisitRepository,
    events: CheckEventRepository,
}

impl PgVisitStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            hosts: HostRepository::new(pool.clone()),
            visits: VisitRepository::new(pool.clone()),
            events: CheckEventRepository::new(pool),
        }
    }
}

/// Maps sqlx errors to the engine-neutral store error.
///
/// The only unique index reachable from these queries is the visits
/// session-token constraint, so a 23505 here always means a token
/// collision.
fn store_err(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::DuplicateToken
        }
        _ => {
            tracing::error!(error = %err, "Database error");
            StoreError::Backend(err.to_string())
        }
    }
}

#[async_trait]
impl VisitStore for PgVisitStore {
    async fn find_host(&self, host_id: Uuid) -> Result<Option<Host>, StoreError> {
        self.hosts.find_by_id(host_id).await.map_err(store_err)
    }

    async fn find_host_by_account(&self, user_id: Uuid) -> Result<Option<Host>, StoreError> {
        self.hosts
            .find_by_account_user(user_id)
            .await
            .map_err(store_err)
    }

    async fn insert_visit(&self, visit: NewVisit) -> Result<Visit, StoreError> {
        self.visits.insert(visit).await.map_err(store_err)
    }

    async fn find_visit(&self, id: Uuid) -> Result<Option<Visit>, StoreError> {
        self.visits.find_by_id(id).await.map_err(store_err)
    }

    async fn find_visit_by_token(&self, token: &str) -> Result<Option<Visit>, StoreError> {
        self.visits.find_by_token(token).await.map_err(store_err)
    }

    async fn mark_approved(&self, id: Uuid) -> Result<Option<Visit>, StoreError> {
        self.visits.mark_approved(id).await.map_err(store_err)
    }

    async fn mark_rejected(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<Visit>, StoreError> {
        self.visits
            .mark_rejected(id, reason)
            .await
            .map_err(store_err)
    }

    async fn mark_checked_in(&self, id: Uuid) -> Result<Option<Visit>, StoreError> {
        self.visits.mark_checked_in(id).await.map_err(store_err)
    }

    async fn mark_checked_out(&self, id: Uuid) -> Result<Option<Visit>, StoreError> {
        self.visits.mark_checked_out(id).await.map_err(store_err)
    }

    async fn append_check_event(&self, event: NewCheckEvent) -> Result<CheckEvent, StoreError> {
        self.events.append(event).await.map_err(store_err)
    }

    async fn list_active(&self, site: Option<Site>) -> Result<Vec<Visit>, StoreError> {
        self.visits.list_active(site).await.map_err(store_err)
    }

    async fn list_history(&self, filter: HistoryFilter) -> Result<HistoryPage, StoreError> {
        let (visits, total) = self
            .visits
            .list_history(
                filter.site,
                filter.from,
                filter.to,
                filter.page,
                filter.per_page,
            )
            .await
            .map_err(store_err)?;

        Ok(HistoryPage { visits, total })
    }

    async fn list_pending_for_host(&self, host_id: Uuid) -> Result<Vec<Visit>, StoreError> {
        self.visits
            .list_pending_for_host(host_id)
            .await
            .map_err(store_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_backend_error() {
        let err = store_err(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Backend(_)));
    }
}
