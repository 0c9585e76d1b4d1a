//! Record store interface consumed by the visit lifecycle.
//!
//! The persistence engine lives behind this trait so the lifecycle can be
//! exercised against an in-memory store in tests and the engine can be
//! swapped without touching the state machine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CheckEvent, Host, NewCheckEvent, NewVisit, Site, Visit};

/// Engine-neutral storage error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique session-token constraint rejected an insert. Recovered by
    /// the lifecycle's regenerate-and-retry loop, never shown to callers.
    #[error("duplicate session token")]
    DuplicateToken,

    #[error("storage error: {0}")]
    Backend(String),
}

/// Filters for the visit history listing. Page numbers are 1-based.
#[derive(Debug, Clone)]
pub struct HistoryFilter {
    pub site: Option<Site>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub page: u32,
    pub per_page: u32,
}

/// One page of history results plus the total match count.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub visits: Vec<Visit>,
    pub total: i64,
}

/// Typed access to Host, Visit and CheckEvent records.
///
/// The `mark_*` methods are guarded transitions: each commits the new
/// status only if the row still holds the expected previous status, and
/// returns `None` when it does not. Racing callers therefore cannot both
/// succeed; the loser observes the precondition failure.
#[async_trait]
pub trait VisitStore: Send + Sync {
    async fn find_host(&self, host_id: Uuid) -> Result<Option<Host>, StoreError>;

    /// Resolves a portal user to the host record they act for.
    async fn find_host_by_account(&self, user_id: Uuid) -> Result<Option<Host>, StoreError>;

    /// Inserts a visit. Fails with [`StoreError::DuplicateToken`] when the
    /// session token is already taken; the uniqueness constraint at the
    /// storage layer is authoritative.
    async fn insert_visit(&self, visit: NewVisit) -> Result<Visit, StoreError>;

    async fn find_visit(&self, id: Uuid) -> Result<Option<Visit>, StoreError>;

    async fn find_visit_by_token(&self, token: &str) -> Result<Option<Visit>, StoreError>;

    /// `PendingApproval -> Approved`, stamping `approved_at`.
    async fn mark_approved(&self, id: Uuid) -> Result<Option<Visit>, StoreError>;

    /// `PendingApproval -> Rejected`, stamping `rejected_at` and the reason.
    async fn mark_rejected(
        &self,
        id: Uuid,
        reason: Option<&str>,
    ) -> Result<Option<Visit>, StoreError>;

    /// `Approved -> CheckedIn`, stamping `check_in_at`.
    async fn mark_checked_in(&self, id: Uuid) -> Result<Option<Visit>, StoreError>;

    /// `CheckedIn -> CheckedOut`, stamping `check_out_at`.
    async fn mark_checked_out(&self, id: Uuid) -> Result<Option<Visit>, StoreError>;

    /// Appends an immutable audit row. Ordered after the status commit;
    /// the caller treats failures as log-only.
    async fn append_check_event(&self, event: NewCheckEvent) -> Result<CheckEvent, StoreError>;

    /// All visits currently checked in, optionally filtered by site.
    async fn list_active(&self, site: Option<Site>) -> Result<Vec<Visit>, StoreError>;

    /// Newest-first bounded page of visits matching the filter.
    async fn list_history(&self, filter: HistoryFilter) -> Result<HistoryPage, StoreError>;

    /// Pending pre-registrations awaiting a host's decision.
    async fn list_pending_for_host(&self, host_id: Uuid) -> Result<Vec<Visit>, StoreError>;
}
