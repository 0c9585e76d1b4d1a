//! Visit lifecycle state machine.
//!
//! All visit mutation goes through [`VisitLifecycle`]: walk-in creation,
//! pre-registration, host decisions, checkpoint arrival confirmation and
//! checkout. Collaborators are injected explicitly; there is no container.
//!
//! Transitions are committed by the store as guarded updates, so two
//! callers racing on the same visit cannot both succeed. Token uniqueness
//! is enforced by the storage constraint; the regenerate-and-retry loop
//! here only shortens recovery from a collision.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use shared::pass::{self, GatePass};
use shared::token::{generate_session_token, token_prefix};

use crate::models::{
    CheckEventType, CreateWalkInRequest, Host, NewCheckEvent, NewVisit, PageInfo,
    PreRegisterRequest, Site, Visit, VisitHistoryQuery, VisitHistoryResponse, VisitStatus,
    VisitSummary,
};

use super::notification::{ArrivalNotice, DecisionOutcome, NotificationResult, VisitNotifier};
use super::ownership::Actor;
use super::store::{HistoryFilter, StoreError, VisitStore};

/// Attempts before giving up on finding an unused session token.
const MAX_TOKEN_ATTEMPTS: u32 = 4;

/// Hard cap on history page size.
pub const MAX_HISTORY_PER_PAGE: u32 = 100;

const DEFAULT_HISTORY_PER_PAGE: u32 = 50;

/// Failure taxonomy of lifecycle operations.
///
/// Every member is surfaced to callers as a distinct failure; the one
/// internal case is [`StoreError::DuplicateToken`], which the token retry
/// loop recovers before it can escape.
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Host not found or not accepting visitors")]
    HostUnavailable,

    #[error("Visit not found")]
    NotFound,

    #[error("Acting user does not own this visit")]
    Forbidden,

    #[error("Visit is {current}, cannot {action}")]
    InvalidTransition {
        current: VisitStatus,
        action: &'static str,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The visit lifecycle state machine.
pub struct VisitLifecycle {
    store: Arc<dyn VisitStore>,
    notifier: Arc<dyn VisitNotifier>,
}

impl VisitLifecycle {
    pub fn new(store: Arc<dyn VisitStore>, notifier: Arc<dyn VisitNotifier>) -> Self {
        Self { store, notifier }
    }

    /// Resolves a portal user to the host they act for.
    ///
    /// Fails with [`LifecycleError::Forbidden`] when no available host is
    /// bound to the user.
    pub async fn resolve_host_actor(&self, user_id: Uuid) -> Result<Actor, LifecycleError> {
        let host = self
            .store
            .find_host_by_account(user_id)
            .await?
            .filter(Host::is_available)
            .ok_or(LifecycleError::Forbidden)?;

        Ok(Actor::HostUser {
            user_id,
            host_id: host.id,
        })
    }

    /// Creates a walk-in visit: checked in immediately, no approval step.
    pub async fn create_walk_in(
        &self,
        req: CreateWalkInRequest,
        actor: &Actor,
    ) -> Result<Visit, LifecycleError> {
        let host = self
            .store
            .find_host(req.host_id)
            .await?
            .filter(Host::is_available)
            .ok_or(LifecycleError::HostUnavailable)?;

        let site = Site::normalize(&req.location);
        let now = Utc::now();

        let visit = self
            .insert_with_fresh_token(|session_token| NewVisit {
                session_token,
                visitor_name: req.visitor_name.clone(),
                visitor_company: req.visitor_company.clone(),
                visitor_phone: req.visitor_phone.clone(),
                visitor_email: req.visitor_email.clone(),
                host_id: host.id,
                purpose: req.purpose.clone(),
                site,
                status: VisitStatus::CheckedIn,
                expected_date: None,
                pre_registered_by: None,
                check_in_at: Some(now),
            })
            .await?;

        self.append_event(&visit, CheckEventType::CheckIn, actor).await;

        tracing::info!(
            visit_id = %visit.id,
            token_prefix = %token_prefix(&visit.session_token),
            host_id = %host.id,
            site = %site,
            "Walk-in visit checked in"
        );

        self.dispatch_arrival(host, &visit);

        Ok(visit)
    }

    /// Pre-registers a visit ahead of arrival, pending host approval.
    ///
    /// The acting identity must be a host user; the visit is registered
    /// against their own host record, at the host's own site.
    pub async fn pre_register(
        &self,
        req: PreRegisterRequest,
        actor: &Actor,
    ) -> Result<Visit, LifecycleError> {
        let host_id = actor.host_id().ok_or(LifecycleError::Forbidden)?;

        let host = self
            .store
            .find_host(host_id)
            .await?
            .filter(Host::is_available)
            .ok_or(LifecycleError::HostUnavailable)?;

        let visit = self
            .insert_with_fresh_token(|session_token| NewVisit {
                session_token,
                visitor_name: req.visitor_name.clone(),
                visitor_company: req.visitor_company.clone(),
                visitor_phone: req.visitor_phone.clone(),
                visitor_email: req.visitor_email.clone(),
                host_id: host.id,
                purpose: req.purpose.clone(),
                site: host.site,
                status: VisitStatus::PendingApproval,
                expected_date: req.expected_date,
                pre_registered_by: actor.user_id(),
                check_in_at: None,
            })
            .await?;

        tracing::info!(
            visit_id = %visit.id,
            host_id = %host.id,
            expected_date = ?visit.expected_date,
            "Visit pre-registered"
        );

        Ok(visit)
    }

    /// Approves a pending visit. Owner-only.
    pub async fn approve(&self, visit_id: Uuid, actor: &Actor) -> Result<Visit, LifecycleError> {
        let visit = self.fetch(visit_id).await?;

        if !actor.owns(&visit) {
            return Err(LifecycleError::Forbidden);
        }
        if visit.status != VisitStatus::PendingApproval {
            return Err(LifecycleError::InvalidTransition {
                current: visit.status,
                action: "approve",
            });
        }

        let updated = match self.store.mark_approved(visit_id).await? {
            Some(updated) => updated,
            None => return Err(self.stale_transition(visit_id, "approve").await),
        };

        tracing::info!(visit_id = %updated.id, "Visit approved");

        if let Some(email) = updated.visitor_email.clone() {
            let host_name = self
                .store
                .find_host(updated.host_id)
                .await
                .ok()
                .flatten()
                .map(|h| h.name)
                .unwrap_or_default();
            self.dispatch_decision(email, DecisionOutcome::Approved, host_name);
        }

        Ok(updated)
    }

    /// Rejects a pending visit. Owner-only.
    pub async fn reject(
        &self,
        visit_id: Uuid,
        actor: &Actor,
        reason: Option<String>,
    ) -> Result<Visit, LifecycleError> {
        let visit = self.fetch(visit_id).await?;

        if !actor.owns(&visit) {
            return Err(LifecycleError::Forbidden);
        }
        if visit.status != VisitStatus::PendingApproval {
            return Err(LifecycleError::InvalidTransition {
                current: visit.status,
                action: "reject",
            });
        }

        let updated = match self.store.mark_rejected(visit_id, reason.as_deref()).await? {
            Some(updated) => updated,
            None => return Err(self.stale_transition(visit_id, "reject").await),
        };

        tracing::info!(visit_id = %updated.id, "Visit rejected");

        Ok(updated)
    }

    /// Checks in an approved pre-registered visitor at the checkpoint.
    pub async fn confirm_arrival(
        &self,
        scanned: &str,
        actor: &Actor,
    ) -> Result<Visit, LifecycleError> {
        let visit = self.fetch_by_scanned(scanned).await?;

        if visit.status != VisitStatus::Approved {
            return Err(LifecycleError::InvalidTransition {
                current: visit.status,
                action: "check in",
            });
        }

        let updated = match self.store.mark_checked_in(visit.id).await? {
            Some(updated) => updated,
            None => return Err(self.stale_transition(visit.id, "check in").await),
        };

        self.append_event(&updated, CheckEventType::CheckIn, actor).await;

        tracing::info!(
            visit_id = %updated.id,
            token_prefix = %token_prefix(&updated.session_token),
            "Pre-registered visitor arrived"
        );

        if let Ok(Some(host)) = self.store.find_host(updated.host_id).await {
            self.dispatch_arrival(host, &updated);
        }

        Ok(updated)
    }

    /// Checks a visitor out.
    ///
    /// An already checked-out visit is a distinct reported failure, not a
    /// silent no-op: the second of two checkout calls always fails with
    /// [`LifecycleError::InvalidTransition`].
    pub async fn checkout(&self, scanned: &str, actor: &Actor) -> Result<Visit, LifecycleError> {
        let visit = self.fetch_by_scanned(scanned).await?;

        if visit.status != VisitStatus::CheckedIn {
            return Err(LifecycleError::InvalidTransition {
                current: visit.status,
                action: "check out",
            });
        }

        let updated = match self.store.mark_checked_out(visit.id).await? {
            Some(updated) => updated,
            None => return Err(self.stale_transition(visit.id, "check out").await),
        };

        self.append_event(&updated, CheckEventType::CheckOut, actor).await;

        tracing::info!(
            visit_id = %updated.id,
            token_prefix = %token_prefix(&updated.session_token),
            "Visitor checked out"
        );

        Ok(updated)
    }

    /// Looks a visit up by anything a scanner read.
    pub async fn visit_by_token(&self, scanned: &str) -> Result<Visit, LifecycleError> {
        self.fetch_by_scanned(scanned).await
    }

    /// Pending pre-registrations awaiting the acting host's decision.
    pub async fn pending_for_host(&self, actor: &Actor) -> Result<Vec<Visit>, LifecycleError> {
        let host_id = actor.host_id().ok_or(LifecycleError::Forbidden)?;
        Ok(self.store.list_pending_for_host(host_id).await?)
    }

    /// All visitors currently on site, optionally filtered by location.
    pub async fn active_visits(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<Visit>, LifecycleError> {
        let site = location.map(Site::normalize);
        Ok(self.store.list_active(site).await?)
    }

    /// Bounded, newest-first page of visit history.
    pub async fn visit_history(
        &self,
        query: VisitHistoryQuery,
    ) -> Result<VisitHistoryResponse, LifecycleError> {
        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(DEFAULT_HISTORY_PER_PAGE)
            .clamp(1, MAX_HISTORY_PER_PAGE);

        let result = self
            .store
            .list_history(HistoryFilter {
                site: query.location.as_deref().map(Site::normalize),
                from: query.from,
                to: query.to,
                page,
                per_page,
            })
            .await?;

        Ok(VisitHistoryResponse {
            data: result.visits.into_iter().map(VisitSummary::from).collect(),
            pagination: PageInfo {
                page,
                per_page,
                total: result.total,
            },
        })
    }

    /// Encodes the scannable gate pass bound to a visit.
    pub fn gate_pass(visit: &Visit) -> String {
        pass::encode_pass(&GatePass {
            token: visit.session_token.clone(),
            visitor_name: visit.visitor_name.clone(),
            visitor_company: visit.visitor_company.clone(),
            purpose: visit.purpose.clone(),
        })
    }

    async fn fetch(&self, visit_id: Uuid) -> Result<Visit, LifecycleError> {
        self.store
            .find_visit(visit_id)
            .await?
            .ok_or(LifecycleError::NotFound)
    }

    async fn fetch_by_scanned(&self, scanned: &str) -> Result<Visit, LifecycleError> {
        let token = pass::extract_token(scanned).ok_or(LifecycleError::NotFound)?;
        self.store
            .find_visit_by_token(&token)
            .await?
            .ok_or(LifecycleError::NotFound)
    }

    /// Builds the error for a guarded update that found the precondition
    /// gone: a concurrent caller won the race between our read and write.
    async fn stale_transition(&self, visit_id: Uuid, action: &'static str) -> LifecycleError {
        match self.store.find_visit(visit_id).await {
            Ok(Some(current)) => LifecycleError::InvalidTransition {
                current: current.status,
                action,
            },
            Ok(None) => LifecycleError::NotFound,
            Err(err) => err.into(),
        }
    }

    /// Inserts a visit, regenerating the session token on collision.
    async fn insert_with_fresh_token<F>(&self, build: F) -> Result<Visit, LifecycleError>
    where
        F: Fn(String) -> NewVisit,
    {
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            let candidate = generate_session_token();
            match self.store.insert_visit(build(candidate)).await {
                Ok(visit) => return Ok(visit),
                Err(StoreError::DuplicateToken) => {
                    tracing::warn!(attempt, "Session token collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(StoreError::Backend("session token collision retries exhausted".to_string()).into())
    }

    /// Appends the audit row for a committed transition. Best-effort: a
    /// failed append is logged and the status change stands.
    async fn append_event(&self, visit: &Visit, event_type: CheckEventType, actor: &Actor) {
        let event = NewCheckEvent {
            visit_id: visit.id,
            event_type,
            acting_user_id: actor.user_id(),
        };
        if let Err(err) = self.store.append_check_event(event).await {
            tracing::warn!(
                visit_id = %visit.id,
                event_type = %event_type,
                error = %err,
                "Check event append failed; status change stands"
            );
        }
    }

    /// Fire-and-forget host arrival notification.
    fn dispatch_arrival(&self, host: Host, visit: &Visit) {
        let notice = ArrivalNotice {
            visitor_name: visit.visitor_name.clone(),
            visitor_company: visit.visitor_company.clone(),
            purpose: visit.purpose.clone(),
            site: visit.site,
            checked_in_at: visit.check_in_at.unwrap_or_else(Utc::now),
        };
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let NotificationResult::Failed(reason) =
                notifier.notify_host_of_arrival(&host, &notice).await
            {
                tracing::warn!(host_id = %host.id, %reason, "Arrival notification failed");
            }
        });
    }

    /// Fire-and-forget visitor decision notification.
    fn dispatch_decision(&self, email: String, outcome: DecisionOutcome, host_name: String) {
        let notifier = Arc::clone(&self.notifier);
        tokio::spawn(async move {
            if let NotificationResult::Failed(reason) = notifier
                .notify_visitor_of_decision(&email, outcome, &host_name)
                .await
            {
                tracing::warn!(%outcome, %reason, "Decision notification failed");
            }
        });
    }
}
