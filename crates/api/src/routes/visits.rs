//! Visit lifecycle routes.
//!
//! Desk routes (API key): walk-in creation, token lookup, arrival
//! confirmation, checkout, active list, history. Host-portal routes
//! (JWT): pre-registration, pending list, approve, reject.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;
use validator::Validate;

use domain::models::{
    ActiveVisitsQuery, CheckpointRequest, CreateWalkInRequest, PreRegisterRequest, RejectRequest,
    VisitHistoryQuery, VisitHistoryResponse, VisitSummary,
};
use domain::services::{Actor, VisitLifecycle};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{DeskAuth, UserAuth};
use crate::middleware::metrics::{record_visit_checked_out, record_visit_created};

/// Response for a rejection.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RejectResponse {
    pub message: String,
}

/// Create a walk-in visit, checked in immediately.
///
/// POST /api/v1/visits
pub async fn create_walk_in(
    State(state): State<AppState>,
    desk: DeskAuth,
    Json(request): Json<CreateWalkInRequest>,
) -> Result<(StatusCode, Json<VisitSummary>), ApiError> {
    request.validate()?;

    let visit = state
        .lifecycle
        .create_walk_in(request, &Actor::anonymous_desk())
        .await?;

    record_visit_created("walk_in");
    tracing::info!(
        visit_id = %visit.id,
        desk = %desk.fingerprint,
        "Walk-in visit created"
    );

    let pass = VisitLifecycle::gate_pass(&visit);
    Ok((StatusCode::CREATED, Json(VisitSummary::from(visit).with_pass(pass))))
}

/// Pre-register a visit for the acting host.
///
/// POST /api/v1/visits/pre-register
pub async fn pre_register(
    State(state): State<AppState>,
    user: UserAuth,
    Json(request): Json<PreRegisterRequest>,
) -> Result<(StatusCode, Json<VisitSummary>), ApiError> {
    request.validate()?;

    let actor = state.lifecycle.resolve_host_actor(user.user_id).await?;
    let visit = state.lifecycle.pre_register(request, &actor).await?;

    record_visit_created("pre_registered");

    let pass = VisitLifecycle::gate_pass(&visit);
    Ok((StatusCode::CREATED, Json(VisitSummary::from(visit).with_pass(pass))))
}

/// Pending pre-registrations for the acting host.
///
/// GET /api/v1/visits/pending
pub async fn pending_for_host(
    State(state): State<AppState>,
    user: UserAuth,
) -> Result<Json<Vec<VisitSummary>>, ApiError> {
    let actor = state.lifecycle.resolve_host_actor(user.user_id).await?;
    let visits = state.lifecycle.pending_for_host(&actor).await?;

    Ok(Json(visits.into_iter().map(VisitSummary::from).collect()))
}

/// Approve a pending visit. Owner-only.
///
/// POST /api/v1/visits/:visit_id/approve
pub async fn approve_visit(
    State(state): State<AppState>,
    user: UserAuth,
    Path(visit_id): Path<Uuid>,
) -> Result<Json<VisitSummary>, ApiError> {
    let actor = state.lifecycle.resolve_host_actor(user.user_id).await?;
    let visit = state.lifecycle.approve(visit_id, &actor).await?;

    Ok(Json(visit.into()))
}

/// Reject a pending visit. Owner-only.
///
/// POST /api/v1/visits/:visit_id/reject
pub async fn reject_visit(
    State(state): State<AppState>,
    user: UserAuth,
    Path(visit_id): Path<Uuid>,
    Json(request): Json<RejectRequest>,
) -> Result<Json<RejectResponse>, ApiError> {
    request.validate()?;

    let actor = state.lifecycle.resolve_host_actor(user.user_id).await?;
    state
        .lifecycle
        .reject(visit_id, &actor, request.reason)
        .await?;

    Ok(Json(RejectResponse {
        message: "Visit rejected".to_string(),
    }))
}

/// Look a visit up by session token (any accepted shape).
///
/// GET /api/v1/visits/by-token/:token
pub async fn visit_by_token(
    State(state): State<AppState>,
    _desk: DeskAuth,
    Path(token): Path<String>,
) -> Result<Json<VisitSummary>, ApiError> {
    let visit = state.lifecycle.visit_by_token(&token).await?;

    let pass = VisitLifecycle::gate_pass(&visit);
    Ok(Json(VisitSummary::from(visit).with_pass(pass)))
}

/// Check an approved pre-registered visitor in at the checkpoint.
///
/// POST /api/v1/visits/confirm-arrival
pub async fn confirm_arrival(
    State(state): State<AppState>,
    _desk: DeskAuth,
    Json(request): Json<CheckpointRequest>,
) -> Result<Json<VisitSummary>, ApiError> {
    let visit = state
        .lifecycle
        .confirm_arrival(&request.pass, &Actor::anonymous_desk())
        .await?;

    Ok(Json(visit.into()))
}

/// Check a visitor out at the checkpoint.
///
/// POST /api/v1/visits/checkout
pub async fn checkout(
    State(state): State<AppState>,
    _desk: DeskAuth,
    Json(request): Json<CheckpointRequest>,
) -> Result<Json<VisitSummary>, ApiError> {
    let visit = state
        .lifecycle
        .checkout(&request.pass, &Actor::anonymous_desk())
        .await?;

    record_visit_checked_out();

    Ok(Json(visit.into()))
}

/// All visitors currently on site.
///
/// GET /api/v1/visits/active
pub async fn active_visits(
    State(state): State<AppState>,
    _desk: DeskAuth,
    Query(query): Query<ActiveVisitsQuery>,
) -> Result<Json<Vec<VisitSummary>>, ApiError> {
    let visits = state
        .lifecycle
        .active_visits(query.location.as_deref())
        .await?;

    Ok(Json(visits.into_iter().map(VisitSummary::from).collect()))
}

/// Bounded, newest-first visit history.
///
/// GET /api/v1/visits/history
pub async fn visit_history(
    State(state): State<AppState>,
    _desk: DeskAuth,
    Query(query): Query<VisitHistoryQuery>,
) -> Result<Json<VisitHistoryResponse>, ApiError> {
    let response = state.lifecycle.visit_history(query).await?;
    Ok(Json(response))
}
