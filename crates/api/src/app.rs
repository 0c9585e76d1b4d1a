use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::VisitLifecycle;
use persistence::repositories::PgVisitStore;

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, rate_limit_middleware, require_desk_auth,
    security_headers_middleware, trace_id, RateLimiterState,
};
use crate::routes::{health, visits};
use crate::services::LifecycleNotifier;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub lifecycle: Arc<VisitLifecycle>,
    pub rate_limiter: Option<Arc<RateLimiterState>>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    // Explicit wiring: the lifecycle receives its record store and notifier
    // as constructor arguments.
    let store = Arc::new(PgVisitStore::new(pool.clone()));
    let notifier = Arc::new(LifecycleNotifier::new(config.notifications.clone()));
    let lifecycle = Arc::new(VisitLifecycle::new(store, notifier));

    // Rate limiter is active when rate_limit_per_minute > 0
    let rate_limiter = if config.security.rate_limit_per_minute > 0 {
        Some(Arc::new(RateLimiterState::new(
            config.security.rate_limit_per_minute,
        )))
    } else {
        None
    };

    let state = AppState {
        pool,
        config: config.clone(),
        lifecycle,
        rate_limiter,
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Desk routes (reception kiosk + checkpoint scanner, API key).
    // Middleware order: auth runs first, then rate limiting keyed by the
    // authenticated caller.
    let desk_routes = Router::new()
        .route("/api/v1/visits", post(visits::create_walk_in))
        .route(
            "/api/v1/visits/by-token/:token",
            get(visits::visit_by_token),
        )
        .route(
            "/api/v1/visits/confirm-arrival",
            post(visits::confirm_arrival),
        )
        .route("/api/v1/visits/checkout", post(visits::checkout))
        .route("/api/v1/visits/active", get(visits::active_visits))
        .route("/api/v1/visits/history", get(visits::visit_history))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_desk_auth,
        ));

    // Host portal routes (Bearer JWT via extractor)
    let host_routes = Router::new()
        .route("/api/v1/visits/pre-register", post(visits::pre_register))
        .route("/api/v1/visits/pending", get(visits::pending_for_host))
        .route(
            "/api/v1/visits/:visit_id/approve",
            post(visits::approve_visit),
        )
        .route(
            "/api/v1/visits/:visit_id/reject",
            post(visits::reject_visit),
        );

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(desk_routes)
        .merge(host_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
