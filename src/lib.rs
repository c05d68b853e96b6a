pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

use modules::account::{AccountStore, AccountWriter};
use modules::auth::{admin_routes, auth_routes};
use modules::ledger::ledger_routes;
use modules::metrics::metrics_routes;
use services::accounts::AccountLifecycle;
use services::clock::Clock;
use services::jwt::JwtService;
use services::ledger::Ledger;
use services::metrics::AuthMetrics;
use services::notifier::Notifier;
use services::otp::OtpEngine;
use services::rate_limit::OtpThrottle;
use services::security::security_headers;
use services::session::SessionManager;

const MAX_BODY_BYTES: usize = 100 * 1024;
const MAX_IN_FLIGHT_REQUESTS: usize = 1024;

/// Everything the services need from the outside world.
pub struct Dependencies {
    pub store: Arc<dyn AccountStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
    pub jwt_service: JwtService,
    pub otp_requests_per_hour: u32,
}

pub struct AppState {
    pub lifecycle: AccountLifecycle,
    pub otp: OtpEngine,
    pub sessions: SessionManager,
    pub ledger: Ledger,
    pub otp_throttle: OtpThrottle,
    pub metrics: Arc<AuthMetrics>,
}

impl AppState {
    pub fn new(deps: Dependencies) -> Result<Arc<Self>, prometheus::Error> {
        let metrics = AuthMetrics::new()?;
        let writer = AccountWriter::new(deps.store, deps.clock.clone());

        Ok(Arc::new(Self {
            lifecycle: AccountLifecycle::new(
                writer.clone(),
                deps.clock.clone(),
                deps.notifier.clone(),
                metrics.clone(),
            ),
            otp: OtpEngine::new(
                writer.clone(),
                deps.clock.clone(),
                deps.notifier,
                metrics.clone(),
            ),
            sessions: SessionManager::new(writer.clone(), deps.jwt_service, metrics.clone()),
            ledger: Ledger::new(writer, deps.clock, metrics.clone()),
            otp_throttle: OtpThrottle::new(deps.otp_requests_per_hour),
            metrics,
        }))
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(root))
        .merge(metrics_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin_routes())
        .merge(ledger_routes())
        .layer(middleware::from_fn(security_headers))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "Recipe Accounts API"
}
