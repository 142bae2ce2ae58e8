use crate::handlers::{self, AppState};
use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor, GovernorLayer,
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// All endpoints are GET-only; anything larger than this is rejected outright.
const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Builds the full application router.
///
/// `/health` and `/api/health` sit outside the rate limiter; every other
/// route shares the body limit and, when configured, the per-IP limiter.
/// The limiter reads the peer address, so serve the router with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let mut api_routes = Router::new()
        .route("/", get(handlers::index))
        .route("/docs", get(handlers::serve_swagger_ui))
        .route("/api-docs/openapi.yml", get(handlers::serve_openapi_spec))
        .route("/cases/full", get(handlers::full_cases))
        .route("/cases/assigned", get(handlers::assigned_cases))
        .route("/metrics", get(handlers::metrics))
        // Paths the dashboards were first built against
        .route("/api/admin/cases", get(handlers::full_cases))
        .route("/api/dca/cases", get(handlers::assigned_cases))
        .route("/api/admin/metrics", get(handlers::metrics))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BODY_BYTES));

    if let Some(per_second) = state.config.rate_limit_per_second {
        // The builder takes the replenish period of one token, not a rate.
        let millis_per_token = (1000 / per_second).max(1);
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .per_millisecond(millis_per_token)
                .burst_size(state.config.rate_limit_burst)
                .key_extractor(SmartIpKeyExtractor)
                .finish()
                .ok_or_else(|| anyhow::anyhow!("Invalid rate limiter configuration"))?,
        );
        api_routes = api_routes.layer(ServiceBuilder::new().layer(GovernorLayer {
            config: governor_conf,
        }));
    }

    let cors = match state.config.cors_origin.as_deref() {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<HeaderValue>()?)
            .allow_methods([Method::GET]),
        None => CorsLayer::permissive(),
    };

    let app = Router::new()
        .route("/health", get(handlers::health))
        .route("/api/health", get(handlers::health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Ok(app)
}
