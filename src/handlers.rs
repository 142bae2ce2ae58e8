use crate::config::Config;
use crate::errors::{AppError, CaseFailure, ResultExt};
use crate::metrics::aggregate;
use crate::models::*;
use crate::normalizer::normalize_rows;
use crate::source::{CaseSource, CsvFileSource};
use crate::views::{assigned_view, full_view, AssignmentPolicy, EvenIdAssignment};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "AI-Driven DCA Management System API";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Where case rows come from; re-read on every request.
    pub source: Arc<dyn CaseSource>,
    /// Which cases the agent dashboard receives.
    pub assignment: Arc<dyn AssignmentPolicy>,
}

impl AppState {
    /// State reading the CSV file named by `config`, with parity assignment.
    pub fn from_config(config: Config) -> Self {
        let source = Arc::new(CsvFileSource::new(config.cases_csv_path.clone()));
        Self::new(config, source)
    }

    pub fn new(config: Config, source: Arc<dyn CaseSource>) -> Self {
        Self {
            config,
            source,
            assignment: Arc::new(EvenIdAssignment),
        }
    }

    pub fn with_assignment(mut self, assignment: Arc<dyn AssignmentPolicy>) -> Self {
        self.assignment = assignment;
        self
    }
}

/// Loads and normalizes the cases, then applies `transform`, all on the blocking pool.
///
/// Malformed rows are logged and dropped. A source read failure or a panic
/// inside `transform` fails the request.
async fn with_cases<T, F>(state: &AppState, transform: F) -> Result<T, AppError>
where
    F: FnOnce(&[Case]) -> T + Send + 'static,
    T: Send + 'static,
{
    let source = state.source.clone();

    tokio::task::spawn_blocking(move || -> Result<T, AppError> {
        let rows = source
            .load()
            .with_context(|| format!("Loading cases from {}", source.describe()))?;
        let batch = normalize_rows(&rows);
        batch.log_skipped();
        tracing::debug!(
            "Normalized {} of {} rows ({} skipped)",
            batch.cases.len(),
            rows.len(),
            batch.skipped.len()
        );
        Ok(transform(batch.cases.as_slice()))
    })
    .await
    .context("Case processing task")?
}

/// Health check endpoint.
///
/// Always HTTP 200; `source_available` reports whether the case source exists.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// * `(StatusCode, Json<HealthResponse>)` - HTTP 200 with the service status.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let source_available = state.source.is_available();
    if !source_available {
        tracing::debug!("Health check: case source {} unavailable", state.source.describe());
    }

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            message: format!("{} is running", SERVICE_NAME),
            source_available,
            version: VERSION.to_string(),
            timestamp: chrono::Utc::now(),
        }),
    )
}

/// GET /
///
/// Lists the available endpoints, including the legacy `/api/...` aliases.
///
/// # Returns
///
/// * `Json<IndexResponse>` - Service name, version and the endpoint map.
pub async fn index() -> Json<IndexResponse> {
    let endpoints: BTreeMap<String, String> = [
        ("health", "/health"),
        ("full_cases", "/cases/full"),
        ("assigned_cases", "/cases/assigned"),
        ("metrics", "/metrics"),
        ("docs", "/docs"),
        ("legacy_health", "/api/health"),
        ("admin_cases", "/api/admin/cases"),
        ("dca_cases", "/api/dca/cases"),
        ("admin_metrics", "/api/admin/metrics"),
    ]
    .into_iter()
    .map(|(name, path)| (name.to_string(), path.to_string()))
    .collect();

    Json(IndexResponse {
        message: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        endpoints,
    })
}

/// GET /cases/full
///
/// Every valid case with the admin dashboard's full field set.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// * `Result<Json<CasesResponse<FullCaseView>>, CaseFailure>` - The full case list, or an HTTP 500 with an empty `cases` array.
pub async fn full_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CasesResponse<FullCaseView>>, CaseFailure> {
    tracing::info!("GET /cases/full");

    let cases = with_cases(&state, full_view)
        .await
        .map_err(CaseFailure::cases)?;

    Ok(Json(CasesResponse::new(cases, "No cases found")))
}

/// GET /cases/assigned
///
/// Cases routed to the collections agent, reduced field set.
///
/// # Arguments
///
/// * `state` - The application state; its assignment policy picks the cases.
///
/// # Returns
///
/// * `Result<Json<CasesResponse<AssignedCaseView>>, CaseFailure>` - The assigned cases, or an HTTP 500 with an empty `cases` array.
pub async fn assigned_cases(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CasesResponse<AssignedCaseView>>, CaseFailure> {
    tracing::info!("GET /cases/assigned");

    let policy = state.assignment.clone();
    let cases = with_cases(&state, move |cases| assigned_view(cases, policy.as_ref()))
        .await
        .map_err(CaseFailure::cases)?;

    Ok(Json(CasesResponse::new(cases, "No assigned cases found")))
}

/// GET /metrics
///
/// Portfolio figures computed over every valid case.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// * `Result<Json<MetricsResponse>, CaseFailure>` - The aggregated metrics, or an HTTP 500 with an empty `metrics` object.
pub async fn metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsResponse>, CaseFailure> {
    tracing::info!("GET /metrics");

    let metrics = with_cases(&state, aggregate)
        .await
        .map_err(CaseFailure::metrics)?;

    let message = (metrics.total_cases == 0).then(|| "No cases found".to_string());
    Ok(Json(MetricsResponse {
        success: true,
        metrics,
        message,
    }))
}

const OPENAPI_SPEC: &str = include_str!("../openapi.yml");

/// Serves the OpenAPI document describing this API.
pub async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/yaml")],
        OPENAPI_SPEC,
    )
}

/// Serves a Swagger UI page that loads `serve_openapi_spec`.
pub async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>DCA Cases API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.yml",
                dom_id: '#swagger-ui',
                deepLinking: true
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
