use dca_cases_api::app::build_router;
use dca_cases_api::config::Config;
use dca_cases_api::handlers::AppState;
use dca_cases_api::normalizer::normalize_rows;
use dca_cases_api::source::CaseSource;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logs whether the case source is present and how much of it is usable.
///
/// A missing or unreadable source is only a warning: requests re-read it
/// and will pick it up once it appears.
fn report_source(source: &dyn CaseSource) {
    if !source.is_available() {
        tracing::warn!("✗ Case source not found at {}", source.describe());
        return;
    }

    match source.load() {
        Ok(rows) => {
            let batch = normalize_rows(&rows);
            tracing::info!("✓ Case source found: {}", source.describe());
            tracing::info!(
                "✓ Loaded {} rows ({} valid cases, {} skipped)",
                rows.len(),
                batch.cases.len(),
                batch.skipped.len()
            );
        }
        Err(e) => tracing::warn!("✗ Case source present but unreadable: {}", e),
    }
}

/// Main entry point for the application.
///
/// Initializes tracing, loads configuration, checks the case source and
/// starts the Axum server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dca_cases_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let app_state = Arc::new(AppState::from_config(config.clone()));
    report_source(app_state.source.as_ref());

    let app = build_router(app_state)?;

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
