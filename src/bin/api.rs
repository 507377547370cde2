use anyhow::Result;
use reviewcheck::{
    app_state::AppState, classifier::ReviewClassifier, config::Config, extractor::ReviewExtractor,
    renderer, routes,
};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "reviewcheck=info,api=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    // Load configuration
    let config = Config::from_env()?;

    // Missing artifacts degrade the service instead of stopping it
    let classifier = match ReviewClassifier::load(config.model_dir()) {
        Ok(classifier) => {
            info!("Models loaded successfully");
            Some(Arc::new(classifier))
        }
        Err(e) => {
            error!("Error loading models: {}", e);
            None
        }
    };

    let extractor = ReviewExtractor::new(
        renderer::from_config(&config)?,
        config.max_concurrent_scrapes(),
        config.scrape_timeout(),
    );

    let app = routes::router(AppState::new(classifier, extractor));

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // serve until killed
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, draining connections...");
}
