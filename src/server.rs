use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    catalog::CatalogService,
    config::Config,
    handlers::{self, AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Start the pricing simulator server
///
/// This function:
/// 1. Initializes metrics (when enabled)
/// 2. Builds the catalog service and optionally preloads it
/// 3. Sets up signal handlers for graceful shutdown and catalog reload
/// 4. Binds to the configured address and serves until shutdown
pub async fn start_server(config: Config) -> Result<()> {
    let metrics_route = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        let handle = Arc::new(metrics::init_metrics()?);
        Some((config.metrics.endpoint.clone(), handle))
    } else {
        None
    };

    let catalogs = Arc::new(CatalogService::from_config(&config.catalog));
    info!(
        services = %config.catalog.services_path().display(),
        solutions = %config.catalog.solutions_path().display(),
        "Catalog sources configured"
    );

    if config.catalog.preload {
        // A missing workbook must not keep the server down; requests retry
        if let Err(e) = catalogs.reload().await {
            warn!("Catalog preload failed, will retry on first request: {}", e);
        }
    }

    let (shutdown_tx, signal_handle) = setup_signal_handlers(catalogs.clone())?;
    let mut shutdown_rx = shutdown_tx.subscribe();

    let state = AppState {
        catalogs,
        quote: Arc::new(config.quote.clone()),
    };
    let app = create_router(state, metrics_route);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting pricing simulator on {}", addr);
    info!(
        "Quotes: default margin {}%, currency {} at {}",
        config.quote.default_margin_percent, config.quote.currency, config.quote.exchange_rate
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
///
/// `metrics_route` carries the scrape path and recorder handle when metrics
/// are enabled.
pub fn create_router(
    state: AppState,
    metrics_route: Option<(String, Arc<PrometheusHandle>)>,
) -> Router {
    let api = Router::new()
        .route("/api/precios", get(handlers::catalog::list_prices))
        .route("/api/precios-old", get(handlers::catalog::list_legacy_prices))
        .route("/api/cotizacion", post(handlers::quote::compute_quote))
        .route("/api/cotizacion/imprimir", post(handlers::quote::print_quote))
        .route("/api/simulacion", post(handlers::quote::simulate))
        .route("/ready", get(handlers::health::readiness_check))
        .with_state(state);

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(api);

    if let Some((endpoint, handle)) = metrics_route {
        app = app.merge(
            Router::new()
                .route(&endpoint, get(handlers::metrics_handler::metrics))
                .with_state(handle),
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    app.layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
