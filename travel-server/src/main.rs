use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use travel_server::config::AppConfig;
use travel_server::feed::{FeedClient, run_refresh_loop};
use travel_server::graph::{RouteGraph, solar_system};
use travel_server::service::RouteService;
use travel_server::store::SqlitePricelistStore;
use travel_server::web::{AppState, cors_layer, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Open the store and make sure the schema exists
    let store = SqlitePricelistStore::builder()
        .path(&config.database_path)
        .retention(config.retention)
        .build()
        .expect("Failed to configure store");
    store.initialize().expect("Failed to initialize database");
    info!(path = %config.database_path.display(), "Opened price list store");

    let graph = match &config.route_graph_path {
        Some(path) => RouteGraph::load(path).expect("Failed to load route graph"),
        None => solar_system(),
    };
    info!(
        locations = graph.locations().len(),
        routes = graph.route_count(),
        "Loaded route graph"
    );

    let service = Arc::new(RouteService::new(
        store,
        graph,
        &config.cache,
        config.compose.clone(),
    ));

    // Keep a valid price list stored in the background
    match FeedClient::new(config.feed.clone()) {
        Ok(client) => {
            info!(url = client.url(), "Starting price list refresh");
            tokio::spawn(run_refresh_loop(
                service.clone(),
                client,
                config.refresh.clone(),
            ));
        }
        Err(err) => warn!(error = %err, "Price list refresh disabled"),
    }

    let app = create_router(
        AppState::new(service),
        cors_layer(config.cors_origin.as_deref()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "Travel server listening");
    info!("  GET  /health");
    info!("  GET  /api/get/:from/:destination");
    info!("  POST /api/post");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
