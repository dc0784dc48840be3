use std::net::SocketAddr;
use std::sync::Arc;

use rand::{distributions::Alphanumeric, Rng};
use serde_json::{Map, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use delivery_crm_backend::{
    config::Config, entities::TOKEN_SETTING, handlers::settings, routes, store::JsonFileStore,
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "delivery_crm_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting server at {}", config.server_addr());

    // Open the workbook (created with standard sheets on first run)
    let store = JsonFileStore::open(&config.data_file).expect("Failed to open data file");
    tracing::info!("Workbook loaded from {}", config.data_file);

    let state = AppState {
        store: Arc::new(store),
        config: config.clone(),
    };

    // Seed the shared-secret token if not configured yet
    seed_api_token(&state);

    // Create router with middleware
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any));

    let addr: SocketAddr = config.server_addr().parse().expect("Invalid address");
    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}

/// Seed a random API token on first run so a fresh deployment is usable.
fn seed_api_token(state: &AppState) {
    let current = settings::get_settings(state).expect("Failed to read settings");
    if current.contains_key(TOKEN_SETTING) {
        return;
    }

    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();

    let mut update = Map::new();
    update.insert(TOKEN_SETTING.to_string(), Value::String(token.clone()));
    settings::save_settings(state, update).expect("Failed to save API token");

    tracing::info!("API token generated: {token}");
}
