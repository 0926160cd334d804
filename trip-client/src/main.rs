use std::error::Error;

use tracing::{error, info, warn};

use trip_client::api::{MockTripsClient, TripsClient};
use trip_client::cache::SessionCache;
use trip_client::config::ClientConfig;
use trip_client::logging::init_logger;
use trip_client::planner::PlannerConfig;
use trip_client::session::SessionStore;
use trip_client::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    dotenvy::from_filename("./.env.local").ok();
    init_logger();

    if let Err(e) = run().await {
        error!("trip client stopped: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error>> {
    let config = ClientConfig::from_env()?;

    let store = config.session_store_path.as_ref().map(SessionStore::new);
    if store.is_none() {
        warn!("SESSION_STORE_PATH is empty; logins last only as long as the session");
    }
    let sessions = SessionCache::new(&config.cache, store, PlannerConfig::default());

    let state = match &config.mock_trips_path {
        Some(path) => {
            info!(path = %path.display(), "serving canned trips");
            AppState::new(MockTripsClient::new(path)?, sessions)
        }
        None => {
            let client = TripsClient::new(config.trips.clone())?;
            info!(base_url = client.base_url(), "using trips API");
            AppState::new(client, sessions)
        }
    };

    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Trip planner listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
