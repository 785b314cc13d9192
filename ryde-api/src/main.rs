use std::net::SocketAddr;
use std::sync::Arc;

use ryde_api::{app, AppState};
use ryde_routing::OsrmClient;
use ryde_store::{Config, DbClient, PgBookingRepository};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ryde_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().expect("Failed to load config");
    tracing::info!("Starting Ryde API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let osrm = OsrmClient::new(&config.routing.osrm_url, config.routing.request_timeout_secs)
        .expect("Failed to build OSRM client");

    let state = AppState {
        bookings: Arc::new(PgBookingRepository::new(db.pool.clone())),
        distance: Arc::new(osrm),
        rules: config.business_rules.clone(),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
