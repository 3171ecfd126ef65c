use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use placement_db::DbPool;
use placement_events::EventBus;
use placement_tracker::{ParticipationTracker, PgParticipationStore};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use placement_api::config::ServerConfig;
use placement_api::notifications::NotificationRouter;
use placement_api::router::build_app_router;
use placement_api::state::AppState;
use placement_api::ws::{self, WsManager};

const DEFAULT_LOG_FILTER: &str = "placement_api=debug,placement_tracker=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        duplicate_outcomes = ?config.tracker.duplicate_outcomes,
        on_reject = ?config.tracker.on_reject,
        "Loaded server configuration",
    );

    let pool = connect_database().await;

    let ws_manager = Arc::new(WsManager::new());
    let heartbeat = ws::start_heartbeat(Arc::clone(&ws_manager));

    // The notification router runs until the last `Arc<EventBus>` is
    // dropped: ours below, plus the tracker's inside the app state.
    let event_bus = Arc::new(EventBus::default());
    let notifier = spawn_notifier(&event_bus, &ws_manager);

    let tracker = Arc::new(ParticipationTracker::new(
        Arc::new(PgParticipationStore::new(pool.clone())),
        Arc::clone(&event_bus),
        config.tracker,
    ));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        ws_manager: Arc::clone(&ws_manager),
        event_bus: Arc::clone(&event_bus),
        tracker,
    };
    let app = build_app_router(state, &config);

    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Placement API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, cleaning up");
    drop(event_bus);
    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, notifier).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Notification router did not stop in time",
        );
    }

    ws_manager.close_all().await;
    heartbeat.abort();
    tracing::info!("Graceful shutdown complete");
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, check and migrate. Any failure aborts startup.
async fn connect_database() -> DbPool {
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = placement_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    placement_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    placement_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database ready");
    pool
}

fn spawn_notifier(event_bus: &EventBus, ws_manager: &Arc<WsManager>) -> JoinHandle<()> {
    let router = NotificationRouter::new(Arc::clone(ws_manager));
    let handle = tokio::spawn(router.run(event_bus.subscribe()));
    tracing::info!("Notification router started");
    handle
}

/// Resolves on SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
