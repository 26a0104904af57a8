use tokio::sync::broadcast;
use tracing::{info, error, warn};

use pick_ban_backend::config::AppConfig;
use pick_ban_backend::services::{
    draft_store::DraftStore,
    schema::{connect, create_schema},
    session_registry::SessionRegistry,
    turn_timer::spawn_timer,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();

    let settings = match config.draft_settings() {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid draft settings: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match connect(&config.database_url, config.db_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("Could not connect to SQLite at {}: {}", config.database_url, e);
            std::process::exit(1);
        }
    };
    info!("Connected to sqlite database.");

    if let Err(e) = create_schema(&pool).await {
        error!("Could not create the schema: {}", e);
        std::process::exit(1);
    }

    let (tx, _rx) = broadcast::channel::<String>(config.broadcast_capacity);
    let store = DraftStore::new(pool.clone());

    let mut registry = SessionRegistry::new(settings);
    store.restore_into(&mut registry).await;
    let registry = registry.shared();

    // Restored drafts that are still running get their timers back.
    {
        let mut guard = registry.write().await;
        for id in guard.ids() {
            let running = guard.get(&id).map(|s| !s.state.completed).unwrap_or(false);
            if !running {
                continue;
            }
            let task = spawn_timer(registry.clone(), store.clone(), tx.clone(), id.clone());
            if let Err(e) = guard.attach_timer(&id, task) {
                warn!("Could not restart timer for {}: {}", id, e);
            }
        }
    }

    let app = pick_ban_backend::app(pool, registry, tx);

    let listener = match tokio::net::TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Could not bind {}: {}", config.bind_addr, e);
            std::process::exit(1);
        }
    };
    info!("Started server on {}.", config.bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
    }
}
