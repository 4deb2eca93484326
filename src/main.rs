use std::net::SocketAddr;
use std::sync::Arc;

use personnel_gate::app::{AppState, build_router};
use personnel_gate::config::{Config, StoreBackend};
use personnel_gate::db::connection::create_pool;
use personnel_gate::db::repositories::login_guard_repository::LoginGuardRepository;
use personnel_gate::db::repositories::memory::{MemoryBanStore, MemoryLoginGuardStore};
use personnel_gate::db::repositories::security_ban_repository::SecurityBanRepository;
use personnel_gate::db::repositories::{BanStore, LoginGuardStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Si RUST_LOG n'est pas défini, utiliser ces règles par défaut
        tracing_subscriber::EnvFilter::new("info,personnel_gate=debug,audit=info,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

type Stores = (Arc<dyn LoginGuardStore>, Arc<dyn BanStore>);

fn build_stores(config: &Config) -> anyhow::Result<Stores> {
    match config.store {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("DATABASE_URL is required for the postgres store"))?;
            let pool = create_pool(url)?;
            tracing::info!("📦 Using Postgres store");
            Ok((
                Arc::new(LoginGuardRepository::new(pool.clone())),
                Arc::new(SecurityBanRepository::new(pool)),
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("⚠️  Using in-memory store: state is not shared between processes");
            Ok((
                Arc::new(MemoryLoginGuardStore::new()),
                Arc::new(MemoryBanStore::new()),
            ))
        }
    }
}

// ----------------- Main -----------------

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    tracing::info!("Starting personnel-gate...");

    let config = Config::from_env()?;
    let (guard_store, ban_store) = build_stores(&config)?;
    let state = AppState::new(&config, guard_store, ban_store);

    if state.scan.is_enabled() {
        tracing::info!("🛡️  Upload scanning enabled ({:?} mode)", config.scan.mode);
    } else {
        tracing::warn!("⚠️  Upload scanning disabled (SCAN_ENABLED=false)");
    }

    let app = build_router(state);
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Server running at http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
