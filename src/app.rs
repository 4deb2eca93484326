// src/app.rs

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::repositories::{BanStore, LoginGuardStore};
use crate::handlers::bans::{active_ban, create_ban};
use crate::handlers::health::health;
use crate::handlers::login::{check_login, report_login};
use crate::handlers::scan::scan_file;
use crate::scan::ScanPolicy;
use crate::security::extractors::tokens_match;
use crate::security::{BanRegistry, LoginGate, LoginGuard};

/// État partagé des handlers
#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<LoginGate>,
    pub scan: Arc<ScanPolicy>,
    service_token: Arc<str>,
}

impl AppState {
    pub fn new(
        config: &Config,
        guard_store: Arc<dyn LoginGuardStore>,
        ban_store: Arc<dyn BanStore>,
    ) -> Self {
        let gate = LoginGate::new(
            BanRegistry::new(ban_store),
            LoginGuard::new(guard_store),
            config.guard.clone(),
        );

        Self {
            gate: Arc::new(gate),
            scan: Arc::new(ScanPolicy::from_config(&config.scan)),
            service_token: Arc::from(config.service_token.as_str()),
        }
    }

    pub fn trust_proxy(&self) -> bool {
        self.gate.settings().trust_proxy
    }

    pub fn accepts_service_token(&self, token: &str) -> bool {
        tokens_match(self.service_token.as_bytes(), token.as_bytes())
    }
}

/// Configure les routes du gate (toutes réservées aux appelants internes)
pub fn gate_routes() -> Router<AppState> {
    Router::new()
        .route("/login/check", post(check_login))
        .route("/login/outcome", post(report_login))
        .route("/bans", post(create_ban))
        .route("/bans/active", get(active_ban))
        .route("/scan", post(scan_file))
}

/// Construit l'application complète
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/gate", gate_routes())
        // Middleware global de tracing
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
