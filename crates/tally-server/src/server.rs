use std::net::SocketAddr;

use tally_ledger::VoteLedger;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Tally voting server.
pub struct TallyServer {
    config: ServerConfig,
}

impl TallyServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the configured store and wrap it in a ledger.
    pub fn ledger(&self) -> ServerResult<VoteLedger> {
        let store = self.config.store.open()?;
        Ok(VoteLedger::new(store).with_cooldown_ms(self.config.cooldown_ms))
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> ServerResult<axum::Router> {
        let state = AppState::new(self.ledger()?);
        Ok(build_router(state, self.config.enable_cors))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let ledger = self.ledger()?;
        tracing::info!(store = %ledger.store().describe(), "opened vote store");
        let app = build_router(AppState::new(ledger), self.config.enable_cors);

        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("Tally server listening on {}", self.config.bind_addr);
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;

    #[test]
    fn server_construction() {
        let server = TallyServer::new(ServerConfig::default());
        assert_eq!(server.config().bind_addr, "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn router_builds() {
        let config = ServerConfig {
            store: StoreConfig::Memory,
            ..Default::default()
        };
        let server = TallyServer::new(config);
        let _router = server.router().unwrap();
    }

    #[test]
    fn ledger_uses_configured_cooldown() {
        let config = ServerConfig {
            store: StoreConfig::Memory,
            cooldown_ms: 60_000,
            ..Default::default()
        };
        let ledger = TallyServer::new(config).ledger().unwrap();
        assert_eq!(ledger.cooldown_ms(), 60_000);
    }
}
