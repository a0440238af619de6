use std::sync::Arc;

use lfsd_store::{DbMetaStore, MetaStore};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Admin HTTP server.
pub struct LfsdServer {
    state: AppState,
}

impl LfsdServer {
    pub fn new(config: ServerConfig, store: Arc<dyn MetaStore>) -> Self {
        Self {
            state: AppState::new(config, store),
        }
    }

    /// Open the metadata database at `config.meta_db` and wire the server
    /// around it.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = DbMetaStore::open(&config.meta_db)?;
        Ok(Self::new(config, Arc::new(store)))
    }

    pub fn from_state(state: AppState) -> Self {
        Self { state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.state.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let addr = self.state.config.bind_addr;
        let app = build_router(self.state);
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "lfsd admin listening");
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_creates_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            meta_db: dir.path().join("lfs.db"),
            ..Default::default()
        };
        let server = LfsdServer::open(config).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:8080".parse().unwrap());
        assert!(server.state().store.objects().unwrap().is_empty());
        let _router = server.router();
    }

    #[test]
    fn open_rejects_corrupt_database() {
        let dir = tempfile::tempdir().unwrap();
        let meta_db = dir.path().join("lfs.db");
        std::fs::write(&meta_db, vec![0x5a; 4096]).unwrap();
        let config = ServerConfig {
            meta_db,
            ..Default::default()
        };
        assert!(matches!(LfsdServer::open(config), Err(ServerError::Store(_))));
    }
}
