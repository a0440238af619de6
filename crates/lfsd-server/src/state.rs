use std::sync::Arc;

use lfsd_reconcile::{FsTreeSource, ReconcileOptions, Reconciler, TreeSource};
use lfsd_store::MetaStore;

use crate::auth::{AdminAuth, AuthProvider};
use crate::config::ServerConfig;

/// Shared state handed to every admin handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub store: Arc<dyn MetaStore>,
    /// Content tree walked by refresh.
    pub source: Arc<dyn TreeSource>,
    pub reconciler: Reconciler,
    pub auth: Arc<dyn AuthProvider>,
}

impl AppState {
    /// Wire the admin surface from configuration: the content tree at
    /// `content_path` and Basic auth against the configured admin identity.
    pub fn new(config: ServerConfig, store: Arc<dyn MetaStore>) -> Self {
        let source = Arc::new(FsTreeSource::new(config.content_path.clone()));
        Self::with_source(config, store, source)
    }

    /// Like [`AppState::new`] but walking an arbitrary tree.
    pub fn with_source(
        config: ServerConfig,
        store: Arc<dyn MetaStore>,
        source: Arc<dyn TreeSource>,
    ) -> Self {
        let reconciler = Reconciler::with_options(
            store.clone(),
            ReconcileOptions {
                batch_size: config.refresh_batch_size,
            },
        );
        let auth = Arc::new(AdminAuth::from_config(&config));
        Self {
            config: Arc::new(config),
            store,
            source,
            reconciler,
            auth,
        }
    }
}
