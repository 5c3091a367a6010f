use std::sync::Arc;

use crate::assets::AssetStore;
use crate::config::AppConfig;
use crate::detect::SessionStore;
use crate::load::CachedLoader;

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub loader: Arc<CachedLoader>,
    pub assets: Arc<AssetStore>,
    pub sessions: Arc<tokio::sync::RwLock<SessionStore>>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let assets = AssetStore::new(&config.assets);
        let loader = CachedLoader::new(config.data.clone());
        Self {
            config: Arc::new(config),
            loader: Arc::new(loader),
            assets: Arc::new(assets),
            sessions: Arc::new(tokio::sync::RwLock::new(SessionStore::new())),
        }
    }
}
