use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::Storage;
use crate::media::MediaHost;

/// Handles shared by every request. Built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn Storage>,
    pub media: Arc<dyn MediaHost>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Storage>, media: Arc<dyn MediaHost>) -> Self {
        Self {
            config: Arc::new(config),
            store,
            media,
        }
    }
}
