use std::sync::Arc;

use shared_config::AppConfig;
use shared_database::DocumentStore;

use crate::jwt::TokenService;

/// Everything a handler needs, injected through axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let tokens = TokenService::new(&config.access_token_secret);
        Self {
            config: Arc::new(config),
            store,
            tokens,
        }
    }
}
