pub mod memory;
pub mod store;
pub mod supabase;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use shared_config::AppConfig;
use shared_models::catalog::Service;

pub use memory::InMemoryStore;
pub use store::DocumentStore;
pub use supabase::SupabaseStore;

/// Opens the store selected by the configuration and checks that it answers.
pub async fn connect(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = if config.uses_supabase() {
        info!("Using Supabase store at {}", config.supabase_url);
        Arc::new(SupabaseStore::new(config)?)
    } else {
        warn!("Using in-memory store; data is lost on restart");
        let services = match &config.catalog_seed_path {
            Some(path) => load_catalog(path)?,
            None => Vec::new(),
        };
        Arc::new(InMemoryStore::with_services(services))
    };

    store.ping().await.context("document store is unreachable")?;
    Ok(store)
}

fn load_catalog(path: &str) -> Result<Vec<Service>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog seed {}", path))?;
    let services: Vec<Service> = serde_json::from_str(&raw)
        .with_context(|| format!("catalog seed {} is not a JSON array of services", path))?;
    info!("Seeded {} services from {}", services.len(), path);
    Ok(services)
}
