use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use shared_database::DocumentStore;
use shared_models::catalog::Service;

use crate::services::availability::compute_availability;

pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_services(&self) -> Result<Vec<Service>> {
        self.store.find_services().await
    }

    /// Catalog with each service's slots narrowed to those still free on `date`.
    pub async fn available_on(&self, date: &str) -> Result<Vec<Service>> {
        let services = self.store.find_services().await?;
        let bookings = self.store.find_bookings_on(date).await?;

        debug!(
            "Computing availability for {} over {} services and {} bookings",
            date,
            services.len(),
            bookings.len()
        );

        Ok(compute_availability(services, &bookings, date))
    }
}
