use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::booking::{Admission, Booking};
use shared_models::catalog::Service;
use shared_models::user::{UpdateResult, UserRecord};

use crate::store::DocumentStore;

#[derive(Default)]
struct Collections {
    services: Vec<Service>,
    bookings: Vec<Booking>,
    users: Vec<Map<String, Value>>,
}

/// Process-local store for development and tests. Users are kept as raw
/// documents so that upserts can merge arbitrary profile fields.
#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<Collections>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_services(services: Vec<Service>) -> Self {
        Self {
            collections: RwLock::new(Collections {
                services,
                ..Collections::default()
            }),
        }
    }

    pub async fn booking_count(&self) -> usize {
        self.collections.read().await.bookings.len()
    }

    fn new_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

fn document_email(document: &Map<String, Value>) -> Option<&str> {
    document.get("email").and_then(Value::as_str)
}

fn to_user(document: &Map<String, Value>) -> Result<UserRecord> {
    serde_json::from_value(Value::Object(document.clone()))
        .map_err(|e| anyhow!("malformed user document: {}", e))
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn find_services(&self) -> Result<Vec<Service>> {
        Ok(self.collections.read().await.services.clone())
    }

    async fn find_bookings_on(&self, date: &str) -> Result<Vec<Booking>> {
        let collections = self.collections.read().await;
        Ok(collections
            .bookings
            .iter()
            .filter(|booking| booking.date == date)
            .cloned()
            .collect())
    }

    async fn find_bookings_for(&self, patient: &str) -> Result<Vec<Booking>> {
        let collections = self.collections.read().await;
        Ok(collections
            .bookings
            .iter()
            .filter(|booking| booking.patient == patient)
            .cloned()
            .collect())
    }

    async fn insert_booking_unless_exists(&self, mut booking: Booking) -> Result<Admission> {
        // Check and insert under one write guard.
        let mut collections = self.collections.write().await;

        if let Some(existing) = collections
            .bookings
            .iter()
            .find(|stored| booking.key().matches(stored))
        {
            debug!("Booking for {} on {} already exists", existing.patient, existing.date);
            return Ok(Admission::Existing(existing.clone()));
        }

        booking.id = Some(Self::new_id());
        collections.bookings.push(booking.clone());
        Ok(Admission::Admitted(booking))
    }

    async fn find_users(&self) -> Result<Vec<UserRecord>> {
        let collections = self.collections.read().await;
        collections.users.iter().map(to_user).collect()
    }

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>> {
        let collections = self.collections.read().await;
        collections
            .users
            .iter()
            .find(|document| document_email(document) == Some(email))
            .map(to_user)
            .transpose()
    }

    async fn upsert_user(&self, email: &str, mut fields: Map<String, Value>) -> Result<UpdateResult> {
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.remove("_id");

        let mut collections = self.collections.write().await;

        if let Some(document) = collections
            .users
            .iter_mut()
            .find(|document| document_email(document) == Some(email))
        {
            let mut modified = false;
            for (key, value) in fields {
                if document.get(&key) != Some(&value) {
                    document.insert(key, value);
                    modified = true;
                }
            }
            return Ok(UpdateResult::matched(modified));
        }

        let id = Self::new_id();
        fields.insert("_id".to_string(), Value::String(id.clone()));
        collections.users.push(fields);
        Ok(UpdateResult::upserted(Some(id)))
    }

    async fn set_user_role(&self, email: &str, role: &str) -> Result<UpdateResult> {
        let mut collections = self.collections.write().await;

        let Some(document) = collections
            .users
            .iter_mut()
            .find(|document| document_email(document) == Some(email))
        else {
            return Ok(UpdateResult::unmatched());
        };

        let role = Value::String(role.to_string());
        // Normalise legacy documents onto `role`.
        let legacy = document.remove("roll");
        let modified = document.get("role") != Some(&role) || legacy.is_some();
        document.insert("role".to_string(), role);
        Ok(UpdateResult::matched(modified))
    }
}
