use anyhow::Result;
use async_trait::async_trait;
use serde_json::{Map, Value};

use shared_models::booking::{Admission, Booking};
use shared_models::catalog::Service;
use shared_models::user::{UpdateResult, UserRecord};

/// The three collections the portal reads and writes: services, bookings and users.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap round trip used at startup.
    async fn ping(&self) -> Result<()>;

    async fn find_services(&self) -> Result<Vec<Service>>;

    async fn find_bookings_on(&self, date: &str) -> Result<Vec<Booking>>;

    async fn find_bookings_for(&self, patient: &str) -> Result<Vec<Booking>>;

    /// Inserts `booking` unless one with the same (treatment, date, patient)
    /// exists. Must be atomic with respect to concurrent callers.
    async fn insert_booking_unless_exists(&self, booking: Booking) -> Result<Admission>;

    async fn find_users(&self) -> Result<Vec<UserRecord>>;

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>>;

    /// Sets `fields` on the user keyed by `email`, creating it if absent.
    async fn upsert_user(&self, email: &str, fields: Map<String, Value>) -> Result<UpdateResult>;

    /// Sets the role of an existing user. Never creates one.
    async fn set_user_role(&self, email: &str, role: &str) -> Result<UpdateResult>;
}
