use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_database::{DocumentStore, InMemoryStore};
use shared_models::catalog::Service;

use crate::jwt::TokenService;
use crate::state::AppState;

pub struct TestConfig {
    pub jwt_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "test-secret-key-for-jwt-validation-must-be-long-enough".to_string(),
            supabase_url: String::new(),
            supabase_service_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_supabase(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            port: 0,
            access_token_secret: self.jwt_secret.clone(),
            supabase_url: self.supabase_url.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            store_timeout_secs: 5,
            request_timeout_secs: 5,
            catalog_seed_path: None,
        }
    }

    pub fn state_with(&self, store: Arc<dyn DocumentStore>) -> AppState {
        AppState::new(self.to_app_config(), store)
    }

    pub fn memory_state(&self) -> AppState {
        self.state_with(Arc::new(InMemoryStore::new()))
    }
}

pub struct JwtTestUtils;

impl JwtTestUtils {
    pub fn create_test_token(email: &str, secret: &str) -> String {
        TokenService::new(secret)
            .issue(email)
            .expect("test secret must not be empty")
    }

    pub fn create_expired_token(email: &str, secret: &str) -> String {
        TokenService::new(secret)
            .issue_at(email, Utc::now() - Duration::hours(2))
            .expect("test secret must not be empty")
    }

    pub fn create_invalid_signature_token(email: &str) -> String {
        Self::create_test_token(email, "wrong-secret")
    }

    pub fn create_malformed_token() -> String {
        "invalid.token.format".to_string()
    }

    pub fn bearer(token: &str) -> String {
        format!("Bearer {}", token)
    }
}

pub struct TestFixtures;

impl TestFixtures {
    pub fn dental_catalog() -> Vec<Service> {
        vec![
            Service::new(
                "Teeth Orthodontics",
                &["08.00 AM - 08.30 AM", "08.30 AM - 09.00 AM", "09.00 AM - 09.30 AM"],
            ),
            Service::new(
                "Cosmetic Dentistry",
                &["10.05 AM - 10.30 AM", "10.30 AM - 11.00 AM"],
            ),
            Service::new("Teeth Cleaning", &["9am", "10am", "11am"]),
        ]
    }

    pub fn service_row(id: &str, name: &str, slots: &[&str]) -> Value {
        json!({
            "id": id,
            "name": name,
            "slots": slots
        })
    }

    pub fn booking_row(id: &str, treatment: &str, date: &str, patient: &str, slot: &str) -> Value {
        json!({
            "id": id,
            "treatment": treatment,
            "date": date,
            "patient": patient,
            "slot": slot
        })
    }
}
