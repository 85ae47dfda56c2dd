use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{debug, error, warn};
use urlencoding::encode;

use shared_config::AppConfig;
use shared_models::booking::{Admission, Booking};
use shared_models::catalog::Service;
use shared_models::user::{UpdateResult, UserRecord};

use crate::store::DocumentStore;

const SERVICES: &str = "/rest/v1/services";
const BOOKINGS: &str = "/rest/v1/bookings";
const USERS: &str = "/rest/v1/users";

/// Columns of the users table. Any other profile key lives in `profile`.
const USER_COLUMNS: &[&str] = &["email", "role", "name"];
const PROFILE_COLUMN: &str = "profile";

/// PostgREST-backed store. Duplicate bookings are rejected by the unique
/// index on (treatment, date, patient).
pub struct SupabaseStore {
    client: Client,
    base_url: String,
    service_key: String,
}

impl SupabaseStore {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.store_timeout_secs))
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            service_key: config.supabase_service_key.clone(),
        })
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !self.service_key.is_empty() {
            headers.insert("apikey", HeaderValue::from_str(&self.service_key)?);
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", self.service_key))?,
            );
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    fn representation(prefer: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static(prefer));
        headers
    }

    async fn find_existing_booking(&self, booking: &Booking) -> Result<Option<Booking>> {
        let path = format!(
            "{}?treatment=eq.{}&date=eq.{}&patient=eq.{}&limit=1",
            BOOKINGS,
            encode(&booking.treatment),
            encode(&booking.date),
            encode(&booking.patient),
        );
        let rows: Vec<Booking> = self.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }

    async fn find_user_row(&self, email: &str) -> Result<Option<Map<String, Value>>> {
        let path = format!("{}?email=eq.{}&limit=1", USERS, encode(email));
        let rows: Vec<Map<String, Value>> = self.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().next())
    }
}

/// Splits an upsert body into table columns, folding the remaining keys into
/// the stored `profile` object.
fn to_row(fields: Map<String, Value>, existing: Option<&Map<String, Value>>) -> Map<String, Value> {
    let mut row = Map::new();
    let mut extra = Map::new();

    for (key, value) in fields {
        if USER_COLUMNS.contains(&key.as_str()) {
            row.insert(key, value);
        } else {
            extra.insert(key, value);
        }
    }

    if !extra.is_empty() {
        let mut profile = match existing.and_then(|current| current.get(PROFILE_COLUMN)) {
            Some(Value::Object(stored)) => stored.clone(),
            _ => Map::new(),
        };
        profile.extend(extra);
        row.insert(PROFILE_COLUMN.to_string(), Value::Object(profile));
    }

    row
}

/// Lifts `profile` keys back to the top level. Columns win over profile keys,
/// and a set `role` column wins over a legacy `roll`.
fn from_row(mut row: Map<String, Value>) -> Map<String, Value> {
    if let Some(Value::Object(extra)) = row.remove(PROFILE_COLUMN) {
        for (key, value) in extra {
            row.entry(key).or_insert(value);
        }
    }

    if row.get("role").map_or(true, Value::is_null) {
        row.remove("role");
    } else {
        row.remove("roll");
    }

    row
}

fn to_user(row: Map<String, Value>) -> Result<UserRecord> {
    serde_json::from_value(Value::Object(from_row(row)))
        .map_err(|e| anyhow!("malformed user row: {}", e))
}

#[async_trait]
impl DocumentStore for SupabaseStore {
    async fn ping(&self) -> Result<()> {
        let path = format!("{}?select=name&limit=1", SERVICES);
        let _: Vec<Value> = self.request(Method::GET, &path, None).await?;
        Ok(())
    }

    async fn find_services(&self) -> Result<Vec<Service>> {
        let path = format!("{}?select=*", SERVICES);
        self.request(Method::GET, &path, None).await
    }

    async fn find_bookings_on(&self, date: &str) -> Result<Vec<Booking>> {
        let path = format!("{}?date=eq.{}", BOOKINGS, encode(date));
        self.request(Method::GET, &path, None).await
    }

    async fn find_bookings_for(&self, patient: &str) -> Result<Vec<Booking>> {
        let path = format!("{}?patient=eq.{}", BOOKINGS, encode(patient));
        self.request(Method::GET, &path, None).await
    }

    async fn insert_booking_unless_exists(&self, booking: Booking) -> Result<Admission> {
        if let Some(existing) = self.find_existing_booking(&booking).await? {
            return Ok(Admission::Existing(existing));
        }

        let mut row = serde_json::to_value(&booking)?;
        if let Some(fields) = row.as_object_mut() {
            fields.remove("_id");
        }

        let path = format!("{}?on_conflict=treatment,date,patient", BOOKINGS);
        let inserted: Vec<Booking> = self
            .request_with_headers(
                Method::POST,
                &path,
                Some(row),
                Some(Self::representation("return=representation,resolution=ignore-duplicates")),
            )
            .await?;

        if let Some(stored) = inserted.into_iter().next() {
            return Ok(Admission::Admitted(stored));
        }

        // The conflicting row was written between our read and insert.
        warn!("Concurrent booking detected for {} on {}", booking.patient, booking.date);
        self.find_existing_booking(&booking)
            .await?
            .map(Admission::Existing)
            .ok_or_else(|| anyhow!("Booking insert was ignored but no conflicting row was found"))
    }

    async fn find_users(&self) -> Result<Vec<UserRecord>> {
        let rows: Vec<Map<String, Value>> = self.request(Method::GET, USERS, None).await?;
        rows.into_iter().map(to_user).collect()
    }

    async fn find_user(&self, email: &str) -> Result<Option<UserRecord>> {
        self.find_user_row(email).await?.map(to_user).transpose()
    }

    async fn upsert_user(&self, email: &str, mut fields: Map<String, Value>) -> Result<UpdateResult> {
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.remove("_id");
        fields.remove("id");

        let existing = self.find_user_row(email).await?;
        let row = to_row(fields, existing.as_ref());

        if let Some(current) = &existing {
            if row.iter().all(|(key, value)| current.get(key) == Some(value)) {
                debug!("User {} unchanged", email);
                return Ok(UpdateResult::matched(false));
            }
        }

        let path = format!("{}?on_conflict=email", USERS);
        let rows: Vec<Value> = self
            .request_with_headers(
                Method::POST,
                &path,
                Some(Value::Object(row)),
                Some(Self::representation("return=representation,resolution=merge-duplicates")),
            )
            .await?;

        if existing.is_some() {
            return Ok(UpdateResult::matched(true));
        }

        let id = rows
            .first()
            .and_then(|row| row.get("id"))
            .map(|id| match id {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        Ok(UpdateResult::upserted(id))
    }

    async fn set_user_role(&self, email: &str, role: &str) -> Result<UpdateResult> {
        let Some(existing) = self.find_user(email).await? else {
            return Ok(UpdateResult::unmatched());
        };

        if existing.role.as_deref() == Some(role) {
            return Ok(UpdateResult::matched(false));
        }

        let path = format!("{}?email=eq.{}", USERS, encode(email));
        let _: Vec<Value> = self
            .request_with_headers(
                Method::PATCH,
                &path,
                Some(json!({ "role": role })),
                Some(Self::representation("return=representation")),
            )
            .await?;

        Ok(UpdateResult::matched(true))
    }
}
