use std::sync::Arc;

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use shared_database::DocumentStore;
use shared_models::user::{UpdateResult, UserRecord, ADMIN_ROLE};

use crate::services::admin::require_admin;

pub struct UserService {
    store: Arc<dyn DocumentStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.store.find_users().await
    }

    /// Role fields in the body are dropped; roles only change through `grant_admin`.
    pub async fn upsert_user(&self, email: &str, mut fields: Map<String, Value>) -> Result<UpdateResult> {
        let had_role = fields.remove("role").is_some();
        let had_legacy_role = fields.remove("roll").is_some();
        if had_role || had_legacy_role {
            warn!("Ignoring role in profile update for {}", email);
        }

        debug!("Upserting user {}", email);
        self.store.upsert_user(email, fields).await
    }

    pub async fn is_admin(&self, email: &str) -> Result<bool> {
        require_admin(self.store.as_ref(), email).await
    }

    /// Promotes `email` to admin on behalf of `requester`. Returns `None` when
    /// the requester is not an admin themselves.
    pub async fn grant_admin(&self, requester: &str, email: &str) -> Result<Option<UpdateResult>> {
        if !self.is_admin(requester).await? {
            warn!("{} tried to make {} an admin without being one", requester, email);
            return Ok(None);
        }

        let result = self.store.set_user_role(email, ADMIN_ROLE).await?;
        info!("{} made {} an admin (matched {})", requester, email, result.matched_count);
        Ok(Some(result))
    }
}
