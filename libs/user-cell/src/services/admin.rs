use anyhow::Result;
use tracing::debug;

use shared_database::DocumentStore;

/// True only when `email` belongs to a stored user whose role is exactly
/// `"admin"`. Unknown users are not admins.
pub async fn require_admin(store: &dyn DocumentStore, email: &str) -> Result<bool> {
    match store.find_user(email).await? {
        Some(user) => Ok(user.is_admin()),
        None => {
            debug!("No user record for {}, treating as non-admin", email);
            Ok(false)
        }
    }
}
