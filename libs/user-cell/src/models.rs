use serde::{Deserialize, Serialize};

use shared_models::user::UpdateResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStatus {
    pub admin: bool,
}

#[derive(Debug, Serialize)]
pub struct UpsertUserResponse {
    pub result: UpdateResult,
    pub token: String,
}
