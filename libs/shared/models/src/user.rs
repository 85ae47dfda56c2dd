use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ADMIN_ROLE: &str = "admin";

/// A stored user document. Profile fields other than `email` and `role` are
/// kept as-is in `profile`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    // Older documents store the role under `roll`.
    #[serde(alias = "roll", default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }
}

/// Summary of a write against the users collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResult {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateResult {
    pub fn matched(modified: bool) -> Self {
        Self {
            acknowledged: true,
            matched_count: 1,
            modified_count: u64::from(modified),
            ..Self::default()
        }
    }

    pub fn upserted(id: Option<String>) -> Self {
        Self {
            acknowledged: true,
            upserted_count: 1,
            upserted_id: id,
            ..Self::default()
        }
    }

    pub fn unmatched() -> Self {
        Self {
            acknowledged: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_admin_requires_exact_role() {
        let admin: UserRecord = serde_json::from_value(json!({"email": "a@x.com", "role": "admin"})).unwrap();
        let shouty: UserRecord = serde_json::from_value(json!({"email": "b@x.com", "role": "Admin"})).unwrap();
        let plain: UserRecord = serde_json::from_value(json!({"email": "c@x.com"})).unwrap();

        assert!(admin.is_admin());
        assert!(!shouty.is_admin());
        assert!(!plain.is_admin());
    }

    #[test]
    fn test_legacy_roll_field() {
        let user: UserRecord = serde_json::from_value(json!({
            "email": "a@x.com",
            "roll": "admin",
            "name": "Ada"
        }))
        .unwrap();

        assert!(user.is_admin());
        assert_eq!(user.profile.get("name"), Some(&json!("Ada")));
    }

    #[test]
    fn test_update_result_wire_names() {
        let value = serde_json::to_value(UpdateResult::upserted(Some("42".to_string()))).unwrap();

        assert_eq!(value["upsertedCount"], 1);
        assert_eq!(value["upsertedId"], "42");
        assert_eq!(value["matchedCount"], 0);
    }
}
