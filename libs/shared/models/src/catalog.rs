use serde::{Deserialize, Serialize};

/// A bookable treatment together with its fixed daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub slots: Vec<String>,
}

impl Service {
    pub fn new(name: impl Into<String>, slots: &[&str]) -> Self {
        Self {
            id: None,
            name: name.into(),
            slots: slots.iter().map(|slot| slot.to_string()).collect(),
        }
    }
}
