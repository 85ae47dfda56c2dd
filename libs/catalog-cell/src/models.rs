use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<String>,
}
