use serde::{Deserialize, Serialize};

/// Payload of an access token. Only the email identifies the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}
