use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use tracing::debug;

use shared_models::auth::TokenClaims;

/// Lifetime of an access token.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Token signing secret is not set")]
    MissingSecret,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Failed to sign token: {0}")]
    Signing(String),
}

/// Issues and verifies HS256 access tokens carrying the caller's email.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    configured: bool,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            configured: !secret.is_empty(),
        }
    }

    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        self.issue_at(email, Utc::now())
    }

    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        if !self.configured {
            return Err(AuthError::MissingSecret);
        }

        let claims = TokenClaims {
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, Utc::now())
    }

    /// Checks the signature, then expiry against `now` with no leeway.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, AuthError> {
        if !self.configured {
            return Err(AuthError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(token, &self.decoding, &validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken(e.to_string())
        })?;

        let claims = data.claims;
        if claims.exp <= now.timestamp() {
            debug!("Token expired at {} (now: {})", claims.exp, now.timestamp());
            return Err(AuthError::InvalidToken("Token expired".to_string()));
        }

        debug!("Token validated successfully for: {}", claims.email);
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    const SECRET: &str = "test-secret-key-for-jwt-validation";

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_round_trip_within_expiry() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue_at("a@x.com", fixed_now()).unwrap();

        let claims = tokens
            .verify_at(&token, fixed_now() + Duration::minutes(59))
            .unwrap();

        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_SECS);
    }

    #[test]
    fn test_round_trip_with_real_clock() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue("patient+tag@example.com").unwrap();

        assert_eq!(tokens.verify(&token).unwrap().email, "patient+tag@example.com");
    }

    #[test]
    fn test_expired_after_one_hour() {
        let tokens = TokenService::new(SECRET);
        let token = tokens.issue_at("a@x.com", fixed_now()).unwrap();

        let at_expiry = tokens.verify_at(&token, fixed_now() + Duration::hours(1));
        let later = tokens.verify_at(&token, fixed_now() + Duration::hours(2));

        assert_matches!(at_expiry, Err(AuthError::InvalidToken(_)));
        assert_matches!(later, Err(AuthError::InvalidToken(msg)) => assert_eq!(msg, "Token expired"));
    }

    #[test]
    fn test_token_issued_long_ago_fails_real_clock() {
        let tokens = TokenService::new(SECRET);
        let token = tokens
            .issue_at("a@x.com", Utc::now() - Duration::hours(2))
            .unwrap();

        assert_matches!(tokens.verify(&token), Err(AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let issuer = TokenService::new("some-other-secret");
        let verifier = TokenService::new(SECRET);
        let token = issuer.issue_at("a@x.com", fixed_now()).unwrap();

        assert_matches!(verifier.verify_at(&token, fixed_now()), Err(AuthError::InvalidToken(_)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let tokens = TokenService::new(SECRET);

        assert_matches!(
            tokens.verify_at("invalid.token.format", fixed_now()),
            Err(AuthError::InvalidToken(_))
        );
    }

    #[test]
    fn test_empty_secret_refuses_to_work() {
        let tokens = TokenService::new("");

        assert_eq!(tokens.issue("a@x.com"), Err(AuthError::MissingSecret));
        assert_eq!(tokens.verify("a.b.c"), Err(AuthError::MissingSecret));
    }
}
