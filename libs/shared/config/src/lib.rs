use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_STORE_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub access_token_secret: String,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub store_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub catalog_seed_path: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            port: parse_or_default("PORT", DEFAULT_PORT),
            access_token_secret: env::var("ACCESS_TOKEN_SECRET")
                .unwrap_or_else(|_| {
                    warn!("ACCESS_TOKEN_SECRET not set, tokens cannot be issued or verified");
                    String::new()
                }),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, falling back to the in-memory store");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| String::new()),
            store_timeout_secs: parse_or_default("STORE_TIMEOUT_SECS", DEFAULT_STORE_TIMEOUT_SECS),
            request_timeout_secs: parse_or_default("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            catalog_seed_path: env::var("CATALOG_SEED_PATH").ok().filter(|p| !p.is_empty()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.access_token_secret.is_empty() && self.uses_supabase()
    }

    /// True when bookings, users and services live in Supabase rather than in process memory.
    pub fn uses_supabase(&self) -> bool {
        !self.supabase_url.is_empty()
    }
}

fn parse_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
