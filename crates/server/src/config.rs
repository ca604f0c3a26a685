use std::env;

/// Server settings, read from the environment with development defaults.
#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    /// Root directory for uploaded resumes.
    pub storage_path: String,
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    /// Browser origin allowed by CORS. Any origin when unset.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite:./data/jobboard.db?mode=rwc".to_string()),
            storage_path: lookup("STORAGE_PATH").unwrap_or_else(|| "./data/uploads".to_string()),
            jwt_secret: lookup("JWT_SECRET")
                .unwrap_or_else(|| "development-secret-change-in-production".to_string()),
            token_ttl_days: lookup("TOKEN_TTL_DAYS")
                .and_then(|d| d.parse().ok())
                .filter(|d| *d > 0)
                .unwrap_or(7),
            cors_origin: lookup("CORS_ORIGIN").filter(|o| !o.trim().is_empty()),
        }
    }
}
