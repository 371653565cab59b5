#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub tmdb_api_key: Option<String>,
    pub tmdb_locale: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub tmdb_timeout_secs: u64,
    pub tmdb_max_retries: u32,
    pub tmdb_retry_base_ms: u64,
    pub sync_max_pages: u32,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field(
                "tmdb_api_key",
                &self.tmdb_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("tmdb_locale", &self.tmdb_locale)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("tmdb_timeout_secs", &self.tmdb_timeout_secs)
            .field("tmdb_max_retries", &self.tmdb_max_retries)
            .field("tmdb_retry_base_ms", &self.tmdb_retry_base_ms)
            .field("sync_max_pages", &self.sync_max_pages)
            .finish()
    }
}
