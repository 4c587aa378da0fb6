use rocket::figment::{Figment, providers::{Env, Format, Toml}};
use rocket::http::SameSite;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub address: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

/// Cookie and lifetime settings for the session flow.
///
/// Every attribute the gate puts on the session cookie is enumerated here
/// rather than spread from ad-hoc maps at the call sites.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Session lifetime. A session is rotated once less than half of it remains.
    pub ttl_days: i64,
    pub cookie_path: String,
    /// Set to true behind TLS; the cookie is then never sent over plain HTTP.
    pub cookie_secure: bool,
    /// One of "strict", "lax" or "none".
    pub cookie_same_site: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub json_format: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/peta_riset".to_string(),
            max_connections: 16,
            min_connections: 4,
            acquire_timeout: 5,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            address: "127.0.0.1".to_string(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            allow_credentials: true,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "auth_session".to_string(),
            ttl_days: 30,
            cookie_path: "/".to_string(),
            cookie_secure: false,
            cookie_same_site: "lax".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl SessionConfig {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.ttl_days)
    }

    /// Remaining lifetime below which a validated session gets rotated.
    pub fn rotation_threshold(&self) -> chrono::Duration {
        self.ttl() / 2
    }

    pub fn same_site(&self) -> SameSite {
        match self.cookie_same_site.to_ascii_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => SameSite::None,
            _ => SameSite::Lax,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources in priority order:
    /// 1. Riset.toml (base configuration file)
    /// 2. Environment variables (prefixed with RISET_)
    /// 3. DATABASE_URL environment variable (for backwards compatibility)
    pub fn load() -> Result<Self, figment::Error> {
        let figment = Figment::new()
            // Start with defaults
            .merge(Toml::string(&toml::to_string(&Config::default()).unwrap()).nested())
            // Layer on Riset.toml if it exists
            .merge(Toml::file("Riset.toml").nested())
            // Layer on environment variables (e.g., RISET_DATABASE_URL)
            .merge(Env::prefixed("RISET_").split("_"))
            // Special case: DATABASE_URL for backwards compatibility
            .merge(Env::raw().only(&["DATABASE_URL"]).map(|_| "database.url".into()));

        figment.extract()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults_match_cookie_contract() {
        let session = SessionConfig::default();
        assert_eq!(session.cookie_name, "auth_session");
        assert_eq!(session.ttl_days, 30);
        assert_eq!(session.cookie_path, "/");
        assert!(!session.cookie_secure);
        assert_eq!(session.same_site(), SameSite::Lax);
    }

    #[test]
    fn rotation_threshold_is_half_the_ttl() {
        let session = SessionConfig::default();
        assert_eq!(session.rotation_threshold(), chrono::Duration::days(15));
    }

    #[test]
    fn same_site_parses_known_values() {
        let mut session = SessionConfig::default();
        session.cookie_same_site = "Strict".to_string();
        assert_eq!(session.same_site(), SameSite::Strict);
        session.cookie_same_site = "none".to_string();
        assert_eq!(session.same_site(), SameSite::None);
        session.cookie_same_site = "garbage".to_string();
        assert_eq!(session.same_site(), SameSite::Lax);
    }
}
