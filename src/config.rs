//! Application configuration loaded from environment variables.
//!
//! Values are read once at startup. A `.env` file is honored for local
//! development.

use crate::models::map::{self, MapSettings};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default for `VIEW_IDLE_TIMEOUT_SECS`.
const DEFAULT_VIEW_IDLE_SECS: u64 = 30 * 60;

/// Where footprints are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Hosted Postgres behind the Supabase REST API.
    Supabase,
    /// Process-local store, lost on restart. For local development and tests.
    Memory,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "supabase" => Ok(BackendKind::Supabase),
            "memory" => Ok(BackendKind::Memory),
            _ => Err(ConfigError::Invalid("FOOTPRINTS_BACKEND", s.to_string())),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL (CORS origin)
    pub frontend_url: String,
    /// Where unauthenticated page requests are redirected
    pub login_path: String,
    pub backend: BackendKind,
    /// Supabase project URL, e.g. `https://xyz.supabase.co`
    pub supabase_url: Option<String>,
    /// Supabase anon (public) API key
    pub supabase_anon_key: Option<String>,
    /// Secret used to verify access tokens (raw bytes)
    pub jwt_secret: Vec<u8>,
    /// Initial map view
    pub map: MapSettings,
    /// How long a signed-in user's view is kept without requests
    pub view_idle_timeout: Duration,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:3000".to_string(),
            login_path: "/login".to_string(),
            backend: BackendKind::Memory,
            supabase_url: None,
            supabase_anon_key: None,
            jwt_secret: b"test_jwt_secret_32_bytes_minimum!".to_vec(),
            map: MapSettings::default(),
            view_idle_timeout: Duration::from_secs(DEFAULT_VIEW_IDLE_SECS),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let backend = match env::var("FOOTPRINTS_BACKEND") {
            Ok(v) => v.parse()?,
            Err(_) => BackendKind::Supabase,
        };

        let supabase_url = env::var("SUPABASE_URL")
            .ok()
            .map(|v| v.trim().trim_end_matches('/').to_string());
        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .map(|v| v.trim().to_string());

        if backend == BackendKind::Supabase {
            if supabase_url.is_none() {
                return Err(ConfigError::Missing("SUPABASE_URL"));
            }
            if supabase_anon_key.is_none() {
                return Err(ConfigError::Missing("SUPABASE_ANON_KEY"));
            }
        }

        let map = MapSettings {
            center: [
                parse_var("MAP_CENTER_LAT", map::DEFAULT_CENTER[0])?,
                parse_var("MAP_CENTER_LNG", map::DEFAULT_CENTER[1])?,
            ],
            zoom: parse_var("MAP_ZOOM", map::DEFAULT_ZOOM)?,
            tile_url: env::var("MAP_TILE_URL")
                .unwrap_or_else(|_| map::DEFAULT_TILE_URL.to_string()),
            attribution: env::var("MAP_ATTRIBUTION")
                .unwrap_or_else(|_| map::DEFAULT_ATTRIBUTION.to_string()),
        };

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            login_path: env::var("LOGIN_PATH").unwrap_or_else(|_| "/login".to_string()),
            backend,
            supabase_url,
            supabase_anon_key,
            jwt_secret: env::var("SUPABASE_JWT_SECRET")
                .map_err(|_| ConfigError::Missing("SUPABASE_JWT_SECRET"))?
                .trim()
                .as_bytes()
                .to_vec(),
            map,
            view_idle_timeout: Duration::from_secs(parse_var(
                "VIEW_IDLE_TIMEOUT_SECS",
                DEFAULT_VIEW_IDLE_SECS,
            )?),
        })
    }
}

fn parse_var<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // All env-mutating assertions live in one test so they cannot race.
    #[test]
    fn test_config_from_env() {
        env::set_var("FOOTPRINTS_BACKEND", "memory");
        env::set_var("SUPABASE_JWT_SECRET", "test_jwt_secret_32_bytes_minimum!");
        env::set_var("MAP_ZOOM", "15");
        env::remove_var("PORT");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.port, 8080);
        assert_eq!(config.map.zoom, 15);
        assert_eq!(config.map.center, map::DEFAULT_CENTER);
        assert_eq!(config.view_idle_timeout, Duration::from_secs(1800));

        env::set_var("MAP_ZOOM", "very close");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Invalid("MAP_ZOOM", _))
        ));

        env::remove_var("MAP_ZOOM");
        env::set_var("FOOTPRINTS_BACKEND", "supabase");
        env::remove_var("SUPABASE_URL");
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::Missing("SUPABASE_URL"))
        ));

        env::remove_var("FOOTPRINTS_BACKEND");
    }

    #[test]
    fn test_backend_kind_parse() {
        assert_eq!("Memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!(
            " supabase ".parse::<BackendKind>().unwrap(),
            BackendKind::Supabase
        );
        assert!("firestore".parse::<BackendKind>().is_err());
    }
}
