//! Server configuration: defaults, then an optional TOML file, then the
//! environment (`DATABASE_URL` and `FUNDLENS_*`).

use std::env;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::rate_limiter::RateLimit;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
    #[error("{0} is not set")]
    Missing(&'static str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub database_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub cors_allow_credentials: bool,
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub rate_limit_enabled: bool,
    pub rate_limit_default: RateLimit,
    pub rate_limit_search: RateLimit,
    pub rate_limit_stats: RateLimit,
    pub app_name: String,
    pub app_version: String,
    pub app_description: String,
}

/// Every key optional; absent keys keep the current value.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database_url: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    cors_origins: Option<Vec<String>>,
    cors_allow_credentials: Option<bool>,
    default_page_size: Option<i64>,
    max_page_size: Option<i64>,
    rate_limit_enabled: Option<bool>,
    rate_limit_default: Option<String>,
    rate_limit_search: Option<String>,
    rate_limit_stats: Option<String>,
    app_name: Option<String>,
    app_description: Option<String>,
}

/// Defaults overlaid by file and environment values. The database
/// path has no default and must be supplied.
struct PartialConfig {
    database_path: Option<PathBuf>,
    config: Config,
}

impl Default for PartialConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            config: Config {
                database_path: PathBuf::new(),
                host: "0.0.0.0".to_string(),
                port: 8000,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:8080".to_string(),
                ],
                cors_allow_credentials: true,
                default_page_size: 50,
                max_page_size: 1000,
                rate_limit_enabled: true,
                rate_limit_default: RateLimit {
                    max_requests: 100,
                    window: std::time::Duration::from_secs(60),
                },
                rate_limit_search: RateLimit {
                    max_requests: 30,
                    window: std::time::Duration::from_secs(60),
                },
                rate_limit_stats: RateLimit {
                    max_requests: 60,
                    window: std::time::Duration::from_secs(60),
                },
                app_name: "FundLens API".to_string(),
                app_version: env!("CARGO_PKG_VERSION").to_string(),
                app_description: "Campaign finance data API for FundLens".to_string(),
            },
        }
    }
}

/// Strip an optional `sqlite://` scheme from a database URL.
pub fn database_path_from_url(url: &str) -> PathBuf {
    let url = url.trim();
    PathBuf::from(url.strip_prefix("sqlite://").unwrap_or(url))
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| {
        warn!("Invalid {key} value: {e}");
        ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => {
            warn!("Invalid {key} value: {other}");
            Err(ConfigError::Invalid {
                key: key.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            })
        }
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load configuration from the process environment and an optional file.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(file, |key| env::var(key).ok())
    }

    /// Like [`Config::load`] but reading variables through `lookup`.
    pub fn load_with<F>(file: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut partial = PartialConfig::default();
        if let Some(path) = file {
            let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            info!("Loading configuration from {}", path.display());
            partial.apply_file(toml::from_str(&text)?)?;
        }
        partial.apply_env(lookup)?;

        let PartialConfig {
            database_path,
            mut config,
        } = partial;
        config.database_path = database_path.ok_or(ConfigError::Missing("DATABASE_URL"))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_page_size < 1 {
            return Err(ConfigError::Invalid {
                key: "max_page_size".to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        if !(1..=self.max_page_size).contains(&self.default_page_size) {
            return Err(ConfigError::Invalid {
                key: "default_page_size".to_string(),
                reason: format!("must be between 1 and {}", self.max_page_size),
            });
        }
        Ok(())
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl PartialConfig {
    fn apply_file(&mut self, file: ConfigFile) -> Result<(), ConfigError> {
        let c = &mut self.config;
        if let Some(url) = file.database_url {
            self.database_path = Some(database_path_from_url(&url));
        }
        if let Some(v) = file.host {
            c.host = v;
        }
        if let Some(v) = file.port {
            c.port = v;
        }
        if let Some(v) = file.cors_origins {
            c.cors_origins = v;
        }
        if let Some(v) = file.cors_allow_credentials {
            c.cors_allow_credentials = v;
        }
        if let Some(v) = file.default_page_size {
            c.default_page_size = v;
        }
        if let Some(v) = file.max_page_size {
            c.max_page_size = v;
        }
        if let Some(v) = file.rate_limit_enabled {
            c.rate_limit_enabled = v;
        }
        if let Some(v) = file.rate_limit_default {
            c.rate_limit_default = parse_value("rate_limit_default", &v)?;
        }
        if let Some(v) = file.rate_limit_search {
            c.rate_limit_search = parse_value("rate_limit_search", &v)?;
        }
        if let Some(v) = file.rate_limit_stats {
            c.rate_limit_stats = parse_value("rate_limit_stats", &v)?;
        }
        if let Some(v) = file.app_name {
            c.app_name = v;
        }
        if let Some(v) = file.app_description {
            c.app_description = v;
        }
        Ok(())
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            let value = lookup(key);
            match value {
                Some(_) => info!("{key} set from environment"),
                None => debug!("{key} not set, keeping current value"),
            }
            value
        };

        if let Some(url) = var("DATABASE_URL") {
            self.database_path = Some(database_path_from_url(&url));
        }
        let c = &mut self.config;
        if let Some(v) = var("FUNDLENS_HOST") {
            c.host = v.trim().to_string();
        }
        if let Some(v) = var("FUNDLENS_PORT") {
            c.port = parse_value("FUNDLENS_PORT", &v)?;
        }
        if let Some(v) = var("FUNDLENS_CORS_ORIGINS") {
            c.cors_origins = parse_list(&v);
        }
        if let Some(v) = var("FUNDLENS_CORS_ALLOW_CREDENTIALS") {
            c.cors_allow_credentials = parse_bool("FUNDLENS_CORS_ALLOW_CREDENTIALS", &v)?;
        }
        if let Some(v) = var("FUNDLENS_DEFAULT_PAGE_SIZE") {
            c.default_page_size = parse_value("FUNDLENS_DEFAULT_PAGE_SIZE", &v)?;
        }
        if let Some(v) = var("FUNDLENS_MAX_PAGE_SIZE") {
            c.max_page_size = parse_value("FUNDLENS_MAX_PAGE_SIZE", &v)?;
        }
        if let Some(v) = var("FUNDLENS_RATE_LIMIT_ENABLED") {
            c.rate_limit_enabled = parse_bool("FUNDLENS_RATE_LIMIT_ENABLED", &v)?;
        }
        if let Some(v) = var("FUNDLENS_RATE_LIMIT_DEFAULT") {
            c.rate_limit_default = parse_value("FUNDLENS_RATE_LIMIT_DEFAULT", &v)?;
        }
        if let Some(v) = var("FUNDLENS_RATE_LIMIT_SEARCH") {
            c.rate_limit_search = parse_value("FUNDLENS_RATE_LIMIT_SEARCH", &v)?;
        }
        if let Some(v) = var("FUNDLENS_RATE_LIMIT_STATS") {
            c.rate_limit_stats = parse_value("FUNDLENS_RATE_LIMIT_STATS", &v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;

    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn temp_toml(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fundlens-{}-{}.toml", name, std::process::id()));
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn defaults_with_database_url() {
        let config = Config::load_with(None, env_of(&[("DATABASE_URL", "sqlite://data/fund.db")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("data/fund.db"));
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.rate_limit_search.max_requests, 30);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.app_name, "FundLens API");
        assert_eq!(config.bind_address(), "0.0.0.0:8000");
    }

    #[test]
    fn missing_database_url_is_an_error() {
        let err = Config::load_with(None, env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
    }

    #[test]
    fn environment_overrides() {
        let config = Config::load_with(
            None,
            env_of(&[
                ("DATABASE_URL", "/tmp/x.db"),
                ("FUNDLENS_PORT", "9000"),
                ("FUNDLENS_CORS_ORIGINS", "https://a.example, https://b.example,"),
                ("FUNDLENS_RATE_LIMIT_ENABLED", "false"),
                ("FUNDLENS_RATE_LIMIT_STATS", "10/second"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert!(!config.rate_limit_enabled);
        assert_eq!(config.rate_limit_stats.to_string(), "10/second");
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Config::load_with(
            None,
            env_of(&[("DATABASE_URL", "x.db"), ("FUNDLENS_PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "FUNDLENS_PORT"));

        let err = Config::load_with(
            None,
            env_of(&[("DATABASE_URL", "x.db"), ("FUNDLENS_DEFAULT_PAGE_SIZE", "5000")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "default_page_size"));
    }

    #[test]
    fn file_then_environment() {
        let path = temp_toml(
            "layered",
            "database_url = \"file.db\"\nport = 8123\nrate_limit_search = \"5/minute\"\ncors_origins = [\"https://app.example\"]\n",
        );
        let config = Config::load_with(Some(&path), env_of(&[("FUNDLENS_PORT", "9999")])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("file.db"));
        assert_eq!(config.port, 9999);
        assert_eq!(config.rate_limit_search.max_requests, 5);
        assert_eq!(config.cors_origins, vec!["https://app.example"]);
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let path = temp_toml("unknown", "databse_url = \"typo.db\"\n");
        let err = Config::load_with(Some(&path), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Config::load_with(Some(Path::new("/nonexistent/fundlens.toml")), env_of(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
