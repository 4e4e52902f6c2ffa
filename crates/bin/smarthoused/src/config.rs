//! Daemon settings.
//!
//! Read from `./smarthouse.toml` when it exists, otherwise built from
//! defaults. `SMARTHOUSE_*` variables and `RUST_LOG` are applied last and win
//! over the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `SMARTHOUSE_HOST`, `SMARTHOUSE_PORT` | `[server]` |
//! | `SMARTHOUSE_BIND` (`host:port`) | `[server]` |
//! | `SMARTHOUSE_DATABASE_URL` | `[database] url` |
//! | `SMARTHOUSE_LOG`, then `RUST_LOG` | `[logging] filter` |
//! | `SMARTHOUSE_HOUSE_SEED` | `[house] seed` |

use std::path::PathBuf;

use serde::Deserialize;

/// Everything `smarthoused` needs before it can serve.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    /// Where the house comes from on first start.
    pub house: HouseConfig,
}

/// `[server]`: where the JSON API listens.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface address, `0.0.0.0` by default.
    pub host: String,
    /// Must not be 0.
    pub port: u16,
}

/// `[database]`: the `SQLite` file holding the house and its readings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// sqlx URL; `sqlite::memory:` keeps everything in memory.
    pub url: String,
}

/// `[logging]`: `tracing` output.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `smarthoused=debug`.
    pub filter: String,
}

/// How to obtain a house when the database holds none.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HouseConfig {
    /// House description file used to seed an empty database.
    pub seed: Option<PathBuf>,
    /// Name given to an empty house when no seed file is configured.
    pub name: String,
}

impl Config {
    /// Read `./smarthouse.toml`, apply the environment and validate.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed, when the port is 0 or
    /// when the house name is empty.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("smarthouse.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SMARTHOUSE_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("SMARTHOUSE_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("SMARTHOUSE_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = var("SMARTHOUSE_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = var("SMARTHOUSE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("SMARTHOUSE_HOUSE_SEED") {
            self.house.seed = Some(PathBuf::from(val));
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.house.name.is_empty() {
            return Err(ConfigError::Validation(
                "house name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// `host:port` handed to the TCP listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// URL handed to the storage adapter.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:smarthouse.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthoused=info,smarthouse_app=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HouseConfig {
    fn default() -> Self {
        Self {
            seed: None,
            name: "smarthouse".to_string(),
        }
    }
}

/// Why the daemon refused its settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("smarthouse.toml is not valid TOML")]
    Parse(#[from] toml::de::Error),
    #[error("cannot read smarthouse.toml")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn with_env(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).cloned());
        config
    }

    #[test]
    fn should_serve_port_8000_from_a_local_database_without_a_file() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.database_url(), "sqlite:smarthouse.db?mode=rwc");
        assert!(config.house.seed.is_none());
        assert_eq!(config.house.name, "smarthouse");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_treat_an_empty_file_as_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.house.name, "smarthouse");
    }

    #[test]
    fn should_read_every_section() {
        let config: Config = toml::from_str(
            "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:cabin.db'

            [logging]
            filter = 'smarthoused=debug'

            [house]
            seed = 'cabin.toml'
            name = 'Cabin'
            ",
        )
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.database_url(), "sqlite:cabin.db");
        assert_eq!(config.logging.filter, "smarthoused=debug");
        assert_eq!(config.house.seed, Some(PathBuf::from("cabin.toml")));
        assert_eq!(config.house.name, "Cabin");
    }

    #[test]
    fn should_keep_other_sections_when_only_house_is_given() {
        let config: Config = toml::from_str("[house]\nname = 'Cabin'").unwrap();
        assert_eq!(config.house.name, "Cabin");
        assert!(config.house.seed.is_none());
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
        assert_eq!(config.database_url(), "sqlite:smarthouse.db?mode=rwc");
    }

    #[test]
    fn should_fall_back_to_defaults_when_smarthouse_toml_is_absent() {
        let config = Config::from_file("no-such-smarthouse.toml").unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn should_refuse_a_house_section_that_is_not_a_table() {
        let result: Result<Config, _> = toml::from_str("house = 'Cabin'");
        assert!(result.is_err());
    }

    #[test]
    fn should_refuse_port_zero() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_refuse_an_unnamed_house() {
        let mut config = Config::default();
        config.house.name.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn should_split_bind_variable_into_host_and_port() {
        let config = with_env(&[("SMARTHOUSE_BIND", "127.0.0.1:9999")]);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9999);
    }

    #[test]
    fn should_keep_port_when_variable_is_not_a_number() {
        let config = with_env(&[("SMARTHOUSE_PORT", "http")]);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn should_let_rust_log_win_over_smarthouse_log() {
        let config = with_env(&[("SMARTHOUSE_LOG", "warn"), ("RUST_LOG", "trace")]);
        assert_eq!(config.logging.filter, "trace");
    }

    #[test]
    fn should_point_at_database_and_seed_from_env() {
        let config = with_env(&[
            ("SMARTHOUSE_DATABASE_URL", "sqlite::memory:"),
            ("SMARTHOUSE_HOUSE_SEED", "/etc/smarthouse/house.toml"),
        ]);
        assert_eq!(config.database_url(), "sqlite::memory:");
        assert_eq!(
            config.house.seed,
            Some(PathBuf::from("/etc/smarthouse/house.toml"))
        );
    }
}
