//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `silvanus.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use silvanus_adapter_sysfs::SysfsConfig;
use silvanus_app::controller::ControllerConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Control loop timing.
    pub controller: ControllerSection,
    /// Hardware backend.
    pub board: BoardConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Control loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ControllerSection {
    pub tick_interval_ms: u64,
    /// Samples averaged per sensor.
    pub sensor_window: usize,
    pub sensor_timeout_ms: u64,
}

/// Which hardware backend drives the outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardKind {
    #[default]
    Virtual,
    Sysfs,
}

impl FromStr for BoardKind {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "virtual" => Ok(Self::Virtual),
            "sysfs" => Ok(Self::Sysfs),
            other => Err(ConfigError::Validation(format!(
                "unknown board kind {other:?}, expected \"virtual\" or \"sysfs\""
            ))),
        }
    }
}

/// Hardware backend configuration. Pin and path fields only apply to the
/// `sysfs` board.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub kind: BoardKind,
    pub light_gpio: u32,
    pub pump_gpio: u32,
    /// Relays that switch on a low level.
    pub active_low: bool,
    pub gpio_root: PathBuf,
    /// hwmon attribute in millidegrees Celsius.
    pub temperature_path: PathBuf,
    /// IIO raw ADC attribute.
    pub moisture_path: PathBuf,
}

impl Config {
    /// Load configuration from `silvanus.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("silvanus.toml")?;
        config.apply_env_overrides()?;
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

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("SILVANUS_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SILVANUS_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("SILVANUS_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SILVANUS_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("SILVANUS_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("SILVANUS_BOARD") {
            self.board.kind = val.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.controller.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick_interval_ms must be non-zero".to_string(),
            ));
        }
        if self.controller.sensor_window == 0 {
            return Err(ConfigError::Validation(
                "sensor_window must be at least 1".to_string(),
            ));
        }
        if self.board.kind == BoardKind::Sysfs && self.board.light_gpio == self.board.pump_gpio {
            return Err(ConfigError::Validation(
                "light_gpio and pump_gpio must differ".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// Control loop settings for the application layer.
    #[must_use]
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            tick_interval: Duration::from_millis(self.controller.tick_interval_ms),
            sensor_window: self.controller.sensor_window,
            sensor_timeout: Duration::from_millis(self.controller.sensor_timeout_ms),
        }
    }

    /// Pin and attribute layout for the sysfs board.
    #[must_use]
    pub fn sysfs(&self) -> SysfsConfig {
        SysfsConfig {
            gpio_root: self.board.gpio_root.clone(),
            light_gpio: self.board.light_gpio,
            pump_gpio: self.board.pump_gpio,
            active_low: self.board.active_low,
            temperature_path: self.board.temperature_path.clone(),
            moisture_path: self.board.moisture_path.clone(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:silvanus.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "silvanusd=info,silvanus=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for ControllerSection {
    fn default() -> Self {
        let defaults = ControllerConfig::default();
        Self {
            tick_interval_ms: u64::try_from(defaults.tick_interval.as_millis()).unwrap_or(1000),
            sensor_window: defaults.sensor_window,
            sensor_timeout_ms: u64::try_from(defaults.sensor_timeout.as_millis()).unwrap_or(500),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        let sysfs = SysfsConfig::default();
        Self {
            kind: BoardKind::default(),
            light_gpio: sysfs.light_gpio,
            pump_gpio: sysfs.pump_gpio,
            active_low: sysfs.active_low,
            gpio_root: sysfs.gpio_root,
            temperature_path: sysfs.temperature_path,
            moisture_path: sysfs.moisture_path,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 80);
        assert_eq!(config.database.url, "sqlite:silvanus.db?mode=rwc");
        assert_eq!(config.board.kind, BoardKind::Virtual);
        assert_eq!(config.board.light_gpio, 26);
        assert_eq!(config.board.pump_gpio, 20);
        assert_eq!(config.controller(), ControllerConfig::default());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 80);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [controller]
            tick_interval_ms = 250
            sensor_window = 3
            sensor_timeout_ms = 100

            [board]
            kind = 'sysfs'
            light_gpio = 17
            pump_gpio = 27
            active_low = true
            gpio_root = '/tmp/gpio'
            temperature_path = '/tmp/temp1_input'
            moisture_path = '/tmp/in_voltage0_raw'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(
            config.controller(),
            ControllerConfig {
                tick_interval: Duration::from_millis(250),
                sensor_window: 3,
                sensor_timeout: Duration::from_millis(100),
            }
        );
        assert_eq!(config.board.kind, BoardKind::Sysfs);
        let sysfs = config.sysfs();
        assert_eq!(sysfs.light_gpio, 17);
        assert_eq!(sysfs.pump_gpio, 27);
        assert!(sysfs.active_low);
        assert_eq!(sysfs.gpio_root, PathBuf::from("/tmp/gpio"));
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 80);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_tick_interval() {
        let mut config = Config::default();
        config.controller.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_sensor_window() {
        let mut config = Config::default();
        config.controller.sensor_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_shared_pin_on_sysfs_board() {
        let mut config = Config::default();
        config.board.kind = BoardKind::Sysfs;
        config.board.pump_gpio = config.board.light_gpio;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:80");
    }

    #[test]
    fn should_parse_board_kind() {
        assert_eq!("sysfs".parse::<BoardKind>().unwrap(), BoardKind::Sysfs);
        assert_eq!("virtual".parse::<BoardKind>().unwrap(), BoardKind::Virtual);
        assert!("pigpio".parse::<BoardKind>().is_err());
    }

    #[test]
    fn should_reject_unknown_board_kind_in_toml() {
        let result: Result<Config, _> = toml::from_str("[board]\nkind = 'arduino'");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
