//! Configuration module for loading and parsing TOML configuration files.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an optional TOML configuration file.
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

/// Longest accepted refresh interval (one day).
pub const MAX_INTERVAL_SECS: u64 = 86_400;

/// Longest accepted backfill span (one year).
pub const MAX_BACKFILL_SPAN_SECS: u64 = 365 * 86_400;

/// Configuration error types.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse TOML configuration.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// Invalid configuration value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Price simulation configuration.
    pub simulation: SimulationConfig,
    /// Train route catalog.
    pub routes: Vec<InstrumentDef>,
    /// Tech product catalog.
    pub products: Vec<InstrumentDef>,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Directory holding the static frontend.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            static_dir: PathBuf::from("public"),
        }
    }
}

/// Price simulation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Whether the periodic refresh runs.
    pub enabled: bool,
    /// Refresh interval in seconds; ticks align to multiples of it.
    pub interval_secs: u64,
    /// Maximum samples kept per instrument.
    pub history_cap: usize,
    /// Samples backfilled per instrument at startup.
    pub seed_points: usize,
    /// Spacing of backfilled samples in seconds.
    pub backfill_step_secs: u64,
    /// Samples returned per product by the product batch query.
    pub batch_history: usize,
}

impl SimulationConfig {
    /// Refresh interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 60,
            history_cap: 200,
            seed_points: 50,
            backfill_step_secs: 60,
            batch_history: 60,
        }
    }
}

/// Instrument definition.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InstrumentDef {
    /// Route `FROM-TO` or product display name.
    pub key: String,
    /// Base price.
    pub base: Decimal,
    /// Noise amplitude.
    pub variance: Decimal,
    /// Reference peak fare.
    #[serde(default)]
    pub peak: Option<Decimal>,
}

impl InstrumentDef {
    fn new(key: &str, base: Decimal, variance: Decimal) -> Self {
        Self {
            key: key.to_string(),
            base,
            variance,
            peak: None,
        }
    }

    fn route(key: &str, base: Decimal, variance: Decimal, peak: Decimal) -> Self {
        Self {
            peak: Some(peak),
            ..Self::new(key, base, variance)
        }
    }
}

/// Default train routes (EUR).
#[must_use]
pub fn default_routes() -> Vec<InstrumentDef> {
    vec![
        InstrumentDef::route("PARIS-LYON", dec!(45), dec!(80), dec!(120)),
        InstrumentDef::route("PARIS-MARSEILLE", dec!(55), dec!(100), dec!(160)),
        InstrumentDef::route("PARIS-BORDEAUX", dec!(40), dec!(70), dec!(130)),
        InstrumentDef::route("PARIS-NANTES", dec!(35), dec!(60), dec!(110)),
        InstrumentDef::route("PARIS-LILLE", dec!(25), dec!(50), dec!(90)),
        InstrumentDef::route("PARIS-STRASBOURG", dec!(50), dec!(85), dec!(140)),
        InstrumentDef::route("PARIS-TOULOUSE", dec!(60), dec!(110), dec!(170)),
        InstrumentDef::route("PARIS-NICE", dec!(70), dec!(130), dec!(200)),
        InstrumentDef::route("LYON-MARSEILLE", dec!(30), dec!(55), dec!(85)),
        InstrumentDef::route("BORDEAUX-TOULOUSE", dec!(20), dec!(35), dec!(60)),
        InstrumentDef::route("MARSEILLE-NICE", dec!(20), dec!(35), dec!(55)),
    ]
}

/// Default tech products (EUR).
#[must_use]
pub fn default_products() -> Vec<InstrumentDef> {
    vec![
        InstrumentDef::new("RTX 4090", dec!(1899), dec!(150)),
        InstrumentDef::new("RTX 4080", dec!(1099), dec!(100)),
        InstrumentDef::new("RTX 4070 Ti", dec!(799), dec!(80)),
        InstrumentDef::new("RTX 4070", dec!(599), dec!(60)),
        InstrumentDef::new("RX 7900 XTX", dec!(999), dec!(90)),
        InstrumentDef::new("RX 7900 XT", dec!(799), dec!(75)),
        InstrumentDef::new("DDR5 32GB 6000MHz", dec!(149), dec!(30)),
        InstrumentDef::new("DDR5 16GB 6000MHz", dec!(89), dec!(20)),
        InstrumentDef::new("DDR4 32GB 3200MHz", dec!(69), dec!(15)),
        InstrumentDef::new("DDR4 16GB 3200MHz", dec!(39), dec!(10)),
    ]
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file.
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Arguments
    /// * `content` - TOML content as string.
    ///
    /// # Errors
    /// Returns error if content cannot be parsed.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the configuration from the process environment.
    ///
    /// Reads the file named by `CONFIG_PATH` if set, then applies `HOST` and
    /// `PORT` overrides.
    ///
    /// # Errors
    /// Returns error if the file cannot be loaded or an override is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `HOST` and `PORT` overrides obtained from `lookup`.
    ///
    /// # Errors
    /// Returns error if `PORT` is not a valid port number.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(format!("PORT must be a valid number: {port}")))?;
        }
        Ok(())
    }

    /// Validates the configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.interval_secs == 0 || sim.interval_secs > MAX_INTERVAL_SECS {
            return Err(ConfigError::InvalidValue(format!(
                "simulation interval_secs must be between 1 and {MAX_INTERVAL_SECS}"
            )));
        }
        if sim.history_cap == 0 {
            return Err(ConfigError::InvalidValue(
                "simulation history_cap must be positive".to_string(),
            ));
        }
        if sim.seed_points == 0 || sim.seed_points > sim.history_cap {
            return Err(ConfigError::InvalidValue(format!(
                "simulation seed_points must be between 1 and {}",
                sim.history_cap
            )));
        }
        if sim.backfill_step_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "simulation backfill_step_secs must be positive".to_string(),
            ));
        }
        let span = (sim.seed_points as u64 - 1).checked_mul(sim.backfill_step_secs);
        if !span.is_some_and(|span| span <= MAX_BACKFILL_SPAN_SECS) {
            return Err(ConfigError::InvalidValue(format!(
                "simulation backfill span must be at most {MAX_BACKFILL_SPAN_SECS}s"
            )));
        }
        if sim.batch_history == 0 {
            return Err(ConfigError::InvalidValue(
                "simulation batch_history must be positive".to_string(),
            ));
        }

        Self::validate_catalog("routes", &self.routes)?;
        Self::validate_catalog("products", &self.products)?;

        if let Some(route) = self.routes.iter().find(|r| !r.key.contains('-')) {
            return Err(ConfigError::InvalidValue(format!(
                "route {} must have the form FROM-TO",
                route.key
            )));
        }
        if let Some(route) = self.routes.iter().find(|r| r.key != r.key.to_uppercase()) {
            return Err(ConfigError::InvalidValue(format!(
                "route {} must be uppercase",
                route.key
            )));
        }

        Ok(())
    }

    fn validate_catalog(name: &str, defs: &[InstrumentDef]) -> Result<(), ConfigError> {
        if defs.is_empty() {
            return Err(ConfigError::InvalidValue(format!(
                "at least one entry must be configured in {name}"
            )));
        }

        let mut seen = HashSet::new();
        for def in defs {
            if def.key.trim().is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "{name} key cannot be empty"
                )));
            }
            if !seen.insert(def.key.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "duplicate {name} key: {}",
                    def.key
                )));
            }
            if def.base <= Decimal::ZERO {
                return Err(ConfigError::InvalidValue(format!(
                    "{} base must be positive",
                    def.key
                )));
            }
            if def.variance < Decimal::ZERO {
                return Err(ConfigError::InvalidValue(format!(
                    "{} variance cannot be negative",
                    def.key
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            simulation: SimulationConfig::default(),
            routes: default_routes(),
            products: default_products(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[server]
host = "127.0.0.1"
port = 8081
static_dir = "frontend/dist"

[simulation]
enabled = true
interval_secs = 30
history_cap = 100
seed_points = 20

[[routes]]
key = "PARIS-LA-ROCHELLE"
base = 48
variance = 70.5
peak = 150

[[products]]
key = "RTX 5090"
base = 2299.99
variance = 200
"#;

        let config = Config::parse(toml_content).expect("should parse");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.static_dir, PathBuf::from("frontend/dist"));
        assert!(config.simulation.enabled);
        assert_eq!(config.simulation.interval(), Duration::from_secs(30));
        assert_eq!(config.simulation.history_cap, 100);
        assert_eq!(config.simulation.seed_points, 20);
        assert_eq!(config.simulation.batch_history, 60);
        assert_eq!(config.routes.len(), 1);
        assert_eq!(config.routes[0].variance, dec!(70.5));
        assert_eq!(config.routes[0].peak, Some(dec!(150)));
        assert_eq!(config.products[0].key, "RTX 5090");
        assert_eq!(config.products[0].base, dec!(2299.99));
        assert_eq!(config.products[0].peak, None);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::parse("").expect("should parse");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.simulation.interval_secs, 60);
        assert_eq!(config.simulation.history_cap, 200);
        assert_eq!(config.simulation.seed_points, 50);
        assert_eq!(config.routes.len(), 11);
        assert_eq!(config.products.len(), 10);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validation_empty_routes() {
        let config = Config {
            routes: vec![],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_duplicate_product() {
        let mut config = Config::default();
        config.products.push(config.products[0].clone());
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(msg)) if msg.contains("duplicate")
        ));
    }

    #[test]
    fn test_validation_route_without_hyphen() {
        let mut config = Config::default();
        config.routes[0].key = "PARIS".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_lowercase_route() {
        let mut config = Config::default();
        config.routes[0].key = "paris-lyon".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_non_positive_base() {
        let mut config = Config::default();
        config.products[0].base = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_negative_variance() {
        let mut config = Config::default();
        config.products[0].variance = dec!(-1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_variance_is_valid() {
        let mut config = Config::default();
        config.products[0].variance = Decimal::ZERO;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_seed_points_above_cap() {
        let mut config = Config::default();
        config.simulation.seed_points = 201;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_backfill_step_out_of_range() {
        let config = Config::parse("[simulation]\nbackfill_step_secs = 10000000000000\n");
        assert!(matches!(
            config,
            Err(ConfigError::InvalidValue(msg)) if msg.contains("backfill")
        ));
    }

    #[test]
    fn test_validation_backfill_step_zero() {
        let mut config = Config::default();
        config.simulation.backfill_step_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_backfill_span_at_limit() {
        let mut config = Config::default();
        config.simulation.seed_points = 2;
        config.simulation.backfill_step_secs = MAX_BACKFILL_SPAN_SECS;
        assert!(config.validate().is_ok());

        config.simulation.backfill_step_secs = MAX_BACKFILL_SPAN_SECS + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_interval_out_of_range() {
        let mut config = Config::default();
        config.simulation.interval_secs = 0;
        assert!(config.validate().is_err());

        config.simulation.interval_secs = MAX_INTERVAL_SECS + 1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(msg)) if msg.contains("interval_secs")
        ));
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(|name| match name {
                "HOST" => Some("127.0.0.1".to_string()),
                "PORT" => Some("4000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_apply_overrides_invalid_port() {
        let mut config = Config::default();
        let result = config.apply_overrides(|name| (name == "PORT").then(|| "abc".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
        assert_eq!(config.server.port, 3000);
    }
}
