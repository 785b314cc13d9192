use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub routing: RoutingConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RoutingConfig {
    /// OSRM endpoint, e.g. `https://router.project-osrm.org`.
    pub osrm_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Deployment-tunable pricing knobs. The tariff table, zone prefixes and
/// special-date calendar are compiled-in reference data and not configured
/// here.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_surge")]
    pub surge_multiplier: f64,
    #[serde(default = "default_child_seat_fee")]
    pub child_seat_fee: f64,
    #[serde(default = "default_min_lead_hours")]
    pub min_lead_hours: i64,
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_surge() -> f64 {
    1.0
}

fn default_child_seat_fee() -> f64 {
    10.0
}

fn default_min_lead_hours() -> i64 {
    3
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            surge_multiplier: default_surge(),
            child_seat_fee: default_child_seat_fee(),
            min_lead_hours: default_min_lead_hours(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Layer on the environment-specific file, if present
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Finally environment variables, e.g. RYDE__SERVER__PORT=8080
            .add_source(config::Environment::with_prefix("RYDE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
