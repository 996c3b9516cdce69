use figment::providers::{Env, Format, Yaml};
use figment::Figment;
use schemars::{schema_for, JsonSchema};
use serde::{Deserialize, Serialize};

use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use crate::error::Result;

/// Environment variable holding the path of the YAML configuration file.
pub const CONFIG_PATH_ENV: &str = "REQMETRICS_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "./config.yaml";
const ENV_PREFIX: &str = "REQMETRICS_";

/// A top-level enum for versioned configurations.
#[derive(Deserialize, Serialize, JsonSchema)]
#[serde(tag = "version")]
pub enum Config {
    #[serde(rename = "1.0.0")]
    ConfigV1(ConfigV1),
}

/// Main config for v1.0.0.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ConfigV1 {
    pub bind_address: String,
    pub logging: LoggingConfig,
    pub metrics: MetricsConfig,
    /// Bearer tokens accepted by the authentication step, one per client.
    #[serde(default)]
    pub clients: Vec<ClientConfig>,
}

/// A client allowed to authenticate with a static bearer token.
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct ClientConfig {
    /// Reported as the `client` label of every request it makes.
    pub name: String,
    pub token: String,
}

/// Load config from the YAML file named by `REQMETRICS_CONFIG` (or
/// `./config.yaml`), with `REQMETRICS_*` environment overrides on top.
pub fn load_config() -> Result<ConfigV1> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let figment = Figment::new().merge(Yaml::file(path)).merge(
        Env::prefixed(ENV_PREFIX)
            .ignore(&["config"])
            .split("__"),
    );
    extract_config(figment)
}

/// Extract a versioned configuration from any figment.
pub fn extract_config(figment: Figment) -> Result<ConfigV1> {
    match figment.extract::<Config>()? {
        Config::ConfigV1(c) => Ok(c),
    }
}

/// Print the JSON schema for the configuration to stdout.
pub fn print_schema() -> Result<()> {
    let schema = schema_for!(Config);
    let rendered = serde_json::to_string_pretty(&schema)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    println!("{}", rendered);
    Ok(())
}
