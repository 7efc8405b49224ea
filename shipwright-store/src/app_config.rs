use serde::Deserialize;
use shipwright_order::ShippingConfig;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub fulfillment: FulfillmentApiConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    pub source: SourceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FulfillmentApiConfig {
    pub base_url: String,
    pub access_token: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 { 30 }

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_max_execution")]
    pub max_execution_secs: u64,
}

fn default_interval() -> u64 { 1 }
fn default_max_execution() -> u64 { 5 * 60 }

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            max_execution_secs: default_max_execution(),
        }
    }
}

impl PollingConfig {
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.interval_secs == 0 {
            return Err(config::ConfigError::Message(
                "polling.interval_secs must be at least 1".to_string(),
            ));
        }
        if self.max_execution_secs == 0 {
            return Err(config::ConfigError::Message(
                "polling.max_execution_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_shipping_config(&self) -> ShippingConfig {
        ShippingConfig {
            poll_interval: Duration::from_secs(self.interval_secs),
            max_duration: Duration::from_secs(self.max_execution_secs),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceConfig {
    pub data_dir: PathBuf,
    pub order_id: u64,
    pub buyer_id: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_from("config", &run_mode)
    }

    /// Layered load: `{dir}/default`, `{dir}/{run_mode}` and `{dir}/local`, then
    /// `SHIPWRIGHT__*` environment variables (e.g. `SHIPWRIGHT__POLLING__INTERVAL_SECS=2`)
    pub fn load_from(dir: &str, run_mode: &str) -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name(&format!("{}/default", dir)))
            .add_source(config::File::with_name(&format!("{}/{}", dir, run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name(&format!("{}/local", dir)).required(false))
            .add_source(config::Environment::with_prefix("SHIPWRIGHT").separator("__"))
            .build()?;

        let loaded: Self = s.try_deserialize()?;
        loaded.polling.validate()?;
        Ok(loaded)
    }
}
