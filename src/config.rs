use serde::Deserialize;
use std::{path::Path, time::Duration};

use crate::constants::{
    BASE_URL, PING_INTERVAL_SECS, PROXIES_FILE_PATH, REQUEST_TIMEOUT_SECS, RESTART_DELAY_SECS,
    REWARDS_INTERVAL_SECS, STARTUP_DELAY_SECS, TOKENS_FILE_PATH,
};

const CONFIG_FILE_PATH: &str = "data/config.toml";

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct Config {
    pub base_url: String,
    pub tokens_file: String,
    pub proxies_file: String,
    pub ping_interval_secs: u64,
    pub rewards_interval_secs: u64,
    pub restart_delay_secs: u64,
    pub request_timeout_secs: u64,
    pub startup_delay_secs: u64,
    pub referral_code: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            tokens_file: TOKENS_FILE_PATH.to_string(),
            proxies_file: PROXIES_FILE_PATH.to_string(),
            ping_interval_secs: PING_INTERVAL_SECS,
            rewards_interval_secs: REWARDS_INTERVAL_SECS,
            restart_delay_secs: RESTART_DELAY_SECS,
            request_timeout_secs: REQUEST_TIMEOUT_SECS,
            startup_delay_secs: STARTUP_DELAY_SECS,
            referral_code: None,
        }
    }
}

impl Config {
    pub async fn read_from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let cfg_str = tokio::fs::read_to_string(path).await?;
        Self::parse(&cfg_str)
    }

    pub fn parse(cfg_str: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(cfg_str)?;

        if config.ping_interval_secs == 0 || config.rewards_interval_secs == 0 {
            eyre::bail!("Task intervals must be greater than zero");
        }

        Ok(config)
    }

    /// Reads `data/config.toml`, falling back to defaults when the file is absent.
    pub async fn read_default() -> eyre::Result<Self> {
        if !tokio::fs::try_exists(CONFIG_FILE_PATH).await.unwrap_or(false) {
            tracing::info!("{CONFIG_FILE_PATH} not found, using default settings");
            return Ok(Self::default());
        }

        Self::read_from_file(CONFIG_FILE_PATH).await
    }

    pub fn ping_interval(&self) -> Duration {
        Duration::from_secs(self.ping_interval_secs)
    }

    pub fn rewards_interval(&self) -> Duration {
        Duration::from_secs(self.rewards_interval_secs)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.restart_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.startup_delay_secs)
    }
}
