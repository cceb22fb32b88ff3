use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{DbConfig, RuntimeConfig, TransferRatioRange};

use crate::config::validation::{validate_cooldown_minutes, validate_history_limit};

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BattleLogBackend {
    Memory,
    Clickhouse,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub roster_path: Option<String>,
    pub battle_log_backend: BattleLogBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub cooldown_minutes: u64,
    pub transfer_ratio_min: f64,
    pub transfer_ratio_max: f64,
    pub settle_max_retries: u32,
    pub starting_gold: u64,
    pub history_limit: usize,
    pub rng_seed: Option<u64>,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            roster_path: Some("./roster.json".to_string()),
            battle_log_backend: BattleLogBackend::Memory,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "arena".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            cooldown_minutes: 15,
            transfer_ratio_min: 0.10,
            transfer_ratio_max: 0.15,
            settle_max_retries: 5,
            starting_gold: 100,
            history_limit: 100,
            rng_seed: None,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("ARENA_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.resolve_paths(base_dir);
            config.normalize();
            config.validate()?;
            return Ok(config);
        }
        let content = fs::read_to_string(file_path).await?;
        let mut config = AppConfig::from_toml(&content)?;
        config.apply_env_overrides();
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        self.api_token = normalize_optional(self.api_token.take());
        self.roster_path = normalize_optional(self.roster_path.take());
        self.clickhouse_user = normalize_optional(self.clickhouse_user.take());
        self.clickhouse_password = normalize_optional(self.clickhouse_password.take());
        self.log_dir = normalize_optional(self.log_dir.take());
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if let Some(path) = &self.roster_path {
            self.roster_path = Some(resolve_path(base, path));
        }
        if let Some(path) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        self.transfer_ratio()?;
        validate_cooldown_minutes(self.cooldown_minutes)?;
        validate_history_limit(self.history_limit)?;
        if self.settle_max_retries == 0 {
            return Err(anyhow!("settle_max_retries must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.battle_log_backend == BattleLogBackend::Clickhouse
            && self.clickhouse_url.trim().is_empty()
        {
            return Err(anyhow!("clickhouse_url must not be empty for the clickhouse battle log"));
        }
        Ok(())
    }

    pub fn transfer_ratio(&self) -> Result<TransferRatioRange> {
        TransferRatioRange::new(self.transfer_ratio_min, self.transfer_ratio_max)
            .map_err(|err| anyhow!("invalid transfer_ratio_min/transfer_ratio_max: {}", err))
    }

    pub fn to_runtime_config(&self) -> Result<RuntimeConfig> {
        Ok(RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            cooldown_minutes: self.cooldown_minutes,
            transfer_ratio: self.transfer_ratio()?,
            settle_max_retries: self.settle_max_retries,
            starting_gold: self.starting_gold,
            history_limit: self.history_limit,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        })
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("ARENA_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("ARENA_API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Ok(value) = env::var("ARENA_ROSTER_PATH") {
            self.roster_path = Some(value);
        }
        if let Ok(value) = env::var("ARENA_BATTLE_LOG_BACKEND") {
            match value.trim().to_lowercase().as_str() {
                "memory" => self.battle_log_backend = BattleLogBackend::Memory,
                "clickhouse" => self.battle_log_backend = BattleLogBackend::Clickhouse,
                other => warn!("ignoring unknown ARENA_BATTLE_LOG_BACKEND '{}'", other),
            }
        }
        if let Ok(value) = env::var("ARENA_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("ARENA_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("ARENA_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("ARENA_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Ok(value) = env::var("ARENA_COOLDOWN_MINUTES") {
            self.cooldown_minutes = value.parse().unwrap_or(self.cooldown_minutes);
        }
        if let Ok(value) = env::var("ARENA_TRANSFER_RATIO_MIN") {
            self.transfer_ratio_min = value.parse().unwrap_or(self.transfer_ratio_min);
        }
        if let Ok(value) = env::var("ARENA_TRANSFER_RATIO_MAX") {
            self.transfer_ratio_max = value.parse().unwrap_or(self.transfer_ratio_max);
        }
        if let Ok(value) = env::var("ARENA_SETTLE_MAX_RETRIES") {
            self.settle_max_retries = value.parse().unwrap_or(self.settle_max_retries);
        }
        if let Ok(value) = env::var("ARENA_STARTING_GOLD") {
            self.starting_gold = value.parse().unwrap_or(self.starting_gold);
        }
        if let Ok(value) = env::var("ARENA_HISTORY_LIMIT") {
            self.history_limit = value.parse().unwrap_or(self.history_limit);
        }
        if let Ok(value) = env::var("ARENA_RNG_SEED") {
            self.rng_seed = value.parse().ok();
        }
        if let Ok(value) = env::var("ARENA_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Ok(value) = env::var("ARENA_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Ok(value) = env::var("ARENA_LOG_DIR") {
            self.log_dir = Some(value);
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.filter(|item| !item.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().expect("defaults validate");
        let runtime = config.to_runtime_config().expect("runtime config");
        assert_eq!(runtime.cooldown_minutes, 15);
        assert_eq!(runtime.transfer_ratio, TransferRatioRange::default());
    }

    #[test]
    fn toml_overrides_defaults() {
        let config = AppConfig::from_toml(
            r#"
bind_addr = "0.0.0.0:9000"
cooldown_minutes = 5
transfer_ratio_min = 0.2
transfer_ratio_max = 0.3
battle_log_backend = "clickhouse"
"#,
        )
        .expect("parse config");
        config.validate().expect("valid config");
        assert_eq!(config.cooldown_minutes, 5);
        assert_eq!(config.battle_log_backend, BattleLogBackend::Clickhouse);
        assert_eq!(config.settle_max_retries, 5);
    }

    #[test]
    fn inverted_ratio_range_is_rejected() {
        let mut config = AppConfig::default();
        config.transfer_ratio_min = 0.3;
        config.transfer_ratio_max = 0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_retries_is_rejected() {
        let mut config = AppConfig::default();
        config.settle_max_retries = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_optionals_are_cleared() {
        let mut config = AppConfig::default();
        config.api_token = Some("   ".to_string());
        config.roster_path = Some(String::new());
        config.normalize();
        assert!(config.api_token.is_none());
        assert!(config.roster_path.is_none());
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let mut config = AppConfig::default();
        config.roster_path = Some("data/roster.json".to_string());
        config.resolve_paths(Some(Path::new("/etc/arena")));
        assert_eq!(config.roster_path.as_deref(), Some("/etc/arena/data/roster.json"));
    }
}
