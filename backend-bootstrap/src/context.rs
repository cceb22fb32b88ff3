use std::sync::Arc;

use anyhow::Result;
use clickhouse::Client;
use tracing::info;

use backend_application::{AppState, Metrics};
use backend_domain::{BattleLogRepository, RosterRepository};
use backend_infrastructure::{
    AppConfig, BattleLogBackend, ClickhouseBattleLog, DefaultHealthService, InMemoryBattleLog,
    JsonRosterRepository, SeededRollSource, SystemClock,
};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config()?;

        let roster: Arc<dyn RosterRepository> = match &config.roster_path {
            Some(path) => Arc::new(JsonRosterRepository::open(path).await?),
            None => {
                info!("roster_path not set, roster is kept in memory only");
                Arc::new(JsonRosterRepository::in_memory())
            }
        };

        let battle_log: Arc<dyn BattleLogRepository> = match config.battle_log_backend {
            BattleLogBackend::Memory => Arc::new(InMemoryBattleLog::new()),
            BattleLogBackend::Clickhouse => {
                let db_config = config.to_db_config();
                let mut clickhouse = Client::default()
                    .with_url(&db_config.clickhouse_url)
                    .with_database(&db_config.clickhouse_database);
                if let Some(user) = &db_config.clickhouse_user {
                    clickhouse = clickhouse.with_user(user);
                }
                if let Some(password) = &db_config.clickhouse_password {
                    clickhouse = clickhouse.with_password(password);
                }
                Arc::new(ClickhouseBattleLog::new(
                    clickhouse,
                    db_config.clickhouse_database.clone(),
                ))
            }
        };
        battle_log.ensure_schema().await?;

        let state = AppState {
            config: runtime_config,
            roster: roster.clone(),
            battle_log: battle_log.clone(),
            rolls: Arc::new(SeededRollSource::new(config.rng_seed)),
            clock: Arc::new(SystemClock),
            health: Arc::new(DefaultHealthService::new(roster, battle_log)),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}
