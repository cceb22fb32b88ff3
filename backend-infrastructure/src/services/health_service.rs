use std::sync::Arc;

use async_trait::async_trait;
use backend_domain::ports::HealthCheckService;
use backend_domain::{BattleLogRepository, RosterRepository};

pub struct DefaultHealthService {
    roster: Arc<dyn RosterRepository>,
    battle_log: Arc<dyn BattleLogRepository>,
}

impl DefaultHealthService {
    pub fn new(roster: Arc<dyn RosterRepository>, battle_log: Arc<dyn BattleLogRepository>) -> Self {
        Self { roster, battle_log }
    }
}

#[async_trait]
impl HealthCheckService for DefaultHealthService {
    async fn check_roster(&self) -> anyhow::Result<bool> {
        self.roster.ping().await.map(|_| true)
    }

    async fn check_battle_log(&self) -> anyhow::Result<bool> {
        self.battle_log.ping().await.map(|_| true)
    }
}
