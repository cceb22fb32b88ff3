use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::BattleRolls;
use crate::services::TransferRatioRange;

pub trait RollSource: Send + Sync {
    fn roll(&self, ratio: &TransferRatioRange) -> BattleRolls;
}

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[async_trait]
pub trait HealthCheckService: Send + Sync {
    async fn check_roster(&self) -> anyhow::Result<bool>;
    async fn check_battle_log(&self) -> anyhow::Result<bool>;
}
