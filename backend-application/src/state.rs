use std::sync::Arc;

use backend_domain::ports::{BattleLogRepository, Clock, HealthCheckService, RollSource, RosterRepository};
use backend_domain::RuntimeConfig;

use crate::Metrics;

#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub roster: Arc<dyn RosterRepository>,
    pub battle_log: Arc<dyn BattleLogRepository>,
    pub rolls: Arc<dyn RollSource>,
    pub clock: Arc<dyn Clock>,
    pub health: Arc<dyn HealthCheckService>,
    pub metrics: Arc<Metrics>,
}
