use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{BattleLogEntry, BattleOutcome};
use crate::services::TransferRatioRange;
use crate::value_objects::{BattleResult, ClassId, StudentId};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentView {
    pub student_id: StudentId,
    pub handle: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pic: Option<String>,
    pub gold: u64,
    pub equipped_power: u64,
    pub available: bool,
    pub cooldown_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub cooldown_until: Option<DateTime<Utc>>,
    pub pvp_opt_in: bool,
}

impl Default for AvailabilityView {
    fn default() -> Self {
        Self {
            cooldown_until: None,
            pvp_opt_in: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CooldownView {
    pub cooldown_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PvpStatusView {
    pub pvp_opt_in: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FightRequest {
    #[serde(default)]
    pub target_id: Option<StudentId>,
    #[serde(default)]
    pub target_handle: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FightResult {
    pub battle_id: Uuid,
    pub outcome: BattleOutcome,
    pub attacker_gold: u64,
    pub defender_gold: u64,
    pub cooldown_until: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleHistoryItem {
    #[serde(flatten)]
    pub entry: BattleLogEntry,
    pub result: BattleResult,
    /// Signed change to the viewer's balance.
    pub gold_delta: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionStudentRequest {
    pub student_id: StudentId,
    pub handle: String,
    pub display_name: String,
    #[serde(default)]
    pub pic: Option<String>,
    #[serde(default)]
    pub gold: Option<u64>,
    #[serde(default)]
    pub class_ids: Vec<ClassId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoldAdjustmentRequest {
    pub delta: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldBalance {
    pub student_id: StudentId,
    pub gold: u64,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub cooldown_minutes: u64,
    pub transfer_ratio: TransferRatioRange,
    pub settle_max_retries: u32,
    pub starting_gold: u64,
    pub history_limit: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::minutes(i64::try_from(self.cooldown_minutes).unwrap_or(i64::MAX / 60_000))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            cooldown_minutes: 15,
            transfer_ratio: TransferRatioRange::default(),
            settle_max_retries: 5,
            starting_gold: 100,
            history_limit: 100,
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
}
