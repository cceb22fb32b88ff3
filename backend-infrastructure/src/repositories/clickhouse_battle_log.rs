// ClickHouse battle history
// One row per battle, both combatants denormalized into the row.

use anyhow::Result;
use async_trait::async_trait;
use clickhouse::{Client, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use backend_domain::{BattleLogEntry, BattleLogRepository, CombatantRecord, StudentId};

use crate::utils::{offset_to_utc, utc_to_offset};

const TABLE: &str = "battle_log";

#[derive(Debug, Clone, Serialize, Deserialize, Row)]
pub struct BattleLogRow {
    #[serde(with = "clickhouse::serde::time::datetime64::millis")]
    pub event_time: OffsetDateTime,
    #[serde(with = "clickhouse::serde::uuid")]
    pub battle_id: Uuid,
    pub attacker_id: i64,
    pub attacker_name: String,
    pub attacker_power: u64,
    pub attacker_die: u8,
    pub attacker_damage: u64,
    pub defender_id: i64,
    pub defender_name: String,
    pub defender_power: u64,
    pub defender_die: u8,
    pub defender_damage: u64,
    pub winner_id: Option<i64>,
    pub winner_name: Option<String>,
    pub gold_transferred: u64,
}

impl From<&BattleLogEntry> for BattleLogRow {
    fn from(entry: &BattleLogEntry) -> Self {
        Self {
            event_time: utc_to_offset(entry.timestamp),
            battle_id: entry.battle_id,
            attacker_id: entry.attacker.student_id.0,
            attacker_name: entry.attacker.name.clone(),
            attacker_power: entry.attacker.power,
            attacker_die: entry.attacker.die,
            attacker_damage: entry.attacker.damage,
            defender_id: entry.defender.student_id.0,
            defender_name: entry.defender.name.clone(),
            defender_power: entry.defender.power,
            defender_die: entry.defender.die,
            defender_damage: entry.defender.damage,
            winner_id: entry.winner_id.map(|id| id.0),
            winner_name: entry.winner_name.clone(),
            gold_transferred: entry.gold_transferred,
        }
    }
}

impl From<BattleLogRow> for BattleLogEntry {
    fn from(row: BattleLogRow) -> Self {
        Self {
            battle_id: row.battle_id,
            timestamp: offset_to_utc(row.event_time),
            attacker: CombatantRecord {
                student_id: StudentId(row.attacker_id),
                name: row.attacker_name,
                power: row.attacker_power,
                die: row.attacker_die,
                damage: row.attacker_damage,
            },
            defender: CombatantRecord {
                student_id: StudentId(row.defender_id),
                name: row.defender_name,
                power: row.defender_power,
                die: row.defender_die,
                damage: row.defender_damage,
            },
            winner_id: row.winner_id.map(StudentId),
            winner_name: row.winner_name,
            gold_transferred: row.gold_transferred,
        }
    }
}

#[derive(Clone)]
pub struct ClickhouseBattleLog {
    client: Client,
    database: String,
}

impl ClickhouseBattleLog {
    pub fn new(client: Client, database: String) -> Self {
        Self { client, database }
    }
}

#[async_trait]
impl BattleLogRepository for ClickhouseBattleLog {
    async fn ensure_schema(&self) -> Result<()> {
        let create_db = format!("CREATE DATABASE IF NOT EXISTS {}", self.database);
        self.client.query(&create_db).execute().await?;

        let create_log = r#"
CREATE TABLE IF NOT EXISTS battle_log (
    event_time DateTime64(3),
    battle_id UUID,
    attacker_id Int64,
    attacker_name String,
    attacker_power UInt64,
    attacker_die UInt8,
    attacker_damage UInt64,
    defender_id Int64,
    defender_name String,
    defender_power UInt64,
    defender_die UInt8,
    defender_damage UInt64,
    winner_id Nullable(Int64),
    winner_name Nullable(String),
    gold_transferred UInt64,
    INDEX idx_attacker attacker_id TYPE bloom_filter GRANULARITY 4,
    INDEX idx_defender defender_id TYPE bloom_filter GRANULARITY 4
) ENGINE = MergeTree
PARTITION BY toYYYYMM(event_time)
ORDER BY (event_time, battle_id)
"#;

        self.client.query(create_log).execute().await?;
        Ok(())
    }

    async fn append(&self, entry: &BattleLogEntry) -> Result<()> {
        let mut insert = self.client.insert(TABLE)?;
        insert.write(&BattleLogRow::from(entry)).await?;
        insert.end().await?;
        Ok(())
    }

    async fn query_by_participant(&self, student_id: StudentId, limit: usize) -> Result<Vec<BattleLogEntry>> {
        let rows = self
            .client
            .query(
                "SELECT ?fields FROM battle_log WHERE attacker_id = ? OR defender_id = ? \
                 ORDER BY event_time DESC LIMIT ?",
            )
            .bind(student_id.0)
            .bind(student_id.0)
            .bind(limit as u64)
            .fetch_all::<BattleLogRow>()
            .await?;
        Ok(rows.into_iter().map(BattleLogEntry::from).collect())
    }

    async fn ping(&self) -> Result<()> {
        let _: u8 = self.client.query("SELECT toUInt8(1)").fetch_one().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn row_conversion_keeps_tie_and_millis() {
        let entry = BattleLogEntry {
            battle_id: Uuid::new_v4(),
            timestamp: Utc
                .timestamp_millis_opt(1_767_225_600_123)
                .single()
                .expect("timestamp"),
            attacker: CombatantRecord {
                student_id: StudentId(4),
                name: "Ana".into(),
                power: 3,
                die: 2,
                damage: 6,
            },
            defender: CombatantRecord {
                student_id: StudentId(9),
                name: "Bia".into(),
                power: 2,
                die: 3,
                damage: 6,
            },
            winner_id: None,
            winner_name: None,
            gold_transferred: 0,
        };
        let row = BattleLogRow::from(&entry);
        assert_eq!(row.winner_id, None);
        assert_eq!(row.defender_id, 9);
        assert_eq!(BattleLogEntry::from(row), entry);
    }
}
