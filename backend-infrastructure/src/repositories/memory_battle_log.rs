use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use backend_domain::{BattleLogEntry, BattleLogRepository, StudentId};

#[derive(Default)]
struct LogTable {
    entries: Vec<BattleLogEntry>,
    by_participant: HashMap<StudentId, Vec<usize>>,
}

/// Process-local battle history, indexed by participant.
#[derive(Default)]
pub struct InMemoryBattleLog {
    table: RwLock<LogTable>,
}

impl InMemoryBattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl BattleLogRepository for InMemoryBattleLog {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn append(&self, entry: &BattleLogEntry) -> anyhow::Result<()> {
        let mut table = self.table.write().await;
        let position = table.entries.len();
        table.entries.push(entry.clone());
        table
            .by_participant
            .entry(entry.attacker.student_id)
            .or_default()
            .push(position);
        if entry.defender.student_id != entry.attacker.student_id {
            table
                .by_participant
                .entry(entry.defender.student_id)
                .or_default()
                .push(position);
        }
        Ok(())
    }

    async fn query_by_participant(
        &self,
        student_id: StudentId,
        limit: usize,
    ) -> anyhow::Result<Vec<BattleLogEntry>> {
        let table = self.table.read().await;
        let Some(positions) = table.by_participant.get(&student_id) else {
            return Ok(Vec::new());
        };
        let mut entries: Vec<BattleLogEntry> = positions
            .iter()
            .filter_map(|position| table.entries.get(*position).cloned())
            .collect();
        // equal timestamps come out latest append first
        entries.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
