use async_trait::async_trait;

use crate::entities::{BattleLogEntry, StudentGameState};
use crate::errors::RosterError;
use crate::value_objects::{ClassId, StudentId};

/// Durable mapping from student identity to game state.
///
/// Every returned record carries the `version` it was read at. `commit`
/// is a compare-and-swap over all the records it is handed: either every
/// version still matches and all of them are written (each version bumped
/// by one), or nothing is written and `VersionConflict` names the first
/// stale record.
#[async_trait]
pub trait RosterRepository: Send + Sync {
    async fn get(&self, id: StudentId) -> Result<StudentGameState, RosterError>;
    async fn find_by_handle(&self, handle: &str) -> Result<StudentGameState, RosterError>;
    async fn list_by_classes(&self, class_ids: &[ClassId]) -> Result<Vec<StudentGameState>, RosterError>;
    async fn insert(&self, state: StudentGameState) -> Result<StudentGameState, RosterError>;
    async fn commit(&self, changes: Vec<StudentGameState>) -> Result<Vec<StudentGameState>, RosterError>;
    async fn ping(&self) -> anyhow::Result<()>;
}

/// Append-only battle history. Never the source of truth for balances.
#[async_trait]
pub trait BattleLogRepository: Send + Sync {
    async fn ensure_schema(&self) -> anyhow::Result<()>;
    async fn append(&self, entry: &BattleLogEntry) -> anyhow::Result<()>;
    /// Entries involving `student_id`, newest first.
    async fn query_by_participant(
        &self,
        student_id: StudentId,
        limit: usize,
    ) -> anyhow::Result<Vec<BattleLogEntry>>;
    async fn ping(&self) -> anyhow::Result<()>;
}
