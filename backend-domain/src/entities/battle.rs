// Battle entities
// BattleOutcome is ephemeral; BattleLogEntry is the immutable persisted record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::StudentGameState;
use crate::value_objects::{BattleResult, BattleSide, StudentId};

/// Random draws consumed by one battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleRolls {
    pub attacker_die: u8,
    pub defender_die: u8,
    /// Fraction of the loser's gold moved to the winner, in `[min, max)`.
    pub transfer_ratio: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleOutcome {
    pub attacker_power: u64,
    pub defender_power: u64,
    pub attacker_die: u8,
    pub defender_die: u8,
    pub attacker_damage: u64,
    pub defender_damage: u64,
    /// `None` on a tie.
    pub winner: Option<BattleSide>,
    pub gold_transferred: u64,
}

impl BattleOutcome {
    pub fn is_tie(&self) -> bool {
        self.winner.is_none()
    }

    pub fn loser(&self) -> Option<BattleSide> {
        self.winner.map(|side| side.opponent())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatantRecord {
    pub student_id: StudentId,
    pub name: String,
    pub power: u64,
    pub die: u8,
    pub damage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleLogEntry {
    pub battle_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub attacker: CombatantRecord,
    pub defender: CombatantRecord,
    pub winner_id: Option<StudentId>,
    pub winner_name: Option<String>,
    pub gold_transferred: u64,
}

impl BattleLogEntry {
    pub fn record(
        battle_id: Uuid,
        timestamp: DateTime<Utc>,
        attacker: &StudentGameState,
        defender: &StudentGameState,
        outcome: &BattleOutcome,
    ) -> Self {
        let winner = outcome.winner.map(|side| match side {
            BattleSide::Attacker => attacker,
            BattleSide::Defender => defender,
        });
        Self {
            battle_id,
            timestamp,
            attacker: CombatantRecord {
                student_id: attacker.student_id,
                name: attacker.display_name.clone(),
                power: outcome.attacker_power,
                die: outcome.attacker_die,
                damage: outcome.attacker_damage,
            },
            defender: CombatantRecord {
                student_id: defender.student_id,
                name: defender.display_name.clone(),
                power: outcome.defender_power,
                die: outcome.defender_die,
                damage: outcome.defender_damage,
            },
            winner_id: winner.map(|student| student.student_id),
            winner_name: winner.map(|student| student.display_name.clone()),
            gold_transferred: outcome.gold_transferred,
        }
    }

    pub fn involves(&self, student_id: StudentId) -> bool {
        self.attacker.student_id == student_id || self.defender.student_id == student_id
    }

    pub fn result_for(&self, student_id: StudentId) -> BattleResult {
        match self.winner_id {
            None => BattleResult::Tie,
            Some(winner) if winner == student_id => BattleResult::Win,
            Some(_) => BattleResult::Lose,
        }
    }

    /// Signed balance change this battle caused for `student_id`.
    pub fn gold_delta_for(&self, student_id: StudentId) -> i64 {
        let amount = i64::try_from(self.gold_transferred).unwrap_or(i64::MAX);
        match self.result_for(student_id) {
            BattleResult::Win => amount,
            BattleResult::Lose => -amount,
            BattleResult::Tie => 0,
        }
    }
}
