// Ledger updater
// Turns a battle outcome into the committed post-battle state of both participants.

use chrono::{DateTime, Duration, Utc};

use backend_domain::ports::RosterRepository;
use backend_domain::{BattleOutcome, BattleSide, RosterError, StudentGameState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub attacker: StudentGameState,
    pub defender: StudentGameState,
    /// Gold actually moved; equals the outcome's amount unless the loser held less.
    pub gold_transferred: u64,
    pub cooldown_until: DateTime<Utc>,
}

/// Both participants enter cooldown whatever the result; the loser is
/// debited and the winner credited by the same amount.
pub fn plan_settlement(
    attacker: &StudentGameState,
    defender: &StudentGameState,
    outcome: &BattleOutcome,
    cooldown_until: DateTime<Utc>,
) -> Settlement {
    let mut attacker = attacker.clone();
    let mut defender = defender.clone();
    attacker.cooldown_until = Some(cooldown_until);
    defender.cooldown_until = Some(cooldown_until);

    let gold_transferred = match outcome.winner {
        Some(BattleSide::Attacker) => move_gold(&mut defender, &mut attacker, outcome.gold_transferred),
        Some(BattleSide::Defender) => move_gold(&mut attacker, &mut defender, outcome.gold_transferred),
        None => 0,
    };

    Settlement {
        attacker,
        defender,
        gold_transferred,
        cooldown_until,
    }
}

fn move_gold(from: &mut StudentGameState, to: &mut StudentGameState, amount: u64) -> u64 {
    let moved = amount.min(from.gold).min(u64::MAX - to.gold);
    from.gold -= moved;
    to.gold += moved;
    moved
}

/// Commits the settlement of one battle as a single compare-and-swap over
/// both records. `attacker` and `defender` must be the snapshots the outcome
/// was computed from; if either changed since, nothing is written and
/// `RosterError::VersionConflict` is returned so the caller can start over.
pub async fn settle(
    roster: &dyn RosterRepository,
    attacker: &StudentGameState,
    defender: &StudentGameState,
    outcome: &BattleOutcome,
    now: DateTime<Utc>,
    cooldown: Duration,
) -> Result<Settlement, RosterError> {
    let mut settlement = plan_settlement(attacker, defender, outcome, now + cooldown);
    let committed = roster
        .commit(vec![settlement.attacker.clone(), settlement.defender.clone()])
        .await?;
    for record in committed {
        if record.student_id == settlement.attacker.student_id {
            settlement.attacker = record;
        } else if record.student_id == settlement.defender.student_id {
            settlement.defender = record;
        }
    }
    Ok(settlement)
}
