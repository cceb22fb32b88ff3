use tracing::{debug, error, info};
use uuid::Uuid;

use backend_domain::{
    arbiter, check_eligible, normalize_handle, BattleLogEntry, BattleOutcome, FightRequest,
    FightResult, PvpStatusView, RosterError, StudentId,
};

use crate::ledger::{self, Settlement};
use crate::{roster, AppError, AppState};

/// Runs one battle from the availability check through settlement.
///
/// Version conflicts during settlement restart the whole attempt from fresh
/// reads, so a participant who went on cooldown in the meantime is reported
/// as unavailable rather than fought twice.
pub async fn fight(
    state: &AppState,
    caller: StudentId,
    request: FightRequest,
) -> Result<FightResult, AppError> {
    let target = resolve_target(state, caller, request).await?;
    let max_attempts = state.config.settle_max_retries.max(1);
    let mut contended = target;

    for attempt in 1..=max_attempts {
        let attacker = state.roster.get(caller).await?;
        let defender = state.roster.get(target).await?;
        let now = state.clock.now();
        check_eligible(&attacker, now).map_err(AppError::CallerUnavailable)?;
        check_eligible(&defender, now).map_err(AppError::TargetUnavailable)?;

        let rolls = state.rolls.roll(&state.config.transfer_ratio);
        let mut outcome = arbiter::resolve(&attacker, &defender, &rolls);

        match ledger::settle(
            state.roster.as_ref(),
            &attacker,
            &defender,
            &outcome,
            now,
            state.config.cooldown(),
        )
        .await
        {
            Ok(settlement) => {
                outcome.gold_transferred = settlement.gold_transferred;
                let battle_id = Uuid::new_v4();
                let entry = BattleLogEntry::record(battle_id, now, &attacker, &defender, &outcome);
                record_history(state, &entry).await;
                state.metrics.record_battle(&outcome);
                info!(
                    battle_id = %battle_id,
                    attacker = %caller,
                    defender = %target,
                    attacker_power = outcome.attacker_power,
                    defender_power = outcome.defender_power,
                    attacker_die = outcome.attacker_die,
                    defender_die = outcome.defender_die,
                    attacker_damage = outcome.attacker_damage,
                    defender_damage = outcome.defender_damage,
                    winner = ?entry.winner_id,
                    gold = outcome.gold_transferred,
                    "battle resolved"
                );
                return Ok(fight_result(battle_id, outcome, settlement));
            }
            Err(RosterError::VersionConflict(stale)) => {
                state.metrics.record_settle_conflict();
                contended = stale;
                debug!(
                    "settlement conflict: attacker={}, defender={}, stale={}, attempt={}",
                    caller, target, stale, attempt
                );
            }
            Err(err) => return Err(err.into()),
        }
    }

    state.metrics.record_settle_failure();
    error!(
        "settlement retries exhausted: attacker={}, defender={}, stale={}, attempts={}",
        caller, target, contended, max_attempts
    );
    Err(AppError::ConcurrentModification(contended))
}

async fn resolve_target(
    state: &AppState,
    caller: StudentId,
    request: FightRequest,
) -> Result<StudentId, AppError> {
    let target = match (request.target_id, request.target_handle) {
        (Some(id), _) => id,
        (None, Some(handle)) => {
            let handle = normalize_handle(&handle);
            if handle.is_empty() {
                return Err(AppError::BadRequest("targetHandle must not be empty".to_string()));
            }
            state.roster.find_by_handle(&handle).await?.student_id
        }
        (None, None) => {
            return Err(AppError::BadRequest(
                "either targetId or targetHandle is required".to_string(),
            ))
        }
    };
    if target == caller {
        return Err(AppError::SelfTarget);
    }
    Ok(target)
}

async fn record_history(state: &AppState, entry: &BattleLogEntry) {
    if let Err(err) = state.battle_log.append(entry).await {
        state.metrics.record_history_append_failure();
        error!(
            "battle history append failed: battle_id={}, err={}",
            entry.battle_id, err
        );
    }
}

fn fight_result(battle_id: Uuid, outcome: BattleOutcome, settlement: Settlement) -> FightResult {
    FightResult {
        battle_id,
        outcome,
        attacker_gold: settlement.attacker.gold,
        defender_gold: settlement.defender.gold,
        cooldown_until: settlement.cooldown_until,
    }
}

pub async fn set_pvp_opt_in(
    state: &AppState,
    caller: StudentId,
    enabled: bool,
) -> Result<PvpStatusView, AppError> {
    let updated = roster::update(
        state.roster.as_ref(),
        caller,
        state.config.settle_max_retries,
        |student| {
            if student.pvp_opt_in == enabled {
                return Ok(false);
            }
            student.pvp_opt_in = enabled;
            Ok(true)
        },
    )
    .await?;
    Ok(PvpStatusView {
        pvp_opt_in: updated.pvp_opt_in,
    })
}

pub async fn toggle_pvp(state: &AppState, caller: StudentId) -> Result<PvpStatusView, AppError> {
    let updated = roster::update(
        state.roster.as_ref(),
        caller,
        state.config.settle_max_retries,
        |student| {
            student.pvp_opt_in = !student.pvp_opt_in;
            Ok(true)
        },
    )
    .await?;
    Ok(PvpStatusView {
        pvp_opt_in: updated.pvp_opt_in,
    })
}
