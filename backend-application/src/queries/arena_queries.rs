use backend_domain::{
    can_fight, AvailabilityView, BattleHistoryItem, CooldownView, OpponentView, PvpStatusView,
    RosterError, StudentGameState, StudentId,
};
use tracing::error;

use crate::{AppError, AppState};

/// Classmates of the caller: students sharing at least one class, caller excluded.
pub async fn list_opponents(state: &AppState, caller: StudentId) -> Result<Vec<OpponentView>, AppError> {
    let me = state.roster.get(caller).await?;
    if me.class_ids.is_empty() {
        return Ok(Vec::new());
    }
    let now = state.clock.now();
    let classmates = state.roster.list_by_classes(&me.class_ids).await?;
    let opponents = classmates
        .into_iter()
        .filter(|student| student.student_id != me.student_id && student.handle != me.handle)
        .map(|student| OpponentView {
            available: can_fight(&student, now),
            equipped_power: student.equipped_power(),
            student_id: student.student_id,
            handle: student.handle,
            display_name: student.display_name,
            pic: student.pic,
            gold: student.gold,
            cooldown_until: student.cooldown_until,
        })
        .collect();
    Ok(opponents)
}

/// A caller without a roster record reads as opted in with no cooldown.
async fn load_optional(state: &AppState, caller: StudentId) -> Result<Option<StudentGameState>, AppError> {
    match state.roster.get(caller).await {
        Ok(student) => Ok(Some(student)),
        Err(RosterError::NotFound(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub async fn get_my_availability(state: &AppState, caller: StudentId) -> Result<AvailabilityView, AppError> {
    let view = load_optional(state, caller)
        .await?
        .map(|student| AvailabilityView {
            cooldown_until: student.cooldown_until,
            pvp_opt_in: student.pvp_opt_in,
        })
        .unwrap_or_default();
    Ok(view)
}

pub async fn get_my_cooldown(state: &AppState, caller: StudentId) -> Result<CooldownView, AppError> {
    let availability = get_my_availability(state, caller).await?;
    Ok(CooldownView {
        cooldown_until: availability.cooldown_until,
    })
}

pub async fn get_my_pvp_status(state: &AppState, caller: StudentId) -> Result<PvpStatusView, AppError> {
    let availability = get_my_availability(state, caller).await?;
    Ok(PvpStatusView {
        pvp_opt_in: availability.pvp_opt_in,
    })
}

pub async fn get_my_battle_history(
    state: &AppState,
    caller: StudentId,
) -> Result<Vec<BattleHistoryItem>, AppError> {
    let entries = state
        .battle_log
        .query_by_participant(caller, state.config.history_limit.max(1))
        .await
        .map_err(|err| {
            error!("failed to fetch battle history: student={}, err={}", caller, err);
            AppError::Internal(err)
        })?;
    Ok(entries
        .into_iter()
        .filter(|entry| entry.involves(caller))
        .map(|entry| BattleHistoryItem {
            result: entry.result_for(caller),
            gold_delta: entry.gold_delta_for(caller),
            entry,
        })
        .collect())
}
