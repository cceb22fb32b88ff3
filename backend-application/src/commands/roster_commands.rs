// Hooks for the roster-management and shop collaborators.
// Every mutation goes through the roster's atomic update.

use tracing::info;

use backend_domain::{
    normalize_handle, normalize_optional_text, EquipmentSlot, GoldAdjustmentRequest, GoldBalance,
    Item, ProvisionStudentRequest, StudentGameState, StudentId,
};

use crate::{roster, AppError, AppState};

pub async fn provision_student(
    state: &AppState,
    payload: ProvisionStudentRequest,
) -> Result<StudentGameState, AppError> {
    let handle = normalize_handle(&payload.handle);
    if handle.is_empty() {
        return Err(AppError::BadRequest("handle must not be empty".to_string()));
    }
    let display_name = payload.display_name.trim().to_string();
    if display_name.is_empty() {
        return Err(AppError::BadRequest("displayName must not be empty".to_string()));
    }

    let mut student = StudentGameState::new(payload.student_id, handle, display_name);
    student.pic = normalize_optional_text(payload.pic);
    student.gold = payload.gold.unwrap_or(state.config.starting_gold);
    student.class_ids = payload.class_ids;
    student.class_ids.sort();
    student.class_ids.dedup();

    let created = state.roster.insert(student).await?;
    info!(
        "student provisioned: id={}, handle={}, classes={}",
        created.student_id,
        created.handle,
        created.class_ids.len()
    );
    Ok(created)
}

pub async fn equip_item(
    state: &AppState,
    student_id: StudentId,
    item: Item,
) -> Result<StudentGameState, AppError> {
    if item.name.trim().is_empty() {
        return Err(AppError::BadRequest("item name must not be empty".to_string()));
    }
    roster::update(
        state.roster.as_ref(),
        student_id,
        state.config.settle_max_retries,
        |student| {
            if student.equipment.get(&item.slot) == Some(&item) {
                return Ok(false);
            }
            student.equip(item.clone());
            Ok(true)
        },
    )
    .await
}

pub async fn unequip(
    state: &AppState,
    student_id: StudentId,
    slot: EquipmentSlot,
) -> Result<StudentGameState, AppError> {
    roster::update(
        state.roster.as_ref(),
        student_id,
        state.config.settle_max_retries,
        |student| Ok(student.unequip(slot).is_some()),
    )
    .await
}

/// Task rewards credit, purchases debit. A debit larger than the balance is
/// rejected outright.
pub async fn adjust_gold(
    state: &AppState,
    student_id: StudentId,
    payload: GoldAdjustmentRequest,
) -> Result<GoldBalance, AppError> {
    let delta = payload.delta;
    let updated = roster::update(
        state.roster.as_ref(),
        student_id,
        state.config.settle_max_retries,
        |student| {
            if delta == 0 {
                return Ok(false);
            }
            let amount = delta.unsigned_abs();
            if delta > 0 {
                student.gold = student.gold.checked_add(amount).ok_or_else(|| {
                    AppError::BadRequest("gold balance would overflow".to_string())
                })?;
            } else {
                if amount > student.gold {
                    return Err(AppError::InsufficientGold {
                        balance: student.gold,
                        requested: amount,
                    });
                }
                student.gold -= amount;
            }
            Ok(true)
        },
    )
    .await?;
    Ok(GoldBalance {
        student_id: updated.student_id,
        gold: updated.gold,
    })
}
