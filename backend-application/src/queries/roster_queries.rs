use backend_domain::{normalize_handle, StudentGameState, StudentId};

use crate::{AppError, AppState};

pub async fn get_student(state: &AppState, student_id: StudentId) -> Result<StudentGameState, AppError> {
    Ok(state.roster.get(student_id).await?)
}

pub async fn find_by_handle(state: &AppState, handle: &str) -> Result<StudentGameState, AppError> {
    let handle = normalize_handle(handle);
    if handle.is_empty() {
        return Err(AppError::BadRequest("handle must not be empty".to_string()));
    }
    Ok(state.roster.find_by_handle(&handle).await?)
}
