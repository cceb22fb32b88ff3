use thiserror::Error;
use tracing::error;

use backend_domain::{RosterError, StudentId, UnavailableReason};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("student not found: {0}")]
    StudentNotFound(String),
    #[error("a student cannot battle themselves")]
    SelfTarget,
    #[error("you cannot battle right now: {0}")]
    CallerUnavailable(UnavailableReason),
    #[error("target cannot battle right now: {0}")]
    TargetUnavailable(UnavailableReason),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("insufficient gold: balance {balance}, requested {requested}")]
    InsufficientGold { balance: u64, requested: u64 },
    #[error("the request could not be completed, please retry")]
    ConcurrentModification(StudentId),
    #[error("corrupt roster record for student {0}")]
    CorruptRosterRecord(StudentId),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RosterError> for AppError {
    fn from(value: RosterError) -> Self {
        match value {
            RosterError::NotFound(key) => AppError::StudentNotFound(key),
            RosterError::DuplicateId(id) => {
                AppError::Conflict(format!("student {} is already registered", id))
            }
            RosterError::DuplicateHandle(handle) => {
                AppError::Conflict(format!("handle '{}' is already registered", handle))
            }
            RosterError::VersionConflict(id) => AppError::ConcurrentModification(id),
            RosterError::Corrupt { student_id, reason } => {
                error!("corrupt roster record: student={}, reason={}", student_id, reason);
                AppError::CorruptRosterRecord(student_id)
            }
            RosterError::Storage(err) => AppError::Internal(err),
        }
    }
}
