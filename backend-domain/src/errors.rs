use thiserror::Error;

use crate::value_objects::StudentId;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("student not found: {0}")]
    NotFound(String),
    #[error("student {0} is already registered")]
    DuplicateId(StudentId),
    #[error("handle '{0}' is already registered")]
    DuplicateHandle(String),
    #[error("version conflict on student {0}")]
    VersionConflict(StudentId),
    #[error("corrupt roster record for student {student_id}: {reason}")]
    Corrupt { student_id: StudentId, reason: String },
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl RosterError {
    pub fn not_found(id: StudentId) -> Self {
        RosterError::NotFound(id.to_string())
    }
}
