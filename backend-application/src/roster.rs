use anyhow::anyhow;
use tracing::{debug, error};

use backend_domain::ports::RosterRepository;
use backend_domain::{RosterError, StudentGameState, StudentId};

use crate::AppError;

/// Applies `mutate` to the current record of `id` and commits it atomically.
///
/// The mutator reports whether it changed anything; an unchanged record is
/// returned as read, without a write. On a version conflict the record is
/// re-read and the mutator runs again, up to `max_attempts` times.
pub async fn update<F>(
    roster: &dyn RosterRepository,
    id: StudentId,
    max_attempts: u32,
    mut mutate: F,
) -> Result<StudentGameState, AppError>
where
    F: FnMut(&mut StudentGameState) -> Result<bool, AppError> + Send,
{
    for attempt in 1..=max_attempts.max(1) {
        let current = roster.get(id).await?;
        let mut next = current.clone();
        if !mutate(&mut next)? {
            return Ok(current);
        }
        match roster.commit(vec![next]).await {
            Ok(committed) => {
                return committed
                    .into_iter()
                    .next()
                    .ok_or_else(|| AppError::Internal(anyhow!("roster commit returned no record")));
            }
            Err(RosterError::VersionConflict(stale)) => {
                debug!("roster update conflict: student={}, attempt={}", stale, attempt);
            }
            Err(err) => return Err(err.into()),
        }
    }
    error!("roster update retries exhausted: student={}, attempts={}", id, max_attempts.max(1));
    Err(AppError::ConcurrentModification(id))
}
