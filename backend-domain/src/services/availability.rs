// Availability tracker
// Derives arena eligibility from roster state and the current time.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::entities::StudentGameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ArenaStanding {
    Available,
    OnCooldown { until: DateTime<Utc> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnavailableReason {
    #[error("pvp is disabled")]
    PvpDisabled,
    #[error("on cooldown until {until}")]
    OnCooldown { until: DateTime<Utc> },
}

/// Cooldown expires automatically: a deadline strictly before `now` is over.
pub fn standing(state: &StudentGameState, now: DateTime<Utc>) -> ArenaStanding {
    match state.cooldown_until {
        Some(until) if until >= now => ArenaStanding::OnCooldown { until },
        _ => ArenaStanding::Available,
    }
}

pub fn check_eligible(state: &StudentGameState, now: DateTime<Utc>) -> Result<(), UnavailableReason> {
    if !state.pvp_opt_in {
        return Err(UnavailableReason::PvpDisabled);
    }
    match standing(state, now) {
        ArenaStanding::Available => Ok(()),
        ArenaStanding::OnCooldown { until } => Err(UnavailableReason::OnCooldown { until }),
    }
}

pub fn can_fight(state: &StudentGameState, now: DateTime<Utc>) -> bool {
    check_eligible(state, now).is_ok()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::StudentId;

    fn student() -> StudentGameState {
        StudentGameState::new(StudentId(1), "ana", "Ana")
    }

    #[test]
    fn fresh_student_is_available() {
        let now = Utc::now();
        assert_eq!(standing(&student(), now), ArenaStanding::Available);
        assert!(can_fight(&student(), now));
    }

    #[test]
    fn future_cooldown_blocks() {
        let now = Utc::now();
        let mut state = student();
        let until = now + Duration::minutes(15);
        state.cooldown_until = Some(until);
        assert_eq!(check_eligible(&state, now), Err(UnavailableReason::OnCooldown { until }));
        assert!(!can_fight(&state, now));
    }

    #[test]
    fn deadline_equal_to_now_still_blocks() {
        let now = Utc::now();
        let mut state = student();
        state.cooldown_until = Some(now);
        assert!(!can_fight(&state, now));
        assert!(can_fight(&state, now + Duration::milliseconds(1)));
    }

    #[test]
    fn past_cooldown_is_available() {
        let now = Utc::now();
        let mut state = student();
        state.cooldown_until = Some(now - Duration::seconds(1));
        assert!(can_fight(&state, now));
    }

    #[test]
    fn opt_out_wins_over_cooldown() {
        let now = Utc::now();
        let mut state = student();
        state.pvp_opt_in = false;
        state.cooldown_until = Some(now + Duration::minutes(1));
        assert_eq!(check_eligible(&state, now), Err(UnavailableReason::PvpDisabled));
    }
}
