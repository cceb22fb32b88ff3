use anyhow::{anyhow, Result};

const MAX_COOLDOWN_MINUTES: u64 = 7 * 24 * 60;
const MAX_HISTORY_LIMIT: usize = 1_000;

pub fn validate_cooldown_minutes(value: u64) -> Result<()> {
    if value == 0 || value > MAX_COOLDOWN_MINUTES {
        return Err(anyhow!(
            "cooldown_minutes must be between 1 and {}",
            MAX_COOLDOWN_MINUTES
        ));
    }
    Ok(())
}

pub fn validate_history_limit(value: usize) -> Result<()> {
    if value == 0 || value > MAX_HISTORY_LIMIT {
        return Err(anyhow!("history_limit must be between 1 and {}", MAX_HISTORY_LIMIT));
    }
    Ok(())
}
