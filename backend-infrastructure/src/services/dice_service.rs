// Roll sources
// Production draws come from a ChaCha stream, seeded from config for replays
// or from OS entropy otherwise.

use std::collections::VecDeque;
use std::sync::Mutex;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use backend_domain::{BattleRolls, RollSource, TransferRatioRange};

pub struct SeededRollSource {
    rng: Mutex<ChaCha8Rng>,
}

impl SeededRollSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => {
                info!("roll source seeded: seed={}", seed);
                ChaCha8Rng::seed_from_u64(seed)
            }
            None => ChaCha8Rng::from_entropy(),
        };
        Self { rng: Mutex::new(rng) }
    }
}

impl RollSource for SeededRollSource {
    fn roll(&self, ratio: &TransferRatioRange) -> BattleRolls {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        BattleRolls::roll(&mut *rng, ratio)
    }
}

/// Hands out pre-arranged rolls in order, then falls back to a seeded stream.
pub struct ScriptedRollSource {
    script: Mutex<VecDeque<BattleRolls>>,
    fallback: SeededRollSource,
}

impl ScriptedRollSource {
    pub fn new(rolls: Vec<BattleRolls>) -> Self {
        Self {
            script: Mutex::new(rolls.into()),
            fallback: SeededRollSource::new(Some(0)),
        }
    }

    pub fn push(&self, rolls: BattleRolls) {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(rolls);
    }
}

impl RollSource for ScriptedRollSource {
    fn roll(&self, ratio: &TransferRatioRange) -> BattleRolls {
        let next = self
            .script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();
        next.unwrap_or_else(|| self.fallback.roll(ratio))
    }
}
