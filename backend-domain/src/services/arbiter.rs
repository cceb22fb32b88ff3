// Battle arbiter
// Side-effect free: the caller supplies the rolls (or an Rng) and persists nothing here.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use rand::Rng;
use thiserror::Error;

use crate::entities::{BattleOutcome, BattleRolls, StudentGameState};
use crate::value_objects::BattleSide;

pub const DIE_FACES: RangeInclusive<u8> = 1..=6;

#[derive(Debug, Error, PartialEq)]
#[error("invalid transfer ratio range [{min}, {max})")]
pub struct InvalidRatioRange {
    pub min: f64,
    pub max: f64,
}

/// Half-open range `[min, max)` the transfer ratio is drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferRatioRange {
    min: f64,
    max: f64,
}

impl TransferRatioRange {
    pub fn new(min: f64, max: f64) -> Result<Self, InvalidRatioRange> {
        let valid = min.is_finite() && max.is_finite() && 0.0 <= min && min < max && max <= 1.0;
        if valid {
            Ok(Self { min, max })
        } else {
            Err(InvalidRatioRange { min, max })
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, ratio: f64) -> bool {
        self.min <= ratio && ratio < self.max
    }
}

impl Default for TransferRatioRange {
    fn default() -> Self {
        Self { min: 0.10, max: 0.15 }
    }
}

impl BattleRolls {
    pub fn roll<R: Rng + ?Sized>(rng: &mut R, ratio: &TransferRatioRange) -> Self {
        Self {
            attacker_die: rng.gen_range(DIE_FACES),
            defender_die: rng.gen_range(DIE_FACES),
            transfer_ratio: rng.gen_range(ratio.min..ratio.max),
        }
    }
}

/// `floor(loser_gold * ratio)`, never more than the loser holds.
pub fn transfer_amount(loser_gold: u64, ratio: f64) -> u64 {
    let ratio = ratio.clamp(0.0, 1.0);
    let amount = (loser_gold as f64 * ratio).floor() as u64;
    amount.min(loser_gold)
}

pub fn resolve(attacker: &StudentGameState, defender: &StudentGameState, rolls: &BattleRolls) -> BattleOutcome {
    let attacker_power = attacker.equipped_power();
    let defender_power = defender.equipped_power();
    let attacker_damage = u64::from(rolls.attacker_die).saturating_mul(attacker_power);
    let defender_damage = u64::from(rolls.defender_die).saturating_mul(defender_power);

    let winner = match attacker_damage.cmp(&defender_damage) {
        Ordering::Greater => Some(BattleSide::Attacker),
        Ordering::Less => Some(BattleSide::Defender),
        Ordering::Equal => None,
    };
    let gold_transferred = match winner {
        Some(BattleSide::Attacker) => transfer_amount(defender.gold, rolls.transfer_ratio),
        Some(BattleSide::Defender) => transfer_amount(attacker.gold, rolls.transfer_ratio),
        None => 0,
    };

    BattleOutcome {
        attacker_power,
        defender_power,
        attacker_die: rolls.attacker_die,
        defender_die: rolls.defender_die,
        attacker_damage,
        defender_damage,
        winner,
        gold_transferred,
    }
}

pub fn arbitrate<R: Rng + ?Sized>(
    attacker: &StudentGameState,
    defender: &StudentGameState,
    rng: &mut R,
    ratio: &TransferRatioRange,
) -> BattleOutcome {
    let rolls = BattleRolls::roll(rng, ratio);
    resolve(attacker, defender, &rolls)
}
