use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AdMode, Dice};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct D20Roll {
    /// One face for a plain roll, two when advantage or disadvantage applied.
    pub rolls: Vec<u32>,
    pub chosen: u32,
    pub bonus: i32,
    pub total: i32,
    pub mode: AdMode,
}

impl D20Roll {
    pub fn is_nat20(&self) -> bool {
        self.chosen == 20
    }

    pub fn is_nat1(&self) -> bool {
        self.chosen == 1
    }
}

/// Roll a d20 plus `bonus`. Both flags together cancel to a single die.
pub fn roll_d20(dice: &mut Dice, bonus: i32, advantage: bool, disadvantage: bool) -> D20Roll {
    let mode = AdMode::from_flags(advantage, disadvantage);
    let rolls = match mode {
        AdMode::Normal => vec![dice.roll(20)],
        AdMode::Advantage | AdMode::Disadvantage => vec![dice.roll(20), dice.roll(20)],
    };
    let chosen = match mode {
        AdMode::Normal => rolls[0],
        AdMode::Advantage => rolls[0].max(rolls[1]),
        AdMode::Disadvantage => rolls[0].min(rolls[1]),
    };
    let total = chosen as i32 + bonus;
    debug!(?rolls, chosen, bonus, total, ?mode, "rolled d20");
    D20Roll { rolls, chosen, bonus, total, mode }
}

/// An ability check, skill check or saving throw, optionally against a DC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckInput {
    pub modifier: i32,
    pub mode: AdMode,
    pub dc: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub roll: D20Roll,
    pub dc: Option<i32>,
}

impl CheckResult {
    /// `None` when there was no DC to beat.
    pub fn passed(&self) -> Option<bool> {
        self.dc.map(|dc| self.roll.total >= dc)
    }
}

pub fn check(dice: &mut Dice, input: CheckInput) -> CheckResult {
    let roll = roll_d20(
        dice,
        input.modifier,
        input.mode == AdMode::Advantage,
        input.mode == AdMode::Disadvantage,
    );
    CheckResult { roll, dc: input.dc }
}

/* ---------------- attack resolution ---------------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttackOutcome {
    /// Natural 1, misses regardless of the total.
    CriticalMiss,
    /// Natural 20, hits regardless of the target's AC.
    CriticalHit,
    Hit { ac: i32 },
    Miss { ac: i32 },
    /// No target AC given; the roll stands on its own.
    Unopposed,
}

impl AttackOutcome {
    /// Whether damage should follow. Unopposed rolls count as hits.
    pub fn lands(&self) -> bool {
        match self {
            AttackOutcome::CriticalHit | AttackOutcome::Hit { .. } | AttackOutcome::Unopposed => {
                true
            }
            AttackOutcome::CriticalMiss | AttackOutcome::Miss { .. } => false,
        }
    }

    pub fn is_crit(&self) -> bool {
        matches!(self, AttackOutcome::CriticalHit)
    }
}

impl fmt::Display for AttackOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttackOutcome::CriticalMiss => f.write_str("MISS (nat 1)"),
            AttackOutcome::CriticalHit => f.write_str("CRIT (nat 20)"),
            AttackOutcome::Hit { ac } => write!(f, "HIT vs AC {ac}"),
            AttackOutcome::Miss { ac } => write!(f, "MISS vs AC {ac}"),
            AttackOutcome::Unopposed => f.write_str("rolled (no AC)"),
        }
    }
}

/// Roll an attack at `to_hit`. A target AC of `None` (or 0) skips the comparison.
pub fn resolve_attack(
    dice: &mut Dice,
    to_hit: i32,
    mode: AdMode,
    target_ac: Option<i32>,
) -> (D20Roll, AttackOutcome) {
    let roll = roll_d20(
        dice,
        to_hit,
        mode == AdMode::Advantage,
        mode == AdMode::Disadvantage,
    );
    let outcome = if roll.is_nat1() {
        AttackOutcome::CriticalMiss
    } else if roll.is_nat20() {
        AttackOutcome::CriticalHit
    } else {
        match target_ac.filter(|&ac| ac > 0) {
            Some(ac) if roll.total >= ac => AttackOutcome::Hit { ac },
            Some(ac) => AttackOutcome::Miss { ac },
            None => AttackOutcome::Unopposed,
        }
    };
    (roll, outcome)
}
