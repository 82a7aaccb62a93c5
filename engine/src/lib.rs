use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

pub mod character;
pub mod config;
pub mod content;
pub mod d20;
pub mod encounter;
pub mod error;
pub mod expr;
pub mod initiative;
pub mod media;
pub mod monster;
pub mod pdf_import;
pub mod roll;
pub mod session;
pub mod storage;

pub use character::{Ability, AbilityScores, Character, CheckTarget, Skill, Weapon};
pub use d20::{check, resolve_attack, roll_d20, AttackOutcome, CheckInput, CheckResult, D20Roll};
pub use encounter::{Combatant, CombatantKind, Encounter};
pub use error::{PanelError, Result};
pub use expr::{critify, roll_expr, DiceExpr, ExprRoll, Term, TermRoll};
pub use initiative::{next_turn, prev_turn};
pub use monster::{Monster, MonsterAction};
pub use roll::RollResult;
pub use session::{PasswordGate, Session};
pub use storage::Store;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdMode {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl AdMode {
    /// Advantage and disadvantage requested together cancel out.
    pub fn from_flags(advantage: bool, disadvantage: bool) -> Self {
        match (advantage, disadvantage) {
            (true, false) => AdMode::Advantage,
            (false, true) => AdMode::Disadvantage,
            _ => AdMode::Normal,
        }
    }
}

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { faces: Vec<u32>, next: usize },
}

/// Source of die faces. Every die is uniform over `[1, sides]`.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    pub fn from_entropy() -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::from_entropy()) }
    }

    /// Replays `faces` in order (cycling), clamped into the die's range.
    pub fn from_scripted(faces: Vec<u32>) -> Self {
        Self { source: Source::Scripted { faces, next: 0 } }
    }

    pub fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(1..=sides),
            Source::Scripted { faces, next } => {
                if faces.is_empty() {
                    return 1;
                }
                let face = faces[*next % faces.len()];
                *next += 1;
                face.clamp(1, sides)
            }
        }
    }
}

/// `floor((score - 10) / 2)`, so 9 gives -1.
pub fn ability_mod(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Proficiency bonus by character level: +2 at 1st, +1 every four levels.
pub fn proficiency_bonus(level: i32) -> i32 {
    2 + (level.max(1) - 1) / 4
}
