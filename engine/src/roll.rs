use std::fmt;

use serde::{Deserialize, Serialize};

use crate::d20::D20Roll;
use crate::expr::{ExprRoll, Term};
use crate::AdMode;

/// Anything the dice produced, ready for the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RollResult {
    Expr(ExprRoll),
    D20(D20Roll),
}

impl RollResult {
    pub fn total(&self) -> i32 {
        match self {
            RollResult::Expr(r) => r.total,
            RollResult::D20(r) => r.total,
        }
    }
}

impl From<ExprRoll> for RollResult {
    fn from(r: ExprRoll) -> Self {
        RollResult::Expr(r)
    }
}

impl From<D20Roll> for RollResult {
    fn from(r: D20Roll) -> Self {
        RollResult::D20(r)
    }
}

fn format_modifier(modifier: i32) -> String {
    if modifier >= 0 {
        format!("+{}", modifier)
    } else {
        format!("-{}", modifier.abs())
    }
}

fn join(values: &[u32]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for D20Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bonus = format_modifier(self.bonus);
        match (self.mode, self.rolls.as_slice()) {
            (AdMode::Advantage, [a, b]) | (AdMode::Disadvantage, [a, b]) => {
                let tag = if self.mode == AdMode::Advantage { "ADV" } else { "DIS" };
                write!(
                    f,
                    "2d20({}) [{}, {}] → {} {} = **{}**",
                    tag, a, b, self.chosen, bonus, self.total
                )
            }
            _ => write!(f, "d20 [{}] {} = **{}**", join(&self.rolls), bonus, self.total),
        }
    }
}

impl fmt::Display for ExprRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` →", self.expr)?;
        for (i, t) in self.terms.iter().enumerate() {
            match t.term {
                Term::Dice { negative, count, sides } => {
                    let sign = if negative { "-" } else if i > 0 { "+" } else { "" };
                    write!(f, " {}{}d{}[{}]", sign, count, sides, join(&t.rolls))?;
                }
                Term::Flat { value } => write!(f, " {}", format_modifier(value))?,
            }
        }
        write!(f, " = **{}**", self.total)
    }
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollResult::Expr(r) => r.fmt(f),
            RollResult::D20(r) => r.fmt(f),
        }
    }
}
