//! Dice expressions: signed sums of `NdS` dice terms and flat integers,
//! e.g. `2d6+1d4+3` or `d20-1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PanelError, Result};
use crate::Dice;

/// Upper bound on the dice count of a single term typed by a user.
pub const MAX_DICE_PER_TERM: u32 = 1000;
/// Upper bound on the number of sides of a die.
pub const MAX_SIDES: u32 = 1_000_000;

/// One signed term of an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
    Dice { negative: bool, count: u32, sides: u32 },
    Flat { value: i32 },
}

impl Term {
    fn sign(&self) -> i32 {
        match self {
            Term::Dice { negative: true, .. } => -1,
            Term::Dice { .. } => 1,
            Term::Flat { value } if *value < 0 => -1,
            Term::Flat { .. } => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiceExpr {
    terms: Vec<Term>,
}

/// Outcome of one term: the faces rolled (empty for flats) and the signed subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRoll {
    pub term: Term,
    pub rolls: Vec<u32>,
    pub subtotal: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExprRoll {
    pub expr: String,
    pub terms: Vec<TermRoll>,
    pub total: i32,
}

impl ExprRoll {
    /// Sum of all flat terms.
    pub fn modifier(&self) -> i32 {
        self.terms
            .iter()
            .filter_map(|t| match t.term {
                Term::Flat { value } => Some(value),
                Term::Dice { .. } => None,
            })
            .sum()
    }

    pub fn dice_rolls(&self) -> impl Iterator<Item = u32> + '_ {
        self.terms.iter().flat_map(|t| t.rolls.iter().copied())
    }
}

impl DiceExpr {
    pub fn parse(src: &str) -> Result<Self> {
        let cleaned: String = src
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect();
        if cleaned.is_empty() {
            return Err(PanelError::invalid_expr(src, "expression is empty"));
        }

        let mut terms = Vec::new();
        let mut rest = cleaned.as_str();
        let mut first = true;
        while !rest.is_empty() {
            let (negative, body_start) = match rest.as_bytes()[0] {
                b'+' => (false, 1),
                b'-' => (true, 1),
                _ if first => (false, 0),
                _ => return Err(PanelError::invalid_expr(src, "expected '+' or '-'")),
            };
            let body = &rest[body_start..];
            let end = body.find(['+', '-']).unwrap_or(body.len());
            terms.push(parse_term(src, &body[..end], negative)?);
            rest = &body[end..];
            first = false;
        }

        // Critical doubling included, every possible total must fit an i32.
        if worst_case(&terms) > i64::from(i32::MAX) {
            return Err(PanelError::invalid_expr(src, "total could overflow"));
        }
        Ok(Self { terms })
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn roll(&self, dice: &mut Dice) -> ExprRoll {
        let mut total: i64 = 0;
        let mut out = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            let roll = match *term {
                Term::Dice { count, sides, .. } => {
                    let rolls: Vec<u32> = (0..count).map(|_| dice.roll(sides)).collect();
                    let sum: i64 = rolls.iter().map(|&r| i64::from(r)).sum();
                    TermRoll { term: *term, rolls, subtotal: clamp_i32(sum * i64::from(term.sign())) }
                }
                Term::Flat { value } => TermRoll { term: *term, rolls: vec![], subtotal: value },
            };
            total += i64::from(roll.subtotal);
            out.push(roll);
        }
        let total = clamp_i32(total);
        let expr = self.to_string();
        debug!(%expr, total, "rolled expression");
        ExprRoll { expr, terms: out, total }
    }

    /// Doubles the dice count of every dice term; flat terms are untouched.
    /// The doubled count may exceed `MAX_DICE_PER_TERM`, so roll the result
    /// directly rather than re-parsing its text.
    pub fn critified(&self) -> Self {
        let terms = self
            .terms
            .iter()
            .map(|t| match *t {
                Term::Dice { negative, count, sides } => Term::Dice {
                    negative,
                    count: count.saturating_mul(2),
                    sides,
                },
                flat => flat,
            })
            .collect();
        Self { terms }
    }
}

/// Largest magnitude any roll of `terms`, or of its critified form, can reach.
fn worst_case(terms: &[Term]) -> i64 {
    terms
        .iter()
        .map(|t| match *t {
            Term::Dice { count, sides, .. } => 2 * i64::from(count) * i64::from(sides),
            Term::Flat { value } => i64::from(value).abs(),
        })
        .sum()
}

fn clamp_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn parse_term(src: &str, body: &str, negative: bool) -> Result<Term> {
    if body.is_empty() {
        return Err(PanelError::invalid_expr(src, "missing term after sign"));
    }
    match body.split_once('d') {
        Some((count, sides)) => {
            let count = if count.is_empty() { 1 } else { parse_number(src, count)? };
            if count > MAX_DICE_PER_TERM {
                return Err(PanelError::invalid_expr(
                    src,
                    format!("at most {MAX_DICE_PER_TERM} dice per term"),
                ));
            }
            if sides.is_empty() {
                return Err(PanelError::invalid_expr(src, format!("'{body}' has no die size")));
            }
            let sides = parse_number(src, sides)?;
            if sides == 0 {
                return Err(PanelError::invalid_expr(src, "dice need at least one side"));
            }
            if sides > MAX_SIDES {
                return Err(PanelError::invalid_expr(
                    src,
                    format!("at most {MAX_SIDES} sides per die"),
                ));
            }
            Ok(Term::Dice { negative, count, sides })
        }
        None => {
            let magnitude = parse_number(src, body)?;
            let value = i32::try_from(magnitude)
                .map_err(|_| PanelError::invalid_expr(src, format!("'{body}' is too large")))?;
            Ok(Term::Flat { value: if negative { -value } else { value } })
        }
    }
}

fn parse_number(src: &str, digits: &str) -> Result<u32> {
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PanelError::invalid_expr(src, format!("'{digits}' is not a number")));
    }
    digits
        .parse()
        .map_err(|_| PanelError::invalid_expr(src, format!("'{digits}' is too large")))
}

impl FromStr for DiceExpr {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            match *term {
                Term::Dice { negative, count, sides } => {
                    if negative {
                        f.write_str("-")?;
                    } else if i > 0 {
                        f.write_str("+")?;
                    }
                    write!(f, "{count}d{sides}")?;
                }
                Term::Flat { value } => {
                    if value < 0 {
                        write!(f, "{value}")?;
                    } else if i > 0 {
                        write!(f, "+{value}")?;
                    } else {
                        write!(f, "{value}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

pub fn roll_expr(src: &str, dice: &mut Dice) -> Result<ExprRoll> {
    Ok(DiceExpr::parse(src)?.roll(dice))
}

/// Critical-hit damage: `critify("1d8+3") == "2d8+3"`.
pub fn critify(src: &str) -> Result<String> {
    Ok(DiceExpr::parse(src)?.critified().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_binds_to_following_term() {
        let e = DiceExpr::parse("2d6-1d4+3").unwrap();
        assert_eq!(
            e.terms(),
            &[
                Term::Dice { negative: false, count: 2, sides: 6 },
                Term::Dice { negative: true, count: 1, sides: 4 },
                Term::Flat { value: 3 },
            ]
        );
    }

    #[test]
    fn count_defaults_to_one() {
        let e = DiceExpr::parse("D20 + 5").unwrap();
        assert_eq!(e.to_string(), "1d20+5");
    }

    #[test]
    fn leading_minus_on_flat() {
        let e = DiceExpr::parse("-2+1d4").unwrap();
        assert_eq!(e.to_string(), "-2+1d4");
    }

    #[test]
    fn rejects_garbage() {
        for bad in ["", "   ", "2x6", "d", "1d", "++3", "1d6+", "3d0", "abc"] {
            assert!(
                matches!(DiceExpr::parse(bad), Err(PanelError::InvalidExpression { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
