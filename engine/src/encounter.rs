use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::character::Character;
use crate::error::{PanelError, Result};
use crate::initiative::{self, next_turn, prev_turn};
use crate::monster::Monster;
use crate::Dice;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatantKind {
    #[default]
    #[serde(rename = "PC")]
    Pc,
    Monster,
    #[serde(rename = "NPC")]
    Npc,
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CombatantKind::Pc => "PC",
            CombatantKind::Monster => "Monster",
            CombatantKind::Npc => "NPC",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    #[serde(default)]
    pub kind: CombatantKind,
    #[serde(default)]
    pub initiative_bonus: i32,
    #[serde(default)]
    pub ac: Option<i32>,
    #[serde(default)]
    pub max_hp: Option<i32>,
    #[serde(default)]
    pub hp: Option<i32>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub initiative_roll: Option<i32>,
    #[serde(default)]
    pub initiative_total: Option<i32>,
}

impl Combatant {
    pub fn new(
        name: impl Into<String>,
        kind: CombatantKind,
        initiative_bonus: i32,
        ac: Option<i32>,
        hp: Option<i32>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            initiative_bonus,
            ac,
            max_hp: hp,
            hp,
            conditions: Vec::new(),
            initiative_roll: None,
            initiative_total: None,
        }
    }

    pub fn from_character(ch: &Character) -> Self {
        Self {
            max_hp: Some(ch.max_hp),
            hp: Some(ch.current_hp),
            ..Self::new(&ch.character_name, CombatantKind::Pc, ch.initiative_bonus, Some(ch.ac), None)
        }
    }

    /// Initiative bonus comes from the monster's DEX modifier.
    pub fn from_monster(m: &Monster) -> Self {
        Self {
            max_hp: Some(m.max_hp),
            hp: Some(m.current_hp),
            ..Self::new(
                &m.name,
                CombatantKind::Monster,
                m.abilities.mod_of(crate::Ability::Dex),
                Some(m.ac),
                None,
            )
        }
    }
}

fn default_title() -> String {
    "Encounter".into()
}

fn default_round() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub combatants: Vec<Combatant>,
    #[serde(default = "default_round")]
    pub round: u32,
    #[serde(default)]
    pub turn_index: usize,
}

impl Encounter {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            combatants: Vec::new(),
            round: 1,
            turn_index: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn add_combatant(&mut self, c: Combatant) {
        debug!(encounter = %self.id, name = %c.name, "combatant joins");
        self.combatants.push(c);
    }

    pub fn remove_combatant(&mut self, index: usize) -> Result<Combatant> {
        if index >= self.combatants.len() {
            return Err(self.missing(index));
        }
        let removed = self.combatants.remove(index);
        if index < self.turn_index {
            self.turn_index -= 1;
        }
        self.normalize_turn();
        Ok(removed)
    }

    /// Rolls for everyone, sorts, and restarts at round 1.
    pub fn roll_initiative(&mut self, dice: &mut Dice) {
        initiative::roll_initiative(&mut self.combatants, dice);
        self.turn_index = 0;
        self.round = 1;
        info!(encounter = %self.id, combatants = self.combatants.len(), "initiative rolled");
    }

    /// Moves to the next combatant. Wrapping from the last slot to the first
    /// starts a new round.
    pub fn advance(&mut self) {
        let n = self.combatants.len();
        if n == 0 {
            return;
        }
        let old = self.turn_index;
        self.turn_index = next_turn(old, n);
        if self.turn_index == 0 && old == n - 1 {
            self.round += 1;
        }
        debug!(turn = self.turn_index, round = self.round, "advance");
    }

    /// Steps back one combatant; the round counter never decreases.
    pub fn retreat(&mut self) {
        self.turn_index = prev_turn(self.turn_index, self.combatants.len());
    }

    pub fn new_round(&mut self) {
        self.round += 1;
        self.turn_index = 0;
    }

    /// Resets round and turn, forgets initiative and conditions, keeps the list.
    pub fn clear_combat(&mut self) {
        self.round = 1;
        self.turn_index = 0;
        for c in &mut self.combatants {
            c.initiative_roll = None;
            c.initiative_total = None;
            c.conditions.clear();
        }
    }

    pub fn current(&self) -> Option<&Combatant> {
        self.combatants.get(self.turn_index)
    }

    /// Sets HP, clamped into `[0, max_hp]` when a maximum is known.
    pub fn set_hp(&mut self, index: usize, hp: i32) -> Result<i32> {
        let c = self.get_mut(index)?;
        let clamped = match c.max_hp {
            Some(max) => hp.clamp(0, max.max(0)),
            None => hp.max(0),
        };
        c.hp = Some(clamped);
        Ok(clamped)
    }

    /// Blank tags are ignored; returns whether a condition was added.
    pub fn add_condition(&mut self, index: usize, tag: &str) -> Result<bool> {
        let tag = tag.trim();
        let c = self.get_mut(index)?;
        if tag.is_empty() {
            return Ok(false);
        }
        c.conditions.push(tag.to_string());
        Ok(true)
    }

    pub fn clear_conditions(&mut self, index: usize) -> Result<()> {
        self.get_mut(index)?.conditions.clear();
        Ok(())
    }

    /// Pulls a turn index loaded from disk back into range.
    pub fn normalize_turn(&mut self) {
        let n = self.combatants.len();
        self.turn_index = if n == 0 { 0 } else { self.turn_index % n };
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Combatant> {
        if index >= self.combatants.len() {
            return Err(self.missing(index));
        }
        Ok(&mut self.combatants[index])
    }

    fn missing(&self, index: usize) -> PanelError {
        PanelError::NotFound {
            kind: "combatant",
            id: format!("#{} in {}", index, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(n: usize) -> Encounter {
        let mut enc = Encounter::new("e1", "Ambush");
        for i in 0..n {
            enc.add_combatant(Combatant::new(format!("c{i}"), CombatantKind::Npc, 0, None, Some(5)));
        }
        enc
    }

    #[test]
    fn retreat_never_touches_round() {
        let mut enc = party(3);
        enc.retreat();
        assert_eq!(enc.turn_index, 2);
        assert_eq!(enc.round, 1);
    }

    #[test]
    fn removing_before_cursor_keeps_same_combatant_active() {
        let mut enc = party(4);
        enc.turn_index = 2;
        enc.remove_combatant(0).unwrap();
        assert_eq!(enc.current().unwrap().name, "c2");
    }

    #[test]
    fn removing_last_active_wraps_to_zero() {
        let mut enc = party(3);
        enc.turn_index = 2;
        enc.remove_combatant(2).unwrap();
        assert_eq!(enc.turn_index, 0);
    }

    #[test]
    fn hp_is_clamped() {
        let mut enc = party(1);
        assert_eq!(enc.set_hp(0, 12).unwrap(), 5);
        assert_eq!(enc.set_hp(0, -3).unwrap(), 0);
        assert!(enc.set_hp(4, 1).is_err());
    }

    #[test]
    fn blank_condition_is_ignored() {
        let mut enc = party(1);
        assert!(!enc.add_condition(0, "   ").unwrap());
        assert!(enc.add_condition(0, " Prone ").unwrap());
        assert_eq!(enc.combatants[0].conditions, ["Prone"]);
    }
}
