use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::character::AbilityScores;
use crate::content::{builtin_monsters, SAMPLE_MONSTER};
use crate::error::{PanelError, Result};

fn default_action_name() -> String {
    "Attack".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterAction {
    #[serde(default = "default_action_name")]
    pub name: String,
    #[serde(default)]
    pub to_hit: Option<i32>,
    #[serde(default)]
    pub damage: Option<String>,
    #[serde(default)]
    pub damage_type: String,
    #[serde(default)]
    pub description: String,
}

impl MonsterAction {
    /// "Shortsword — 1d6+2 piercing"
    pub fn label(&self) -> String {
        match &self.damage {
            Some(dmg) => format!("{} — {} {}", self.name, dmg, self.damage_type)
                .trim_end()
                .to_string(),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub id: String,
    pub name: String,
    #[serde(default = "Monster::default_size")]
    pub size: String,
    #[serde(default = "Monster::default_type")]
    pub creature_type: String,
    #[serde(default = "Monster::default_alignment")]
    pub alignment: String,
    #[serde(default = "Monster::default_ac")]
    pub ac: i32,
    #[serde(default = "Monster::default_hp")]
    pub max_hp: i32,
    #[serde(default = "Monster::default_hp")]
    pub current_hp: i32,
    #[serde(default = "Monster::default_speed")]
    pub speed: String,
    #[serde(flatten)]
    pub abilities: AbilityScores,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub saves: Vec<String>,
    #[serde(default)]
    pub senses: String,
    #[serde(default)]
    pub languages: String,
    #[serde(default = "Monster::default_cr")]
    pub cr: String,
    #[serde(default)]
    pub traits_md: String,
    #[serde(default)]
    pub actions: Vec<MonsterAction>,
    #[serde(default)]
    pub notes_md: String,
}

impl Monster {
    fn default_size() -> String {
        "Medium".into()
    }
    fn default_type() -> String {
        "humanoid".into()
    }
    fn default_alignment() -> String {
        "unaligned".into()
    }
    fn default_ac() -> i32 {
        12
    }
    fn default_hp() -> i32 {
        7
    }
    fn default_speed() -> String {
        "30 ft.".into()
    }
    fn default_cr() -> String {
        "1/4".into()
    }

    /// The built-in homebrew hobgoblin scout, under a fresh id.
    pub fn sample(id: impl Into<String>) -> Result<Self> {
        let text = builtin_monsters()
            .get(SAMPLE_MONSTER)
            .copied()
            .ok_or_else(|| PanelError::NotFound { kind: "builtin monster", id: SAMPLE_MONSTER.into() })?;
        Self::from_json_text(text, id)
    }

    /// Parses a user-supplied monster document. `id` is used only when the
    /// document carries none.
    pub fn from_json_text(text: &str, id: impl Into<String>) -> Result<Self> {
        let mut value: Value = serde_json::from_str(text)?;
        if let Value::Object(map) = &mut value {
            map.entry("id").or_insert_with(|| Value::String(id.into()));
        }
        let monster: Monster = serde_json::from_value(value)?;
        monster.abilities.validate()?;
        Ok(monster)
    }

    pub fn find_action(&self, name: &str) -> Option<&MonsterAction> {
        self.actions.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_is_a_hobgoblin_with_two_actions() {
        let m = Monster::sample("abc123").unwrap();
        assert_eq!(m.id, "abc123");
        assert_eq!(m.ac, 15);
        assert_eq!(m.abilities.dex, 14);
        assert_eq!(m.actions.len(), 2);
        assert_eq!(m.actions[0].label(), "Shortsword — 1d6+2 piercing");
    }

    #[test]
    fn existing_id_is_kept() {
        let m = Monster::from_json_text(r#"{"id":"keep","name":"Rat"}"#, "fresh").unwrap();
        assert_eq!(m.id, "keep");
        assert_eq!(m.cr, "1/4");
        assert_eq!(m.max_hp, 7);
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let err = Monster::from_json_text(r#"{"name":"Titan","str_score":31}"#, "x").unwrap_err();
        assert!(matches!(err, PanelError::InvalidAbilityScore { ability: "STR", score: 31 }));
    }
}
