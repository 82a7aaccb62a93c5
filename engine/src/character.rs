use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PanelError, Result};
use crate::{ability_mod, proficiency_bonus};

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 30;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Ability { Str, Dex, Con, Int, Wis, Cha }

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Str,
        Ability::Dex,
        Ability::Con,
        Ability::Int,
        Ability::Wis,
        Ability::Cha,
    ];

    pub fn abbrev(self) -> &'static str {
        match self {
            Ability::Str => "STR",
            Ability::Dex => "DEX",
            Ability::Con => "CON",
            Ability::Int => "INT",
            Ability::Wis => "WIS",
            Ability::Cha => "CHA",
        }
    }
}

impl FromStr for Ability {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "str" | "strength" => Ok(Ability::Str),
            "dex" | "dexterity" => Ok(Ability::Dex),
            "con" | "constitution" => Ok(Ability::Con),
            "int" | "intelligence" => Ok(Ability::Int),
            "wis" | "wisdom" => Ok(Ability::Wis),
            "cha" | "charisma" => Ok(Ability::Cha),
            _ => Err(PanelError::NotFound { kind: "ability", id: s.to_string() }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    Acrobatics,
    AnimalHandling,
    Arcana,
    Athletics,
    Deception,
    History,
    Insight,
    Intimidation,
    Investigation,
    Medicine,
    Nature,
    Perception,
    Performance,
    Persuasion,
    Religion,
    SleightOfHand,
    Stealth,
    Survival,
}

impl Skill {
    pub const ALL: [Skill; 18] = [
        Skill::Acrobatics,
        Skill::AnimalHandling,
        Skill::Arcana,
        Skill::Athletics,
        Skill::Deception,
        Skill::History,
        Skill::Insight,
        Skill::Intimidation,
        Skill::Investigation,
        Skill::Medicine,
        Skill::Nature,
        Skill::Perception,
        Skill::Performance,
        Skill::Persuasion,
        Skill::Religion,
        Skill::SleightOfHand,
        Skill::Stealth,
        Skill::Survival,
    ];

    pub fn ability(self) -> Ability {
        use Skill::*;
        match self {
            Athletics => Ability::Str,
            Acrobatics | SleightOfHand | Stealth => Ability::Dex,
            Arcana | History | Investigation | Nature | Religion => Ability::Int,
            AnimalHandling | Insight | Medicine | Perception | Survival => Ability::Wis,
            Deception | Intimidation | Performance | Persuasion => Ability::Cha,
        }
    }

    /// Name as printed on the sheet, e.g. "Sleight of Hand".
    pub fn name(self) -> &'static str {
        use Skill::*;
        match self {
            Acrobatics => "Acrobatics",
            AnimalHandling => "Animal Handling",
            Arcana => "Arcana",
            Athletics => "Athletics",
            Deception => "Deception",
            History => "History",
            Insight => "Insight",
            Intimidation => "Intimidation",
            Investigation => "Investigation",
            Medicine => "Medicine",
            Nature => "Nature",
            Perception => "Perception",
            Performance => "Performance",
            Persuasion => "Persuasion",
            Religion => "Religion",
            SleightOfHand => "Sleight of Hand",
            Stealth => "Stealth",
            Survival => "Survival",
        }
    }
}

impl FromStr for Skill {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted: String = s.chars().filter(|c| c.is_alphabetic()).collect();
        Skill::ALL
            .into_iter()
            .find(|sk| {
                let name: String = sk.name().chars().filter(|c| c.is_alphabetic()).collect();
                name.eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| PanelError::NotFound { kind: "skill", id: s.to_string() })
    }
}

/// What a sheet roll tests: a raw ability, a saving throw or a skill.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckTarget {
    Ability(Ability),
    Save(Ability),
    Skill(Skill),
}

impl CheckTarget {
    /// Skill names are tried first unless `save` is set.
    pub fn parse(name: &str, save: bool) -> Result<Self> {
        if !save {
            if let Ok(skill) = name.parse::<Skill>() {
                return Ok(CheckTarget::Skill(skill));
            }
        }
        let ability = name.parse::<Ability>().map_err(|_| PanelError::NotFound {
            kind: if save { "ability" } else { "ability or skill" },
            id: name.to_string(),
        })?;
        Ok(if save { CheckTarget::Save(ability) } else { CheckTarget::Ability(ability) })
    }

    /// "DEX Check", "WIS Save", "Stealth Check".
    pub fn label(self) -> String {
        match self {
            CheckTarget::Ability(a) => format!("{} Check", a.abbrev()),
            CheckTarget::Save(a) => format!("{} Save", a.abbrev()),
            CheckTarget::Skill(sk) => format!("{} Check", sk.name()),
        }
    }
}

fn default_score() -> i32 {
    10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    #[serde(rename = "str_score", default = "default_score")]
    pub str_: i32,
    #[serde(rename = "dex_score", default = "default_score")]
    pub dex: i32,
    #[serde(rename = "con_score", default = "default_score")]
    pub con: i32,
    #[serde(rename = "int_score", default = "default_score")]
    pub int_: i32,
    #[serde(rename = "wis_score", default = "default_score")]
    pub wis: i32,
    #[serde(rename = "cha_score", default = "default_score")]
    pub cha: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self { str_: 10, dex: 10, con: 10, int_: 10, wis: 10, cha: 10 }
    }
}

impl AbilityScores {
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Str => self.str_,
            Ability::Dex => self.dex,
            Ability::Con => self.con,
            Ability::Int => self.int_,
            Ability::Wis => self.wis,
            Ability::Cha => self.cha,
        }
    }

    pub fn set(&mut self, ability: Ability, score: i32) {
        let slot = match ability {
            Ability::Str => &mut self.str_,
            Ability::Dex => &mut self.dex,
            Ability::Con => &mut self.con,
            Ability::Int => &mut self.int_,
            Ability::Wis => &mut self.wis,
            Ability::Cha => &mut self.cha,
        };
        *slot = score;
    }

    pub fn mod_of(&self, ability: Ability) -> i32 {
        ability_mod(self.get(ability))
    }

    pub fn validate(&self) -> Result<()> {
        for ability in Ability::ALL {
            let score = self.get(ability);
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(PanelError::InvalidAbilityScore { ability: ability.abbrev(), score });
            }
        }
        Ok(())
    }
}

fn default_weapon_name() -> String {
    "Longsword".into()
}

fn default_damage() -> String {
    "1d8+0".into()
}

fn default_damage_type() -> String {
    "slashing".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(default = "default_weapon_name")]
    pub name: String,
    /// Total attack bonus, ready to add to the d20.
    #[serde(default)]
    pub attack_bonus: i32,
    /// Damage expression; may have several terms, e.g. `2d6+1d4+3`.
    #[serde(default = "default_damage")]
    pub damage: String,
    #[serde(default = "default_damage_type")]
    pub damage_type: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for Weapon {
    fn default() -> Self {
        Self {
            name: default_weapon_name(),
            attack_bonus: 0,
            damage: default_damage(),
            damage_type: default_damage_type(),
            notes: String::new(),
        }
    }
}

fn default_level() -> i32 {
    1
}

fn default_ac() -> i32 {
    10
}

fn default_speed() -> i32 {
    30
}

fn default_hp() -> i32 {
    10
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub character_name: String,
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub class_and_level: String,
    #[serde(default)]
    pub background: String,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub alignment: String,
    #[serde(default)]
    pub xp: String,

    #[serde(default)]
    pub personality_traits: String,
    #[serde(default)]
    pub ideals: String,
    #[serde(default)]
    pub bonds: String,
    #[serde(default)]
    pub flaws: String,

    /// 0 means "derive from level".
    #[serde(default)]
    pub prof_bonus: i32,

    #[serde(flatten)]
    pub abilities: AbilityScores,

    #[serde(default = "default_ac")]
    pub ac: i32,
    #[serde(default = "default_speed")]
    pub speed: i32,
    #[serde(default = "default_hp")]
    pub max_hp: i32,
    #[serde(default = "default_hp")]
    pub current_hp: i32,
    #[serde(default)]
    pub temp_hp: i32,
    #[serde(default)]
    pub initiative_bonus: i32,

    #[serde(default)]
    pub save_proficiencies: Vec<String>,
    #[serde(default)]
    pub skill_proficiencies: Vec<String>,
    /// Bonuses exactly as printed on an imported sheet, e.g. `{"Perception": 6}`.
    #[serde(default)]
    pub skill_mods: IndexMap<String, i32>,
    #[serde(default)]
    pub save_mods: IndexMap<String, i32>,

    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub portrait_path: Option<String>,
    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub raw_pdf_fields: IndexMap<String, String>,
}

impl Character {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            character_name: name.into(),
            player_name: String::new(),
            species: String::new(),
            class_and_level: String::new(),
            background: String::new(),
            level: 1,
            alignment: String::new(),
            xp: String::new(),
            personality_traits: String::new(),
            ideals: String::new(),
            bonds: String::new(),
            flaws: String::new(),
            prof_bonus: 0,
            abilities: AbilityScores::default(),
            ac: default_ac(),
            speed: default_speed(),
            max_hp: default_hp(),
            current_hp: default_hp(),
            temp_hp: 0,
            initiative_bonus: 0,
            save_proficiencies: Vec::new(),
            skill_proficiencies: Vec::new(),
            skill_mods: IndexMap::new(),
            save_mods: IndexMap::new(),
            weapons: Vec::new(),
            equipment: Vec::new(),
            portrait_path: None,
            notes: String::new(),
            raw_pdf_fields: IndexMap::new(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.abilities.validate()
    }

    pub fn proficiency(&self) -> i32 {
        if self.prof_bonus > 0 {
            self.prof_bonus
        } else {
            proficiency_bonus(self.level)
        }
    }

    pub fn ability_mod(&self, ability: Ability) -> i32 {
        self.abilities.mod_of(ability)
    }

    pub fn is_save_proficient(&self, ability: Ability) -> bool {
        self.save_proficiencies
            .iter()
            .any(|s| s.parse::<Ability>().is_ok_and(|a| a == ability))
    }

    pub fn is_skill_proficient(&self, skill: Skill) -> bool {
        self.skill_proficiencies
            .iter()
            .any(|s| s.parse::<Skill>().is_ok_and(|sk| sk == skill))
    }

    /// Sheet bonus when one was imported, otherwise modifier plus proficiency.
    pub fn save_mod(&self, ability: Ability) -> i32 {
        if let Some(&printed) = self.save_mods.get(ability.abbrev()) {
            return printed;
        }
        let prof = if self.is_save_proficient(ability) { self.proficiency() } else { 0 };
        self.ability_mod(ability) + prof
    }

    pub fn skill_mod(&self, skill: Skill) -> i32 {
        if let Some(&printed) = self.skill_mods.get(skill.name()) {
            return printed;
        }
        let prof = if self.is_skill_proficient(skill) { self.proficiency() } else { 0 };
        self.ability_mod(skill.ability()) + prof
    }

    pub fn check_mod(&self, target: CheckTarget) -> i32 {
        match target {
            CheckTarget::Ability(a) => self.ability_mod(a),
            CheckTarget::Save(a) => self.save_mod(a),
            CheckTarget::Skill(sk) => self.skill_mod(sk),
        }
    }

    pub fn find_weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }
}
