//! Best-effort import of a filled-in character sheet PDF.
//!
//! Field lookup tries the Portuguese sheet names first, then the English
//! official sheet. Anything missing falls back to the `Character` defaults.

use encoding_rs::{Encoding, WINDOWS_1252};
use indexmap::IndexMap;
use lopdf::{Dictionary, Document, Object};
use tracing::{debug, warn};

use crate::character::{Character, Weapon, MAX_SCORE, MIN_SCORE};
use crate::error::{PanelError, Result};
use crate::Ability;

const MAX_FIELD_DEPTH: usize = 32;
const FALLBACK_NAME: &str = "Unnamed";
const FALLBACK_DAMAGE: &str = "1d6+0";
const UNKNOWN_DAMAGE_TYPE: &str = "—";
const FEET_PER_METRE: f64 = 3.28084;

const SKILLS_PT: &[(&str, &str)] = &[
    ("Atletismo", "Athletics"),
    ("Acrobacia", "Acrobatics"),
    ("Prestidigitação", "Sleight of Hand"),
    ("Furtividade", "Stealth"),
    ("Arcanismo", "Arcana"),
    ("História", "History"),
    ("Investigação", "Investigation"),
    ("Natureza", "Nature"),
    ("Religião", "Religion"),
    ("Adestrar Animais", "Animal Handling"),
    ("Intuição", "Insight"),
    ("Medicina", "Medicine"),
    ("Percepção", "Perception"),
    ("Sobrevivência", "Survival"),
    ("Enganação", "Deception"),
    ("Intimidação", "Intimidation"),
    ("Atuação", "Performance"),
    ("Persuasão", "Persuasion"),
];

const SAVES_PT: &[(&str, Ability)] = &[
    ("Força", Ability::Str),
    ("Destreza", Ability::Dex),
    ("Constituição", Ability::Con),
    ("Inteligência", Ability::Int),
    ("Sabedoria", Ability::Wis),
    ("Carisma", Ability::Cha),
];

const SKILL_BOX_MARKER: &str = "Perícia -";
const SAVE_BOX_MARKER: &str = "Teste de Resistência -";

/// Form fields pulled out of a PDF: text values by (trimmed) field name, and
/// the names of ticked checkboxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfFields {
    pub values: IndexMap<String, String>,
    pub checked: Vec<String>,
}

impl PdfFields {
    fn first(&self, names: &[&str]) -> Option<&str> {
        names
            .iter()
            .filter_map(|n| self.values.get(*n))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

pub fn extract_pdf_fields(bytes: &[u8]) -> Result<PdfFields> {
    let doc = Document::load_mem(bytes).map_err(|e| PanelError::Pdf(e.to_string()))?;
    let catalog = doc
        .trailer
        .get(b"Root")
        .ok()
        .and_then(|o| as_dict(&doc, o))
        .ok_or_else(|| PanelError::Pdf("missing document catalog".into()))?;
    let fields = catalog
        .get(b"AcroForm")
        .ok()
        .and_then(|o| as_dict(&doc, o))
        .and_then(|form| form.get(b"Fields").ok())
        .and_then(|o| resolve(&doc, o))
        .ok_or_else(|| PanelError::Pdf("no form fields".into()))?;

    let mut out = PdfFields::default();
    if let Object::Array(items) = fields {
        for item in items {
            walk_field(&doc, item, "", &mut out, 0);
        }
    }
    debug!(values = out.values.len(), checked = out.checked.len(), "extracted form fields");
    Ok(out)
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).ok(),
        other => Some(other),
    }
}

fn as_dict<'a>(doc: &'a Document, obj: &'a Object) -> Option<&'a Dictionary> {
    match resolve(doc, obj)? {
        Object::Dictionary(d) => Some(d),
        _ => None,
    }
}

/// PDF text strings are UTF-16BE with a BOM, or PDFDocEncoding (close enough
/// to Windows-1252 for form values).
fn decode_text(bytes: &[u8]) -> String {
    if let Some((enc, bom_len)) = Encoding::for_bom(bytes) {
        let (cow, _) = enc.decode_without_bom_handling(&bytes[bom_len..]);
        return cow.into_owned();
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned(),
    }
}

fn walk_field(doc: &Document, obj: &Object, parent: &str, out: &mut PdfFields, depth: usize) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }
    let Some(field) = as_dict(doc, obj) else {
        return;
    };

    let partial = match field.get(b"T").ok().and_then(|o| resolve(doc, o)) {
        Some(Object::String(bytes, _)) => Some(decode_text(bytes)),
        _ => None,
    };
    let name = match partial {
        Some(t) if parent.is_empty() => t,
        Some(t) => format!("{parent}.{t}"),
        None => parent.to_string(),
    };

    if let Some(Object::Array(kids)) = field.get(b"Kids").ok().and_then(|o| resolve(doc, o)) {
        for kid in kids {
            walk_field(doc, kid, &name, out, depth + 1);
        }
    }

    let key = name.trim().to_string();
    match field.get(b"V").ok().and_then(|o| resolve(doc, o)) {
        Some(Object::String(bytes, _)) if !key.is_empty() => {
            out.values.insert(key, decode_text(bytes).trim().to_string());
        }
        Some(Object::Name(value)) if !key.is_empty() && value.as_slice() != b"Off" => {
            if !out.checked.contains(&key) {
                out.checked.push(key);
            }
        }
        _ => {}
    }
}

/// First signed integer in `s`, ignoring spaces: "+5" → 5, "CA 16" → 16.
fn first_int(s: &str) -> Option<i32> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = compact.as_bytes();
    let start = bytes.iter().position(|b| b.is_ascii_digit())?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| start + n);
    let magnitude: i32 = compact[start..end].parse().ok()?;
    let negative = start > 0 && bytes[start - 1] == b'-';
    Some(if negative { -magnitude } else { magnitude })
}

fn int_or(value: Option<&str>, default: i32) -> i32 {
    value.and_then(first_int).unwrap_or(default)
}

/// Last number in "Guerreiro 3" style text; 1 when there is none.
fn parse_level(class_level: &str) -> i32 {
    class_level
        .split(|c: char| !c.is_ascii_digit())
        .filter(|s| !s.is_empty())
        .last()
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
}

/// Speed in feet. Metric values ("9 m", "7,5m") convert to the nearest 5 ft.
fn parse_speed(raw: &str) -> i32 {
    let s: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if s.is_empty() {
        return 30;
    }
    if s.contains('m') {
        let number: String = s
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        if let Ok(metres) = number.trim_end_matches('.').parse::<f64>() {
            let feet = metres * FEET_PER_METRE;
            return ((feet / 5.0).round() * 5.0) as i32;
        }
    }
    first_int(&s).unwrap_or(30)
}

/// Splits "1d8+3 cortante" into ("1d8+3", "cortante").
fn split_damage(raw: &str) -> (String, String) {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, 'd' | 'D' | '+' | '-') || c.is_whitespace()))
        .unwrap_or(raw.len());
    let expr: String = raw[..split].chars().filter(|c| !c.is_whitespace()).collect();
    let kind = raw[split..].trim();
    let expr = if expr.is_empty() {
        raw.chars().filter(|c| !c.is_whitespace()).collect()
    } else {
        expr
    };
    let kind = if kind.is_empty() { UNKNOWN_DAMAGE_TYPE } else { kind };
    (expr, kind.to_string())
}

fn score(fields: &PdfFields, names: &[&str]) -> i32 {
    int_or(fields.first(names), 10).clamp(MIN_SCORE, MAX_SCORE)
}

fn weapon_slot(fields: &PdfFields, slot: usize) -> Option<Weapon> {
    let (name_en, bonus_en, damage_en) = match slot {
        1 => ("Wpn Name", "Wpn1 AtkBonus", "Wpn1 Damage"),
        2 => ("Wpn Name 2", "Wpn2 AtkBonus", "Wpn2 Damage"),
        _ => ("Wpn Name 3", "Wpn3 AtkBonus", "Wpn3 Damage"),
    };
    let name_pt = format!("Arma {slot}");
    let bonus_pt = format!("Bônus de Ataque {slot}");
    let damage_pt = format!("Dano / Tipo {slot}");

    let name = fields.first(&[name_pt.as_str(), name_en])?.to_string();
    let attack_bonus = int_or(fields.first(&[bonus_pt.as_str(), bonus_en]), 0);
    let (damage, damage_type) = split_damage(fields.first(&[damage_pt.as_str(), damage_en]).unwrap_or(""));
    Some(Weapon {
        name,
        attack_bonus,
        damage: if damage.is_empty() { FALLBACK_DAMAGE.to_string() } else { damage },
        damage_type,
        notes: String::new(),
    })
}

fn checked_with_marker<'a>(
    fields: &'a PdfFields,
    marker: &'static str,
) -> impl Iterator<Item = &'a str> + 'a {
    fields
        .checked
        .iter()
        .filter(|name| name.starts_with("Check Box"))
        .filter_map(move |name| name.find(marker).map(|at| name[at + marker.len()..].trim()))
}

pub fn character_from_fields(fields: &PdfFields, id: impl Into<String>) -> Character {
    let name = fields.first(&["Nome do Personagem", "CharacterName"]).unwrap_or(FALLBACK_NAME);
    let mut ch = Character::new(id, name);

    ch.class_and_level = fields.first(&["Classe & Nível", "ClassLevel"]).unwrap_or("").to_string();
    ch.level = parse_level(&ch.class_and_level);
    ch.player_name = fields.first(&["Nome do Jogador", "PlayerName"]).unwrap_or("").to_string();
    ch.species = fields.first(&["Raça", "Race"]).unwrap_or("").to_string();
    ch.background = fields.first(&["Antecedentes", "Background"]).unwrap_or("").to_string();
    ch.alignment = fields.first(&["Tendência", "Alignment"]).unwrap_or("").to_string();

    ch.abilities.str_ = score(fields, &["Força", "STR"]);
    ch.abilities.dex = score(fields, &["Destreza", "DEX"]);
    ch.abilities.con = score(fields, &["Constituição", "CON"]);
    ch.abilities.int_ = score(fields, &["Inteligência", "INT"]);
    ch.abilities.wis = score(fields, &["Sabedoria", "WIS"]);
    ch.abilities.cha = score(fields, &["Carisma", "CHA"]);

    ch.ac = int_or(fields.first(&["Classe de Armadura", "AC"]), 10);
    ch.speed = parse_speed(fields.first(&["Deslocamento", "Speed"]).unwrap_or(""));
    ch.max_hp = int_or(fields.first(&["Pontos de Vida Máximo", "HPMax"]), 10);
    ch.current_hp = match int_or(fields.first(&["Pontos de Vida Atual", "HPCurrent"]), ch.max_hp) {
        0 => ch.max_hp,
        hp => hp,
    };
    ch.temp_hp = int_or(fields.first(&["Pontos de Vida Temporário", "HPTemp"]), 0);
    ch.initiative_bonus = int_or(fields.first(&["Iniciativa", "Initiative"]), 0);

    ch.weapons = (1..=3).filter_map(|slot| weapon_slot(fields, slot)).collect();
    ch.equipment = fields
        .first(&["Equipamento", "Equipment"])
        .unwrap_or("")
        .split(['\n', '\r', ',', ';'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect();

    let mut skills: Vec<String> = checked_with_marker(fields, SKILL_BOX_MARKER)
        .filter_map(|pt| SKILLS_PT.iter().find(|(k, _)| *k == pt).map(|(_, en)| en.to_string()))
        .collect();
    skills.sort();
    skills.dedup();
    ch.skill_proficiencies = skills;

    let mut saves: Vec<String> = checked_with_marker(fields, SAVE_BOX_MARKER)
        .filter_map(|pt| SAVES_PT.iter().find(|(k, _)| *k == pt).map(|(_, a)| a.abbrev().to_string()))
        .collect();
    saves.sort();
    saves.dedup();
    ch.save_proficiencies = saves;

    ch.raw_pdf_fields = fields.values.clone();
    ch
}

/// Never fails: unreadable PDFs or PDFs without a form give a default character.
pub fn import_character_from_pdf(bytes: &[u8], id: impl Into<String>) -> Character {
    let id = id.into();
    match extract_pdf_fields(bytes) {
        Ok(fields) => {
            if fields.values.is_empty() && fields.checked.is_empty() {
                warn!(%id, "PDF form is empty; using a default character");
            }
            character_from_fields(&fields, id)
        }
        Err(e) => {
            warn!(%id, error = %e, "PDF import failed; using a default character");
            Character::new(id, FALLBACK_NAME)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_int_handles_signs_and_noise() {
        assert_eq!(first_int("+5"), Some(5));
        assert_eq!(first_int(" - 2"), Some(-2));
        assert_eq!(first_int("CA 16 (escudo)"), Some(16));
        assert_eq!(first_int("none"), None);
    }

    #[test]
    fn level_is_last_number() {
        assert_eq!(parse_level("Guerreiro 1 / Mago 3"), 3);
        assert_eq!(parse_level("Bardo"), 1);
    }

    #[test]
    fn metric_speed_rounds_to_five_feet() {
        assert_eq!(parse_speed("9 m"), 30);
        assert_eq!(parse_speed("7,5m"), 25);
        assert_eq!(parse_speed("35 ft"), 35);
        assert_eq!(parse_speed(""), 30);
    }

    #[test]
    fn damage_splits_expression_and_type() {
        assert_eq!(split_damage("1d8 + 3 cortante"), ("1d8+3".into(), "cortante".into()));
        assert_eq!(split_damage("2d6"), ("2d6".into(), "—".into()));
    }

    #[test]
    fn utf16_field_names_decode() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Força".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&bytes), "Força");
    }
}
