//! Flat-file JSON persistence: one pretty-printed document per entity under
//! `<data_dir>/{characters,encounters,monsters}/<id>.json`.
//!
//! Loads are forgiving: a missing or corrupt document reads as `None`.
//! There is no locking; two writers on the same file race and the last one wins.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{info, warn};

use crate::character::Character;
use crate::encounter::Encounter;
use crate::error::{PanelError, Result};
use crate::monster::Monster;

const CHARACTERS: &str = "characters";
const ENCOUNTERS: &str = "encounters";
const MONSTERS: &str = "monsters";
const PORTRAITS: &str = "portraits";
pub(crate) const SESSION_FILE: &str = "session.json";

/// Ids name files, so they are limited to ASCII letters, digits, `-` and `_`.
pub fn validate_id(id: &str) -> Result<&str> {
    let ok = !id.is_empty()
        && id.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if ok { Ok(id) } else { Err(PanelError::InvalidId(id.to_string())) }
}

/// Fresh opaque id: 10 lowercase hex characters.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..10].to_string()
}

#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = data_dir.into();
        for dir in [CHARACTERS, ENCOUNTERS, MONSTERS, PORTRAITS] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|e| PanelError::io(&path, e))?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /* ---------------- characters ---------------- */

    pub fn list_character_ids(&self) -> Result<Vec<String>> {
        list_ids(&self.root.join(CHARACTERS))
    }

    pub fn load_character(&self, id: &str) -> Option<Character> {
        load_json(&self.load_path(CHARACTERS, id)?)
    }

    pub fn save_character(&self, ch: &Character) -> Result<()> {
        ch.validate()?;
        save_json(&self.doc_path(CHARACTERS, &ch.id)?, ch)?;
        info!(id = %ch.id, name = %ch.character_name, "saved character");
        Ok(())
    }

    /// Removes the sheet, the portrait it references (only inside the data
    /// directory) and `portraits/<id>.png`. Returns whether anything was removed.
    pub fn delete_character(&self, id: &str) -> Result<bool> {
        let doc = self.doc_path(CHARACTERS, id)?;
        let portrait = self.portrait_path(id)?;
        let mut removed = false;

        if doc.exists() {
            let referenced = load_json::<Character>(&doc)
                .and_then(|ch| ch.portrait_path)
                .and_then(|p| self.inside_data_dir(Path::new(&p)));
            remove_file(&doc)?;
            removed = true;
            if let Some(portrait) = referenced {
                removed |= remove_file(&portrait)?;
            }
        }

        removed |= remove_file(&portrait)?;
        if removed {
            info!(%id, "deleted character");
        }
        Ok(removed)
    }

    pub fn portrait_path(&self, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(PORTRAITS).join(format!("{}.png", validate_id(id)?)))
    }

    fn inside_data_dir(&self, candidate: &Path) -> Option<PathBuf> {
        let resolved = candidate.canonicalize().ok()?;
        let root = self.root.canonicalize().ok()?;
        resolved.starts_with(&root).then_some(resolved)
    }

    /* ---------------- encounters ---------------- */

    pub fn list_encounter_ids(&self) -> Result<Vec<String>> {
        list_ids(&self.root.join(ENCOUNTERS))
    }

    /// The turn index is pulled back into range in case the file was edited by hand.
    pub fn load_encounter(&self, id: &str) -> Option<Encounter> {
        let mut enc: Encounter = load_json(&self.load_path(ENCOUNTERS, id)?)?;
        enc.normalize_turn();
        Some(enc)
    }

    pub fn save_encounter(&self, enc: &Encounter) -> Result<()> {
        save_json(&self.doc_path(ENCOUNTERS, &enc.id)?, enc)?;
        info!(id = %enc.id, title = %enc.title, "saved encounter");
        Ok(())
    }

    pub fn delete_encounter(&self, id: &str) -> Result<bool> {
        remove_file(&self.doc_path(ENCOUNTERS, id)?)
    }

    /* ---------------- monsters ---------------- */

    pub fn list_monster_ids(&self) -> Result<Vec<String>> {
        list_ids(&self.root.join(MONSTERS))
    }

    pub fn load_monster(&self, id: &str) -> Option<Monster> {
        load_json(&self.load_path(MONSTERS, id)?)
    }

    pub fn save_monster(&self, m: &Monster) -> Result<()> {
        m.abilities.validate()?;
        save_json(&self.doc_path(MONSTERS, &m.id)?, m)?;
        info!(id = %m.id, name = %m.name, "saved monster");
        Ok(())
    }

    pub fn delete_monster(&self, id: &str) -> Result<bool> {
        remove_file(&self.doc_path(MONSTERS, id)?)
    }

    /* ---------------- session ---------------- */

    pub(crate) fn load_document<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        load_json(&self.root.join(name))
    }

    pub(crate) fn save_document<T: Serialize>(&self, name: &str, value: &T) -> Result<()> {
        save_json(&self.root.join(name), value)
    }

    fn doc_path(&self, collection: &str, id: &str) -> Result<PathBuf> {
        Ok(self.root.join(collection).join(format!("{}.json", validate_id(id)?)))
    }

    /// Loads treat a malformed id like a missing document.
    fn load_path(&self, collection: &str, id: &str) -> Option<PathBuf> {
        match self.doc_path(collection, id) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(error = %e, "rejected id");
                None
            }
        }
    }
}

fn list_ids(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(PanelError::io(dir, e)),
    };
    let mut ids: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    ids.sort();
    Ok(ids)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable document");
            return None;
        }
    };
    match serde_json::from_str(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt document treated as missing");
            None
        }
    }
}

fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).map_err(|e| PanelError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(|e| PanelError::io(path, e))
}

fn remove_file(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PanelError::io(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_ten_hex_chars() {
        let id = new_id();
        assert_eq!(id.len(), 10);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
