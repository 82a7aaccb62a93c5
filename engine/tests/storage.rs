use std::fs;

use rpgpanel::storage::new_id;
use rpgpanel::{Character, Combatant, CombatantKind, Encounter, Monster, PanelError, Session, Store};
use tempfile::TempDir;

fn store() -> (TempDir, Store) {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("data")).unwrap();
    (dir, store)
}

#[test]
fn open_creates_the_layout() {
    let (_dir, store) = store();
    for sub in ["characters", "encounters", "monsters", "portraits"] {
        assert!(store.root().join(sub).is_dir(), "{sub} missing");
    }
}

#[test]
fn ids_are_ten_hex_chars() {
    let id = new_id();
    assert_eq!(id.len(), 10);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_ne!(new_id(), id);
}

#[test]
fn character_survives_a_save_load_cycle() {
    let (_dir, store) = store();
    let mut ch = Character::new("abc123", "Brina");
    ch.abilities.str_ = 16;
    ch.skill_mods.insert("Athletics".into(), 5);
    store.save_character(&ch).unwrap();
    assert_eq!(store.load_character("abc123"), Some(ch));
}

#[test]
fn invalid_scores_are_not_saved() {
    let (_dir, store) = store();
    let mut ch = Character::new("bad", "Giant");
    ch.abilities.str_ = 31;
    assert!(matches!(
        store.save_character(&ch),
        Err(PanelError::InvalidAbilityScore { score: 31, .. })
    ));
    assert!(store.load_character("bad").is_none());
}

#[test]
fn missing_and_corrupt_documents_read_as_none() {
    let (_dir, store) = store();
    assert!(store.load_character("nope").is_none());
    fs::write(store.root().join("characters/broken.json"), "{ not json").unwrap();
    assert!(store.load_character("broken").is_none());
    fs::write(store.root().join("encounters/broken.json"), "[]").unwrap();
    assert!(store.load_encounter("broken").is_none());
}

#[test]
fn listings_are_sorted_and_skip_other_files() {
    let (_dir, store) = store();
    for id in ["zeta", "alpha", "mid"] {
        store.save_monster(&Monster::sample(id).unwrap()).unwrap();
    }
    fs::write(store.root().join("monsters/readme.txt"), "hi").unwrap();
    assert_eq!(store.list_monster_ids().unwrap(), ["alpha", "mid", "zeta"]);
}

#[test]
fn deleting_a_character_takes_its_portraits() {
    let (_dir, store) = store();
    let referenced = store.root().join("portraits/custom.jpg");
    fs::write(&referenced, b"jpg").unwrap();
    fs::write(store.portrait_path("p1").unwrap(), b"png").unwrap();

    let mut ch = Character::new("p1", "Pictured");
    ch.portrait_path = Some(referenced.to_string_lossy().into_owned());
    store.save_character(&ch).unwrap();

    assert!(store.delete_character("p1").unwrap());
    assert!(!referenced.exists());
    assert!(!store.portrait_path("p1").unwrap().exists());
    assert!(store.load_character("p1").is_none());
    assert!(!store.delete_character("p1").unwrap());
}

#[test]
fn portraits_outside_the_data_dir_are_left_alone() {
    let (dir, store) = store();
    let outside = dir.path().join("keep.png");
    fs::write(&outside, b"png").unwrap();

    let mut ch = Character::new("p2", "Careful");
    ch.portrait_path = Some(outside.to_string_lossy().into_owned());
    store.save_character(&ch).unwrap();
    store.delete_character("p2").unwrap();
    assert!(outside.exists());
}

#[test]
fn ids_cannot_leave_their_collection() {
    let (_dir, store) = store();
    store.save_monster(&Monster::sample("m1").unwrap()).unwrap();

    for bad in ["../monsters/m1", "..", "a/b", "", "m1.json", "x y"] {
        assert!(
            matches!(store.delete_character(bad), Err(PanelError::InvalidId(_))),
            "{bad:?} should be rejected"
        );
        assert!(store.load_character(bad).is_none());
        assert!(matches!(store.delete_encounter(bad), Err(PanelError::InvalidId(_))));
    }
    assert!(store.load_monster("m1").is_some());

    let sneaky = Character::new("../escape", "Sneaky");
    assert!(matches!(store.save_character(&sneaky), Err(PanelError::InvalidId(_))));
    assert!(!store.root().join("escape.json").exists());

    assert!(store.load_character("ok-id_2").is_none());
}

#[test]
fn encounter_turn_index_is_normalized_on_load() {
    let (_dir, store) = store();
    let mut enc = Encounter::new("e1", "Bridge");
    enc.add_combatant(Combatant::new("A", CombatantKind::Monster, 0, None, None));
    enc.add_combatant(Combatant::new("B", CombatantKind::Monster, 0, None, None));
    enc.turn_index = 7;
    store.save_encounter(&enc).unwrap();
    assert_eq!(store.load_encounter("e1").unwrap().turn_index, 1);
    assert!(store.delete_encounter("e1").unwrap());
    assert!(store.list_encounter_ids().unwrap().is_empty());
}

#[test]
fn session_persists_log_and_selection() {
    let (_dir, store) = store();
    let mut session = Session::load(&store, 3);
    for line in ["one", "two", "three", "four"] {
        session.push(line);
    }
    session.media.audio = Some("https://example.org/tavern.ogg".into());
    session.encounter_id = Some("e1".into());
    session.save(&store).unwrap();

    let back = Session::load(&store, 2);
    assert_eq!(back.log.lines(), ["four", "three"]);
    assert_eq!(back.media.audio.as_deref(), Some("https://example.org/tavern.ogg"));
    assert_eq!(back.encounter_id.as_deref(), Some("e1"));
}

#[test]
fn corrupt_session_starts_fresh() {
    let (_dir, store) = store();
    fs::write(store.root().join("session.json"), "garbage").unwrap();
    let session = Session::load(&store, 10);
    assert!(session.log.lines().is_empty());
    assert!(session.encounter_id.is_none());
}
