use std::fs;

use rpgpanel::media::{MediaKind, MediaLibrary};
use rpgpanel::PanelError;
use tempfile::TempDir;

#[test]
fn local_picks_must_exist_and_urls_pass_through() {
    let dir = TempDir::new().unwrap();
    let lib = MediaLibrary::open(dir.path()).unwrap();
    fs::write(lib.dir(MediaKind::Audio).join("tavern.ogg"), b"ogg").unwrap();
    fs::write(lib.dir(MediaKind::Audio).join("battle.mp3"), b"mp3").unwrap();

    assert_eq!(lib.files(MediaKind::Audio).unwrap(), ["battle.mp3", "tavern.ogg"]);
    assert!(lib.files(MediaKind::Video).unwrap().is_empty());

    let picked = lib.resolve(MediaKind::Audio, "tavern.ogg").unwrap().unwrap();
    assert!(picked.ends_with("tavern.ogg"));
    assert_eq!(
        lib.resolve(MediaKind::Video, " https://example.org/rain.mp4 ").unwrap().as_deref(),
        Some("https://example.org/rain.mp4")
    );
    assert_eq!(lib.resolve(MediaKind::Audio, "  ").unwrap(), None);
    assert!(matches!(
        lib.resolve(MediaKind::Video, "tavern.ogg"),
        Err(PanelError::NotFound { .. })
    ));
}
