use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PanelError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    fn dir_name(self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

/// Local files under `<data_dir>/media/{audio,video}`.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    base: PathBuf,
}

impl MediaLibrary {
    pub fn open(data_dir: &Path) -> Result<Self> {
        let base = data_dir.join("media");
        for kind in [MediaKind::Audio, MediaKind::Video] {
            let dir = base.join(kind.dir_name());
            fs::create_dir_all(&dir).map_err(|e| PanelError::io(&dir, e))?;
        }
        Ok(Self { base })
    }

    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.base.join(kind.dir_name())
    }

    /// Sorted file names of one kind.
    pub fn files(&self, kind: MediaKind) -> Result<Vec<String>> {
        let dir = self.dir(kind);
        let entries = fs::read_dir(&dir).map_err(|e| PanelError::io(&dir, e))?;
        let mut names: Vec<String> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        Ok(names)
    }

    /// A URL wins over a local pick; a local pick must exist. Blank input clears.
    pub fn resolve(&self, kind: MediaKind, pick_or_url: &str) -> Result<Option<String>> {
        let value = pick_or_url.trim();
        if value.is_empty() {
            return Ok(None);
        }
        if value.starts_with("http://") || value.starts_with("https://") {
            return Ok(Some(value.to_string()));
        }
        if self.files(kind)?.iter().any(|f| f == value) {
            return Ok(Some(self.dir(kind).join(value).to_string_lossy().into_owned()));
        }
        Err(PanelError::NotFound {
            kind: "media file",
            id: value.to_string(),
        })
    }
}
