use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::Level;

use crate::error::{PanelError, Result};
use crate::session::DEFAULT_LOG_LIMIT;

pub const DEFAULT_CONFIG_FILE: &str = "rpgpanel.yaml";
pub const ENV_DATA_DIR: &str = "RPGPANEL_DATA_DIR";
pub const ENV_MONSTER_PASSWORD: &str = "RPGPANEL_MONSTER_PASSWORD";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub data_dir: PathBuf,
    pub monster_password: Option<String>,
    pub log_limit: usize,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            monster_password: None,
            log_limit: DEFAULT_LOG_LIMIT,
            log_level: "warn".into(),
        }
    }
}

impl Config {
    /// Reads `path` if given, else `rpgpanel.yaml` when present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        match fs::read_to_string(&path) {
            Ok(text) => Self::from_yaml(&text),
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(PanelError::io(path, e)),
        }
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Applies `RPGPANEL_*` overrides from `lookup` (normally `std::env::var`).
    pub fn apply_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_DATA_DIR).filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(pwd) = lookup(ENV_MONSTER_PASSWORD) {
            self.monster_password = Some(pwd);
        }
        self
    }

    pub fn level(&self) -> Level {
        self.log_level.parse().unwrap_or(Level::WARN)
    }
}

/// Installs the fmt subscriber on stderr. `verbosity` raises the configured level.
pub fn init_logging(base: Level, verbosity: u8) {
    let level = match verbosity {
        0 => base,
        1 => Level::INFO.max(base),
        2 => Level::DEBUG.max(base),
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = Config::from_yaml("monster_password: owlbear\n").unwrap();
        assert_eq!(cfg.monster_password.as_deref(), Some("owlbear"));
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert_eq!(cfg.log_limit, 200);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(Config::from_yaml("dat_dir: x\n"), Err(PanelError::Yaml(_))));
    }

    #[test]
    fn env_overrides_file_values() {
        let cfg = Config::from_yaml("data_dir: table\n").unwrap().apply_env(|key| match key {
            ENV_DATA_DIR => Some("/srv/rpg".into()),
            _ => None,
        });
        assert_eq!(cfg.data_dir, PathBuf::from("/srv/rpg"));
        assert_eq!(cfg.monster_password, None);
    }

    #[test]
    fn bad_level_falls_back_to_warn() {
        let cfg = Config { log_level: "loud".into(), ..Config::default() };
        assert_eq!(cfg.level(), Level::WARN);
    }
}
