use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PanelError, Result};
use crate::roll::RollResult;
use crate::storage::{Store, SESSION_FILE};

pub const DEFAULT_LOG_LIMIT: usize = 200;

/// Newest-first log of what happened at the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    lines: Vec<String>,
}

impl SessionLog {
    pub fn push(&mut self, line: impl Into<String>, limit: usize) {
        self.lines.insert(0, line.into());
        self.lines.truncate(limit);
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSelection {
    pub audio: Option<String>,
    pub video: Option<String>,
}

/// Per-table state carried between interactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub log: SessionLog,
    #[serde(default)]
    pub media: MediaSelection,
    #[serde(default)]
    pub encounter_id: Option<String>,
    #[serde(skip, default = "default_limit")]
    limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LOG_LIMIT
}

impl Default for Session {
    fn default() -> Self {
        Self {
            log: SessionLog::default(),
            media: MediaSelection::default(),
            encounter_id: None,
            limit: DEFAULT_LOG_LIMIT,
        }
    }
}

impl Session {
    pub fn with_limit(limit: usize) -> Self {
        Self { limit, ..Self::default() }
    }

    /// Missing or corrupt session files start a fresh session.
    pub fn load(store: &Store, limit: usize) -> Self {
        let mut session: Session = store.load_document(SESSION_FILE).unwrap_or_default();
        session.limit = limit;
        session.log.lines.truncate(limit);
        session
    }

    pub fn save(&self, store: &Store) -> Result<()> {
        store.save_document(SESSION_FILE, self)
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.log.push(line, self.limit);
    }

    /// Logs a roll as "who: <formatted roll>".
    pub fn record(&mut self, who: Option<&str>, roll: &RollResult) -> String {
        let line = match who {
            Some(who) => format!("{who}: {roll}"),
            None => roll.to_string(),
        };
        self.push(line.clone());
        line
    }
}

/// Single shared password in front of the monster pages.
#[derive(Debug, Clone)]
pub struct PasswordGate {
    password: Option<String>,
}

impl PasswordGate {
    pub fn new(password: Option<String>) -> Self {
        Self {
            password: password.filter(|p| !p.is_empty()),
        }
    }

    pub fn unlock(&self, typed: Option<&str>) -> Result<()> {
        let Some(expected) = self.password.as_deref() else {
            return Err(PanelError::AccessDenied(
                "no monster password configured; set monster_password in rpgpanel.yaml \
                 or RPGPANEL_MONSTER_PASSWORD"
                    .into(),
            ));
        };
        match typed {
            Some(t) if t == expected => {
                info!("monster area unlocked");
                Ok(())
            }
            Some(_) => Err(PanelError::AccessDenied("wrong password".into())),
            None => Err(PanelError::AccessDenied("password required".into())),
        }
    }
}
