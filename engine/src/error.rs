use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    #[error("invalid dice expression '{expr}': {reason}")]
    InvalidExpression { expr: String, reason: String },

    #[error("{ability} score {score} is out of range (1-30)")]
    InvalidAbilityScore { ability: &'static str, score: i32 },

    #[error("invalid id '{0}' (letters, digits, '-' and '_' only)")]
    InvalidId(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unreadable PDF: {0}")]
    Pdf(String),

    #[error("access denied: {0}")]
    AccessDenied(String),
}

impl PanelError {
    pub(crate) fn invalid_expr(expr: &str, reason: impl Into<String>) -> Self {
        PanelError::InvalidExpression {
            expr: expr.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PanelError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, PanelError>;
