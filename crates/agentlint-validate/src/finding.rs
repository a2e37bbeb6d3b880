use agentlint_core::Severity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw finding from the linter or the advisory pass.
///
/// `id` is a stable snake_case identifier the report stage maps to a
/// catalog code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub level: Severity,
    pub path: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl Finding {
    pub fn new(
        id: impl Into<String>,
        level: Severity,
        path: impl Into<String>,
        message: impl Into<String>,
        suggestion: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            level,
            path: path.into(),
            message: message.into(),
            suggestion,
        }
    }
}

/// Construction-time validation errors.
///
/// Per-call validation never returns these; only a malformed schema
/// document is fatal.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
