//! Field validation rules shared by create and patch paths.
//!
//! # Invariants
//! - Titles and names are trimmed; a blank value is rejected.
//! - Names are at most `NAME_MAX_CHARS` characters (not bytes).
//! - Colors match `#RRGGBB`, case-insensitive, and are stored as given.

use crate::model::project::ProjectId;
use crate::model::section::SectionId;
use crate::model::todo::TodoStatus;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const NAME_MAX_CHARS: usize = 100;

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#[0-9a-f]{6}$").expect("valid hex color regex"));

/// Malformed or missing input, detected before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    BlankTitle,
    BlankName,
    NameTooLong { max: usize, actual: usize },
    InvalidColor(String),
    NegativePosition(i64),
    /// `status` and `completed` were both supplied and disagree.
    StatusMismatch { status: TodoStatus, completed: bool },
    EmptyUpdate,
    UnknownProject(ProjectId),
    UnknownSection(SectionId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::BlankName => write!(f, "name must not be blank"),
            Self::NameTooLong { max, actual } => {
                write!(f, "name must be at most {max} characters, got {actual}")
            }
            Self::InvalidColor(value) => {
                write!(f, "color must match #RRGGBB, got `{value}`")
            }
            Self::NegativePosition(value) => {
                write!(f, "position must be >= 0, got {value}")
            }
            Self::StatusMismatch { status, completed } => write!(
                f,
                "status `{}` contradicts completed={completed}",
                status.as_db_str()
            ),
            Self::EmptyUpdate => write!(f, "no fields to update"),
            Self::UnknownProject(id) => write!(f, "project not found: {id}"),
            Self::UnknownSection(id) => write!(f, "section not found: {id}"),
        }
    }
}

impl Error for ValidationError {}

pub fn normalize_title(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankTitle);
    }
    Ok(trimmed.to_string())
}

pub fn normalize_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankName);
    }
    let actual = trimmed.chars().count();
    if actual > NAME_MAX_CHARS {
        return Err(ValidationError::NameTooLong {
            max: NAME_MAX_CHARS,
            actual,
        });
    }
    Ok(trimmed.to_string())
}

pub fn validate_color(raw: String) -> Result<String, ValidationError> {
    if HEX_COLOR_RE.is_match(&raw) {
        Ok(raw)
    } else {
        Err(ValidationError::InvalidColor(raw))
    }
}

pub fn validate_position(position: i64) -> Result<i64, ValidationError> {
    if position < 0 {
        return Err(ValidationError::NegativePosition(position));
    }
    Ok(position)
}

/// Reconciles optional `status` and `completed` inputs into one status.
///
/// Returns `Ok(None)` when neither was supplied.
pub fn resolve_status(
    status: Option<TodoStatus>,
    completed: Option<bool>,
) -> Result<Option<TodoStatus>, ValidationError> {
    match (status, completed) {
        (Some(status), Some(completed)) if status.is_done() != completed => {
            Err(ValidationError::StatusMismatch { status, completed })
        }
        (Some(status), _) => Ok(Some(status)),
        (None, Some(completed)) => Ok(Some(TodoStatus::from_completed(completed))),
        (None, None) => Ok(None),
    }
}
