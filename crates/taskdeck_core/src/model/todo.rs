//! Todo domain model.
//!
//! # Responsibility
//! - Define the todo record and its create/patch request shapes.
//! - Model soft-delete as an explicit two-state lifecycle.
//!
//! # Invariants
//! - `status == Done` if and only if `completed == true`.
//! - `TodoLifecycle` is the source of truth for visibility; the nullable
//!   `deletedAt` form exists only at storage and JSON boundaries.

use crate::model::section::{Section, SectionId};
use crate::model::time::Timestamp;
use crate::model::validation::{normalize_title, resolve_status, ValidationError};
use serde::{Deserialize, Serialize};

pub type TodoId = i64;

/// Urgency bucket shown by the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Urgent => "URGENT",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "URGENT" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Completion state mirrored by the `completed` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TodoStatus {
    #[default]
    Pending,
    Done,
}

impl TodoStatus {
    pub fn from_completed(completed: bool) -> Self {
        if completed {
            Self::Done
        } else {
            Self::Pending
        }
    }

    pub fn is_done(self) -> bool {
        self == Self::Done
    }

    pub fn as_db_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
        }
    }

    pub fn from_db_str(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Visibility state of a todo.
///
/// ```text
/// Live --soft_delete--> Deleted --purge--> (gone)
///   ^                      |
///   +-------restore--------+
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoLifecycle {
    #[default]
    Live,
    Deleted { deleted_at: Timestamp },
}

impl TodoLifecycle {
    /// Builds the lifecycle from the nullable `deleted_at` boundary form.
    pub fn from_deleted_at(deleted_at: Option<Timestamp>) -> Self {
        match deleted_at {
            Some(deleted_at) => Self::Deleted { deleted_at },
            None => Self::Live,
        }
    }

    /// Projects the lifecycle back onto the nullable boundary form.
    pub fn deleted_at(&self) -> Option<Timestamp> {
        match self {
            Self::Live => None,
            Self::Deleted { deleted_at } => Some(*deleted_at),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// Canonical todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub status: TodoStatus,
    pub due_date: Option<Timestamp>,
    pub section_id: Option<SectionId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Serialized as nullable `deletedAt`.
    #[serde(rename = "deletedAt", default, with = "lifecycle_as_deleted_at")]
    pub lifecycle: TodoLifecycle,
}

impl Todo {
    /// Returns whether this todo is visible in default queries.
    pub fn is_live(&self) -> bool {
        self.lifecycle.is_live()
    }

    pub fn deleted_at(&self) -> Option<Timestamp> {
        self.lifecycle.deleted_at()
    }
}

mod lifecycle_as_deleted_at {
    use super::TodoLifecycle;
    use crate::model::time::Timestamp;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(lifecycle: &TodoLifecycle, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        lifecycle.deleted_at().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<TodoLifecycle, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<Timestamp>::deserialize(deserializer).map(TodoLifecycle::from_deleted_at)
    }
}

/// Todo read model with its attached section, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoDetail {
    #[serde(flatten)]
    pub todo: Todo,
    pub section: Option<Section>,
}

/// Create request for a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Timestamp>,
    pub section_id: Option<SectionId>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Validates field rules and resolves defaults.
    ///
    /// Section existence is checked by the service, not here.
    pub fn validate(self) -> Result<TodoDraft, ValidationError> {
        let title = normalize_title(&self.title)?;
        let status = resolve_status(self.status, self.completed)?.unwrap_or_default();
        Ok(TodoDraft {
            title,
            description: self.description,
            status,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            section_id: self.section_id,
        })
    }
}

/// Validated insert payload. `completed` is derived from `status`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub description: Option<String>,
    pub status: TodoStatus,
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
    pub section_id: Option<SectionId>,
}

/// Partial update request; absent fields stay unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TodoStatus>,
    pub completed: Option<bool>,
    pub priority: Option<Priority>,
    pub due_date: Option<Timestamp>,
    pub section_id: Option<SectionId>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.completed.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.section_id.is_none()
    }

    /// Validates supplied fields. An empty patch is a validation error.
    pub fn validate(self) -> Result<TodoChanges, ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::EmptyUpdate);
        }
        let title = self.title.as_deref().map(normalize_title).transpose()?;
        let status = resolve_status(self.status, self.completed)?;
        Ok(TodoChanges {
            title,
            description: self.description,
            status,
            priority: self.priority,
            due_date: self.due_date,
            section_id: self.section_id,
        })
    }
}

/// Validated, non-empty set of column changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Writes both `status` and `completed`.
    pub status: Option<TodoStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Timestamp>,
    pub section_id: Option<SectionId>,
}

/// Filters for listing todos.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListQuery {
    pub status: Option<TodoStatus>,
    /// Case-insensitive substring on title or description.
    pub search: Option<String>,
    pub include_deleted: bool,
}

impl TodoListQuery {
    /// Blank search terms are treated as absent.
    pub fn normalized_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}
