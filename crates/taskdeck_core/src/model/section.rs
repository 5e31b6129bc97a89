//! Section domain model.
//!
//! # Invariants
//! - `position >= 0`; it orders sections within one project.
//! - `project_id` must reference an existing project at creation time.

use crate::model::project::{Project, ProjectId};
use crate::model::time::Timestamp;
use crate::model::todo::Todo;
use crate::model::validation::{normalize_name, validate_position, ValidationError};
use serde::{Deserialize, Serialize};

pub type SectionId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub name: String,
    pub description: Option<String>,
    pub position: i64,
    pub project_id: ProjectId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Live (not soft-deleted) todo count for one section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub todos: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionWithCount {
    #[serde(flatten)]
    pub section: Section,
    #[serde(rename = "_count")]
    pub count: SectionCounts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionWithTodos {
    #[serde(flatten)]
    pub section: Section,
    pub todos: Vec<Todo>,
    #[serde(rename = "_count")]
    pub count: SectionCounts,
}

impl SectionWithTodos {
    pub fn new(section: Section, todos: Vec<Todo>) -> Self {
        let count = SectionCounts {
            todos: todos.len() as u64,
        };
        Self {
            section,
            todos,
            count,
        }
    }
}

/// List/mutation read model: section with its owning project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOverview {
    #[serde(flatten)]
    pub section: Section,
    pub project: Project,
    #[serde(rename = "_count")]
    pub count: SectionCounts,
}

/// Detail read model: overview plus live todos, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDetail {
    #[serde(flatten)]
    pub overview: SectionOverview,
    pub todos: Vec<Todo>,
}

/// Create request for a section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub project_id: ProjectId,
    #[serde(default)]
    pub position: Option<i64>,
}

impl NewSection {
    pub fn new(name: impl Into<String>, project_id: ProjectId) -> Self {
        Self {
            name: name.into(),
            description: None,
            project_id,
            position: None,
        }
    }

    /// Field rules only; project existence is checked by the service.
    pub fn validate(self) -> Result<SectionDraft, ValidationError> {
        Ok(SectionDraft {
            name: normalize_name(&self.name)?,
            description: self.description,
            project_id: self.project_id,
            position: validate_position(self.position.unwrap_or(0))?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDraft {
    pub name: String,
    pub description: Option<String>,
    pub project_id: ProjectId,
    pub position: i64,
}

/// Partial update request for a section. Sections cannot change project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<i64>,
}

impl SectionPatch {
    pub fn validate(self) -> Result<SectionChanges, ValidationError> {
        Ok(SectionChanges {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            description: self.description,
            position: self.position.map(validate_position).transpose()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub position: Option<i64>,
}

impl SectionChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.position.is_none()
    }
}
