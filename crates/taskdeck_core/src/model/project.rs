//! Project domain model.
//!
//! # Invariants
//! - `archived` is the only archive signal; nothing is inferred from
//!   timestamps.
//! - Projects are created active: `ProjectDraft` has no archive field.

use crate::model::flag::deserialize_loose_flag;
use crate::model::section::{SectionWithCount, SectionWithTodos};
use crate::model::time::Timestamp;
use crate::model::validation::{normalize_name, validate_color, ValidationError};
use serde::{Deserialize, Serialize};

pub type ProjectId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub archived: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Project archive state derived from the `archived` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectState {
    Active,
    Archived,
}

impl Project {
    pub fn state(&self) -> ProjectState {
        if self.archived {
            ProjectState::Archived
        } else {
            ProjectState::Active
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectCounts {
    pub sections: u64,
}

/// List/mutation read model: project with its sections and counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub project: Project,
    pub sections: Vec<SectionWithCount>,
    #[serde(rename = "_count")]
    pub count: ProjectCounts,
}

impl ProjectOverview {
    pub fn new(project: Project, sections: Vec<SectionWithCount>) -> Self {
        let count = ProjectCounts {
            sections: sections.len() as u64,
        };
        Self {
            project,
            sections,
            count,
        }
    }
}

/// Detail read model: sections carry their live todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub sections: Vec<SectionWithTodos>,
}

/// Create request for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    /// Accepted on the wire but never honored.
    #[serde(deserialize_with = "deserialize_loose_flag")]
    pub archived: Option<bool>,
}

impl NewProject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(self) -> Result<ProjectDraft, ValidationError> {
        Ok(ProjectDraft {
            name: normalize_name(&self.name)?,
            description: self.description,
            color: self.color.map(validate_color).transpose()?,
        })
    }
}

/// Validated insert payload; stored with `archived = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// Partial update request for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_flag")]
    pub archived: Option<bool>,
}

impl ProjectPatch {
    pub fn validate(self) -> Result<ProjectChanges, ValidationError> {
        Ok(ProjectChanges {
            name: self.name.as_deref().map(normalize_name).transpose()?,
            description: self.description,
            color: self.color.map(validate_color).transpose()?,
            archived: self.archived,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub archived: Option<bool>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.color.is_none()
            && self.archived.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{NewProject, ProjectPatch};
    use crate::model::validation::ValidationError;

    #[test]
    fn loose_archived_values_are_coerced() {
        let patch: ProjectPatch = serde_json::from_str(r#"{"archived":"yes"}"#).unwrap();
        assert_eq!(patch.archived, Some(true));

        let patch: ProjectPatch = serde_json::from_str(r#"{"archived":0}"#).unwrap();
        assert_eq!(patch.archived, Some(false));

        let patch: ProjectPatch = serde_json::from_str(r#"{"name":"Home"}"#).unwrap();
        assert_eq!(patch.archived, None);
    }

    #[test]
    fn create_drops_client_archived_flag() {
        let input: NewProject =
            serde_json::from_str(r##"{"name":"Home","color":"#aabbcc","archived":true}"##)
                .unwrap();
        assert_eq!(input.archived, Some(true));
        let draft = input.validate().unwrap();
        assert_eq!(draft.name, "Home");
        assert_eq!(draft.color.as_deref(), Some("#aabbcc"));
    }

    #[test]
    fn invalid_color_is_rejected() {
        let input = NewProject {
            color: Some("blue".to_string()),
            ..NewProject::new("Home")
        };
        assert_eq!(
            input.validate(),
            Err(ValidationError::InvalidColor("blue".to_string()))
        );
    }
}
