//! Section management service.
//!
//! # Invariants
//! - A section can only be created under an existing project; the check runs
//!   before the insert instead of relying on a foreign-key failure.

use crate::model::project::{Project, ProjectId};
use crate::model::section::{
    NewSection, Section, SectionCounts, SectionDetail, SectionId, SectionOverview, SectionPatch,
};
use crate::model::validation::ValidationError;
use crate::model::EntityKind;
use crate::repo::section_repo::SectionRepository;
use crate::repo::RepoError;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

pub struct SectionService<R: SectionRepository> {
    repo: R,
}

impl<R: SectionRepository> SectionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a section under an existing project.
    ///
    /// # Errors
    /// - `Validation(UnknownProject)` when `project_id` has no row.
    pub fn create_section(&self, input: NewSection) -> ServiceResult<SectionOverview> {
        let draft = input.validate()?;
        if self.repo.get_project(draft.project_id)?.is_none() {
            return Err(ValidationError::UnknownProject(draft.project_id).into());
        }

        let section = self.repo.insert_section(&draft)?;
        info!(
            "event=section_create module=service status=ok section_id={} project_id={}",
            section.id, section.project_id
        );
        self.overview(section)
    }

    /// Gets one section with its project and live todos.
    pub fn get_section(&self, id: SectionId) -> ServiceResult<SectionDetail> {
        let section = self.find(id)?;
        let todos = self.repo.list_live_todos(id)?;
        let project = self.owning_project(&section)?;
        let count = SectionCounts {
            todos: todos.len() as u64,
        };
        Ok(SectionDetail {
            overview: SectionOverview {
                section,
                project,
                count,
            },
            todos,
        })
    }

    /// Lists sections ordered by project, then position.
    pub fn list_sections(
        &self,
        project_id: Option<ProjectId>,
    ) -> ServiceResult<Vec<SectionOverview>> {
        self.repo
            .list_sections(project_id)?
            .into_iter()
            .map(|section| self.overview(section))
            .collect()
    }

    /// Applies a partial update. An empty patch returns the current record.
    pub fn update_section(
        &self,
        id: SectionId,
        patch: SectionPatch,
    ) -> ServiceResult<SectionOverview> {
        let changes = patch.validate()?;
        let section = if changes.is_empty() {
            self.find(id)?
        } else {
            self.repo.update_section(id, &changes)?
        };
        info!("event=section_update module=service status=ok section_id={id}");
        self.overview(section)
    }

    /// Hard-deletes a section; its todos stay alive without a section.
    pub fn delete_section(&self, id: SectionId) -> ServiceResult<()> {
        self.repo.delete_section(id)?;
        warn!("event=section_delete module=service status=ok section_id={id}");
        Ok(())
    }

    fn find(&self, id: SectionId) -> ServiceResult<Section> {
        self.repo
            .get_section(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Section, id))
    }

    fn owning_project(&self, section: &Section) -> ServiceResult<Project> {
        self.repo.get_project(section.project_id)?.ok_or_else(|| {
            ServiceError::Store(RepoError::InvalidData(format!(
                "section {} references missing project {}",
                section.id, section.project_id
            )))
        })
    }

    fn overview(&self, section: Section) -> ServiceResult<SectionOverview> {
        let project = self.owning_project(&section)?;
        let count = SectionCounts {
            todos: self.repo.count_live_todos(section.id)?,
        };
        Ok(SectionOverview {
            section,
            project,
            count,
        })
    }
}
