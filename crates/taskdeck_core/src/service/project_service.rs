//! Project archive lifecycle service.
//!
//! # Responsibility
//! - Provide create/get/list/update/delete entry points for projects.
//! - Drive the archive lifecycle: `Active <-> Archived -> (purged)`.
//!
//! # Invariants
//! - Creation always yields an active project, whatever the caller sends.
//! - Archive and unarchive are idempotent.
//! - Read models are enriched with sections and live-todo counts.

use crate::model::project::{
    NewProject, Project, ProjectDetail, ProjectId, ProjectOverview, ProjectPatch,
};
use crate::model::{EntityKind, PurgeReport};
use crate::repo::project_repo::ProjectRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// Use-case service wrapper for project lifecycle operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates an active project.
    pub fn create_project(&self, input: NewProject) -> ServiceResult<ProjectOverview> {
        if input.archived == Some(true) {
            warn!("event=project_create module=service status=ignored_field field=archived");
        }
        let draft = input.validate()?;
        let project = self.repo.insert_project(&draft)?;
        info!(
            "event=project_create module=service status=ok project_id={}",
            project.id
        );
        self.overview(project)
    }

    /// Gets one project with sections and their live todos.
    pub fn get_project(&self, id: ProjectId) -> ServiceResult<ProjectDetail> {
        let project = self.find(id)?;
        let sections = self.repo.list_project_sections_with_todos(id)?;
        Ok(ProjectDetail { project, sections })
    }

    /// Lists active projects, or all projects when `include_archived`.
    pub fn list_projects(&self, include_archived: bool) -> ServiceResult<Vec<ProjectOverview>> {
        self.repo
            .list_projects(include_archived)?
            .into_iter()
            .map(|project| self.overview(project))
            .collect()
    }

    /// Applies a partial update. An empty patch returns the current record.
    pub fn update_project(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> ServiceResult<ProjectOverview> {
        let changes = patch.validate()?;
        let project = if changes.is_empty() {
            self.find(id)?
        } else {
            self.repo.update_project(id, &changes)?
        };
        info!("event=project_update module=service status=ok project_id={id}");
        self.overview(project)
    }

    pub fn archive_project(&self, id: ProjectId) -> ServiceResult<ProjectOverview> {
        let project = self.repo.set_project_archived(id, true)?;
        info!("event=project_archive module=service status=ok project_id={id}");
        self.overview(project)
    }

    pub fn unarchive_project(&self, id: ProjectId) -> ServiceResult<ProjectOverview> {
        let project = self.repo.set_project_archived(id, false)?;
        info!("event=project_unarchive module=service status=ok project_id={id}");
        self.overview(project)
    }

    /// Hard-deletes one project (active or archived) and its sections.
    pub fn delete_project(&self, id: ProjectId) -> ServiceResult<()> {
        self.repo.delete_project(id)?;
        warn!("event=project_delete module=service status=ok project_id={id}");
        Ok(())
    }

    /// Hard-deletes every archived project.
    pub fn purge_archived(&self) -> ServiceResult<PurgeReport> {
        let deleted = self.repo.purge_archived_projects()?;
        warn!("event=project_purge module=service status=ok deleted={deleted}");
        Ok(PurgeReport { deleted })
    }

    fn find(&self, id: ProjectId) -> ServiceResult<Project> {
        self.repo
            .get_project(id)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Project, id))
    }

    fn overview(&self, project: Project) -> ServiceResult<ProjectOverview> {
        let sections = self.repo.list_project_sections(project.id)?;
        Ok(ProjectOverview::new(project, sections))
    }
}
