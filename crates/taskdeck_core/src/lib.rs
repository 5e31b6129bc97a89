//! Core domain logic for Taskdeck.
//! This crate is the single source of truth for todo, project and section
//! lifecycle rules; transports only adapt it.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::flag::{coerce_flag, coerce_query_flag};
pub use model::project::{
    NewProject, Project, ProjectDetail, ProjectId, ProjectOverview, ProjectPatch, ProjectState,
};
pub use model::section::{
    NewSection, Section, SectionDetail, SectionId, SectionOverview, SectionPatch,
};
pub use model::todo::{
    NewTodo, Priority, Todo, TodoDetail, TodoId, TodoLifecycle, TodoListQuery, TodoPatch,
    TodoStatus,
};
pub use model::validation::ValidationError;
pub use model::{EntityKind, PurgeReport};
pub use repo::project_repo::{ProjectRepository, SqliteProjectRepository};
pub use repo::section_repo::{SectionRepository, SqliteSectionRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::project_service::ProjectService;
pub use service::section_service::SectionService;
pub use service::todo_service::TodoService;
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API for transports.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
