//! Todo lifecycle service.
//!
//! # Responsibility
//! - Provide create/get/list/update entry points for todos.
//! - Drive the soft-delete lifecycle: `Live -> Deleted -> (purged)`.
//!
//! # Invariants
//! - A live todo is never purged directly; it must be soft-deleted first.
//! - `section_id`, when supplied, must reference an existing section; this is
//!   checked before the write.
//! - Log events carry ids and counts only, never titles or descriptions.

use crate::model::section::SectionId;
use crate::model::todo::{NewTodo, Todo, TodoDetail, TodoId, TodoListQuery, TodoPatch};
use crate::model::validation::ValidationError;
use crate::model::{EntityKind, PurgeReport};
use crate::repo::todo_repo::TodoRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};

/// Use-case service wrapper for todo lifecycle operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a live todo.
    ///
    /// # Errors
    /// - `Validation` for a blank title, contradicting `status`/`completed`,
    ///   or an unknown `section_id`.
    pub fn create_todo(&self, input: NewTodo) -> ServiceResult<TodoDetail> {
        let draft = input.validate()?;
        if let Some(section_id) = draft.section_id {
            self.ensure_section_exists(section_id)?;
        }

        let todo = self.repo.insert_todo(&draft)?;
        info!(
            "event=todo_create module=service status=ok todo_id={} section_id={:?}",
            todo.id, todo.section_id
        );
        self.attach_section(todo)
    }

    /// Gets one todo with its section.
    pub fn get_todo(&self, id: TodoId, include_deleted: bool) -> ServiceResult<TodoDetail> {
        let todo = self
            .repo
            .get_todo(id, include_deleted)?
            .ok_or_else(|| ServiceError::not_found(EntityKind::Todo, id))?;
        self.attach_section(todo)
    }

    /// Lists todos matching the filter, newest first.
    pub fn list_todos(&self, query: &TodoListQuery) -> ServiceResult<Vec<Todo>> {
        Ok(self.repo.list_todos(query)?)
    }

    /// Applies a partial update to a live todo.
    ///
    /// # Errors
    /// - `Validation(EmptyUpdate)` when no field is supplied; nothing changes.
    /// - `Validation` for any invalid supplied field.
    /// - `NotFound` when the id has no live row.
    pub fn update_todo(&self, id: TodoId, patch: TodoPatch) -> ServiceResult<Todo> {
        let changes = patch.validate()?;
        if let Some(section_id) = changes.section_id {
            self.ensure_section_exists(section_id)?;
        }

        let todo = self.repo.update_live_todo(id, &changes)?;
        info!("event=todo_update module=service status=ok todo_id={id}");
        Ok(todo)
    }

    /// Moves a todo to the deleted state.
    pub fn soft_delete_todo(&self, id: TodoId) -> ServiceResult<Todo> {
        let todo = self.repo.soft_delete_todo(id)?;
        info!("event=todo_soft_delete module=service status=ok todo_id={id}");
        Ok(todo)
    }

    /// Returns a todo to the live state. Idempotent for live todos.
    pub fn restore_todo(&self, id: TodoId) -> ServiceResult<Todo> {
        let todo = self.repo.restore_todo(id)?;
        info!("event=todo_restore module=service status=ok todo_id={id}");
        Ok(todo)
    }

    /// Permanently removes every soft-deleted todo.
    pub fn purge_deleted(&self) -> ServiceResult<PurgeReport> {
        let deleted = self.repo.purge_deleted_todos()?;
        warn!("event=todo_purge module=service status=ok deleted={deleted}");
        Ok(PurgeReport { deleted })
    }

    /// Counts all stored todos, deleted ones included.
    pub fn count_todos(&self) -> ServiceResult<u64> {
        Ok(self.repo.count_todos()?)
    }

    fn ensure_section_exists(&self, section_id: SectionId) -> ServiceResult<()> {
        match self.repo.get_section(section_id)? {
            Some(_) => Ok(()),
            None => Err(ValidationError::UnknownSection(section_id).into()),
        }
    }

    fn attach_section(&self, todo: Todo) -> ServiceResult<TodoDetail> {
        let section = match todo.section_id {
            Some(section_id) => self.repo.get_section(section_id)?,
            None => None,
        };
        Ok(TodoDetail { todo, section })
    }
}
