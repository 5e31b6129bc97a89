//! Project repository contract and SQLite implementation.
//!
//! # Invariants
//! - Inserts always write `archived = 0`.
//! - Default listing only sees `archived = 0` rows.
//! - Deleting a project cascades to its sections in the same statement;
//!   todos in those sections are detached (`section_id = NULL`).
//! - Section counts only include live todos.

use crate::model::project::{Project, ProjectChanges, ProjectDraft, ProjectId};
use crate::model::section::{SectionCounts, SectionWithCount, SectionWithTodos};
use crate::model::EntityKind;
use crate::repo::rows::{
    bool_to_int, now_millis, parse_count, parse_project_row, parse_section_row, parse_todo_row,
    PROJECT_COLUMNS, SECTION_COLUMNS, TODO_COLUMNS,
};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Repository interface for project storage.
pub trait ProjectRepository {
    /// Inserts a validated draft as an active project.
    fn insert_project(&self, draft: &ProjectDraft) -> RepoResult<Project>;
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    /// Lists projects newest-created first.
    fn list_projects(&self, include_archived: bool) -> RepoResult<Vec<Project>>;
    /// Applies non-empty changes and touches `updated_at`.
    fn update_project(&self, id: ProjectId, changes: &ProjectChanges) -> RepoResult<Project>;
    /// Sets the archive flag. Re-applying the current value succeeds.
    fn set_project_archived(&self, id: ProjectId, archived: bool) -> RepoResult<Project>;
    fn delete_project(&self, id: ProjectId) -> RepoResult<()>;
    /// Hard-deletes every archived project and returns the count.
    fn purge_archived_projects(&self) -> RepoResult<u64>;
    /// Sections ordered by position, each with its live todo count.
    fn list_project_sections(&self, project_id: ProjectId) -> RepoResult<Vec<SectionWithCount>>;
    /// Sections ordered by position, each with its live todos.
    fn list_project_sections_with_todos(
        &self,
        project_id: ProjectId,
    ) -> RepoResult<Vec<SectionWithTodos>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_one(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<Project>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn insert_project(&self, draft: &ProjectDraft) -> RepoResult<Project> {
        let now = now_millis();
        self.fetch_one(
            &format!(
                "INSERT INTO projects (
                    name,
                    description,
                    color,
                    archived,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, 0, ?4, ?4)
                RETURNING {PROJECT_COLUMNS};"
            ),
            vec![
                Value::Text(draft.name.clone()),
                draft.description.clone().map_or(Value::Null, Value::Text),
                draft.color.clone().map_or(Value::Null, Value::Text),
                Value::Integer(now),
            ],
        )?
        .ok_or_else(|| RepoError::InvalidData("insert into projects returned no row".to_string()))
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        self.fetch_one(
            &format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )
    }

    fn list_projects(&self, include_archived: bool) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS}
             FROM projects
             WHERE (?1 = 1 OR archived = 0)
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([bool_to_int(include_archived)])?;
        let mut projects = Vec::new();
        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }
        Ok(projects)
    }

    fn update_project(&self, id: ProjectId, changes: &ProjectChanges) -> RepoResult<Project> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = changes.name.as_ref() {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(description) = changes.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(color) = changes.color.as_ref() {
            assignments.push("color = ?");
            bind_values.push(Value::Text(color.clone()));
        }
        if let Some(archived) = changes.archived {
            assignments.push("archived = ?");
            bind_values.push(Value::Integer(bool_to_int(archived)));
        }
        assignments.push("updated_at = ?");
        bind_values.push(Value::Integer(now_millis()));
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE projects
             SET {}
             WHERE id = ?
             RETURNING {PROJECT_COLUMNS};",
            assignments.join(", ")
        );
        self.fetch_one(&sql, bind_values)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Project, id))
    }

    fn set_project_archived(&self, id: ProjectId, archived: bool) -> RepoResult<Project> {
        self.fetch_one(
            &format!(
                "UPDATE projects
                 SET
                    archived = ?1,
                    updated_at = ?2
                 WHERE id = ?3
                 RETURNING {PROJECT_COLUMNS};"
            ),
            vec![
                Value::Integer(bool_to_int(archived)),
                Value::Integer(now_millis()),
                Value::Integer(id),
            ],
        )?
        .ok_or_else(|| RepoError::not_found(EntityKind::Project, id))
    }

    fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Project, id));
        }
        Ok(())
    }

    fn purge_archived_projects(&self) -> RepoResult<u64> {
        let deleted = self
            .conn
            .execute("DELETE FROM projects WHERE archived = 1;", [])?;
        Ok(deleted as u64)
    }

    fn list_project_sections(&self, project_id: ProjectId) -> RepoResult<Vec<SectionWithCount>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT
                {SECTION_COLUMNS},
                (
                    SELECT COUNT(*)
                    FROM todos
                    WHERE todos.section_id = sections.id
                      AND todos.deleted_at IS NULL
                ) AS todo_count
             FROM sections
             WHERE project_id = ?1
             ORDER BY position ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([project_id])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(SectionWithCount {
                section: parse_section_row(row)?,
                count: SectionCounts {
                    todos: parse_count(row, "todo_count")?,
                },
            });
        }
        Ok(sections)
    }

    fn list_project_sections_with_todos(
        &self,
        project_id: ProjectId,
    ) -> RepoResult<Vec<SectionWithTodos>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SECTION_COLUMNS}
             FROM sections
             WHERE project_id = ?1
             ORDER BY position ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([project_id])?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }

        let mut todo_stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS}
             FROM todos
             WHERE section_id = ?1
               AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut result = Vec::with_capacity(sections.len());
        for section in sections {
            let mut todo_rows = todo_stmt.query([section.id])?;
            let mut todos = Vec::new();
            while let Some(row) = todo_rows.next()? {
                todos.push(parse_todo_row(row)?);
            }
            result.push(SectionWithTodos::new(section, todos));
        }
        Ok(result)
    }
}
