//! Section repository contract and SQLite implementation.
//!
//! # Invariants
//! - Listing order is `project_id ASC, position ASC, id ASC`.
//! - Deleting a section detaches its todos via `ON DELETE SET NULL`.

use crate::model::project::{Project, ProjectId};
use crate::model::section::{Section, SectionChanges, SectionDraft, SectionId};
use crate::model::todo::Todo;
use crate::model::EntityKind;
use crate::repo::rows::{
    now_millis, parse_project_row, parse_section_row, parse_todo_row, PROJECT_COLUMNS,
    SECTION_COLUMNS, TODO_COLUMNS,
};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Repository interface for section storage.
pub trait SectionRepository {
    fn insert_section(&self, draft: &SectionDraft) -> RepoResult<Section>;
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>>;
    fn list_sections(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Section>>;
    /// Applies non-empty changes and touches `updated_at`.
    fn update_section(&self, id: SectionId, changes: &SectionChanges) -> RepoResult<Section>;
    fn delete_section(&self, id: SectionId) -> RepoResult<()>;
    /// Loads the owning (or prospective owning) project.
    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>>;
    fn count_live_todos(&self, section_id: SectionId) -> RepoResult<u64>;
    /// Live todos in a section, newest-created first.
    fn list_live_todos(&self, section_id: SectionId) -> RepoResult<Vec<Todo>>;
}

/// SQLite-backed section repository.
pub struct SqliteSectionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSectionRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_one(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<Section>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_section_row(row)?)),
            None => Ok(None),
        }
    }
}

impl SectionRepository for SqliteSectionRepository<'_> {
    fn insert_section(&self, draft: &SectionDraft) -> RepoResult<Section> {
        let now = now_millis();
        self.fetch_one(
            &format!(
                "INSERT INTO sections (
                    name,
                    description,
                    position,
                    project_id,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
                RETURNING {SECTION_COLUMNS};"
            ),
            vec![
                Value::Text(draft.name.clone()),
                draft.description.clone().map_or(Value::Null, Value::Text),
                Value::Integer(draft.position),
                Value::Integer(draft.project_id),
                Value::Integer(now),
            ],
        )?
        .ok_or_else(|| RepoError::InvalidData("insert into sections returned no row".to_string()))
    }

    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>> {
        self.fetch_one(
            &format!("SELECT {SECTION_COLUMNS} FROM sections WHERE id = ?1;"),
            vec![Value::Integer(id)],
        )
    }

    fn list_sections(&self, project_id: Option<ProjectId>) -> RepoResult<Vec<Section>> {
        let mut sql = format!("SELECT {SECTION_COLUMNS} FROM sections");
        let mut bind_values: Vec<Value> = Vec::new();
        if let Some(project_id) = project_id {
            sql.push_str(" WHERE project_id = ?");
            bind_values.push(Value::Integer(project_id));
        }
        sql.push_str(" ORDER BY project_id ASC, position ASC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut sections = Vec::new();
        while let Some(row) = rows.next()? {
            sections.push(parse_section_row(row)?);
        }
        Ok(sections)
    }

    fn update_section(&self, id: SectionId, changes: &SectionChanges) -> RepoResult<Section> {
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
        if let Some(position) = changes.position {
            assignments.push("position = ?");
            bind_values.push(Value::Integer(position));
        }
        assignments.push("updated_at = ?");
        bind_values.push(Value::Integer(now_millis()));
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE sections
             SET {}
             WHERE id = ?
             RETURNING {SECTION_COLUMNS};",
            assignments.join(", ")
        );
        self.fetch_one(&sql, bind_values)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Section, id))
    }

    fn delete_section(&self, id: SectionId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM sections WHERE id = ?1;", params![id])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Section, id));
        }
        Ok(())
    }

    fn get_project(&self, id: ProjectId) -> RepoResult<Option<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_project_row(row)?)),
            None => Ok(None),
        }
    }

    fn count_live_todos(&self, section_id: SectionId) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*)
             FROM todos
             WHERE section_id = ?1
               AND deleted_at IS NULL;",
            [section_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn list_live_todos(&self, section_id: SectionId) -> RepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {TODO_COLUMNS}
             FROM todos
             WHERE section_id = ?1
               AND deleted_at IS NULL
             ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([section_id])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }
}
