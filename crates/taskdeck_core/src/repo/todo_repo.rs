//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and lifecycle transitions over `todos` storage.
//! - Translate `TodoLifecycle` to and from the nullable `deleted_at` column.
//!
//! # Invariants
//! - Default reads only see rows with `deleted_at IS NULL`.
//! - Soft-delete, restore, update and purge are each one statement, so
//!   concurrent callers never observe a half-applied transition.
//! - `id` values come from `AUTOINCREMENT` and are never reused after purge.

use crate::db::CASEFOLD_CONTAINS;
use crate::model::section::{Section, SectionId};
use crate::model::time;
use crate::model::todo::{Todo, TodoChanges, TodoDraft, TodoId, TodoListQuery};
use crate::model::EntityKind;
use crate::repo::rows::{
    bool_to_int, now_millis, parse_section_row, parse_todo_row, SECTION_COLUMNS, TODO_COLUMNS,
};
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// Repository interface for todo storage.
pub trait TodoRepository {
    /// Inserts a validated draft as a live todo.
    fn insert_todo(&self, draft: &TodoDraft) -> RepoResult<Todo>;
    /// Loads one todo; soft-deleted rows only when `include_deleted`.
    fn get_todo(&self, id: TodoId, include_deleted: bool) -> RepoResult<Option<Todo>>;
    /// Lists todos newest-created first.
    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>>;
    /// Applies changes to a live todo and touches `updated_at`.
    fn update_live_todo(&self, id: TodoId, changes: &TodoChanges) -> RepoResult<Todo>;
    /// Marks a todo deleted. An existing tombstone keeps its timestamp.
    fn soft_delete_todo(&self, id: TodoId) -> RepoResult<Todo>;
    /// Clears the tombstone. Restoring a live todo is a no-op success.
    fn restore_todo(&self, id: TodoId) -> RepoResult<Todo>;
    /// Physically removes every soft-deleted todo and returns the count.
    fn purge_deleted_todos(&self) -> RepoResult<u64>;
    /// Counts all rows, tombstoned ones included.
    fn count_todos(&self) -> RepoResult<u64>;
    /// Loads the section a todo may reference.
    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>>;
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn fetch_one(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_todo_row(row)?)),
            None => Ok(None),
        }
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn insert_todo(&self, draft: &TodoDraft) -> RepoResult<Todo> {
        let now = now_millis();
        let mut stmt = self.conn.prepare(&format!(
            "INSERT INTO todos (
                title,
                description,
                completed,
                priority,
                status,
                due_date,
                section_id,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
            RETURNING {TODO_COLUMNS};"
        ))?;
        let mut rows = stmt.query(params![
            draft.title.as_str(),
            draft.description.as_deref(),
            bool_to_int(draft.status.is_done()),
            draft.priority.as_db_str(),
            draft.status.as_db_str(),
            draft.due_date.as_ref().map(time::to_millis),
            draft.section_id,
            now,
        ])?;

        match rows.next()? {
            Some(row) => parse_todo_row(row),
            None => Err(RepoError::InvalidData(
                "insert into todos returned no row".to_string(),
            )),
        }
    }

    fn get_todo(&self, id: TodoId, include_deleted: bool) -> RepoResult<Option<Todo>> {
        self.fetch_one(
            &format!(
                "SELECT {TODO_COLUMNS}
                 FROM todos
                 WHERE id = ?1
                   AND (?2 = 1 OR deleted_at IS NULL);"
            ),
            vec![
                Value::Integer(id),
                Value::Integer(bool_to_int(include_deleted)),
            ],
        )
    }

    fn list_todos(&self, query: &TodoListQuery) -> RepoResult<Vec<Todo>> {
        let mut sql = format!("SELECT {TODO_COLUMNS} FROM todos WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if !query.include_deleted {
            sql.push_str(" AND deleted_at IS NULL");
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_db_str().to_string()));
        }

        if let Some(term) = query.normalized_search() {
            sql.push_str(&format!(
                " AND ({CASEFOLD_CONTAINS}(title, ?) OR {CASEFOLD_CONTAINS}(description, ?))"
            ));
            bind_values.push(Value::Text(term.to_string()));
            bind_values.push(Value::Text(term.to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn update_live_todo(&self, id: TodoId, changes: &TodoChanges) -> RepoResult<Todo> {
        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(title) = changes.title.as_ref() {
            assignments.push("title = ?");
            bind_values.push(Value::Text(title.clone()));
        }
        if let Some(description) = changes.description.as_ref() {
            assignments.push("description = ?");
            bind_values.push(Value::Text(description.clone()));
        }
        if let Some(status) = changes.status {
            assignments.push("status = ?");
            bind_values.push(Value::Text(status.as_db_str().to_string()));
            assignments.push("completed = ?");
            bind_values.push(Value::Integer(bool_to_int(status.is_done())));
        }
        if let Some(priority) = changes.priority {
            assignments.push("priority = ?");
            bind_values.push(Value::Text(priority.as_db_str().to_string()));
        }
        if let Some(due_date) = changes.due_date.as_ref() {
            assignments.push("due_date = ?");
            bind_values.push(Value::Integer(time::to_millis(due_date)));
        }
        if let Some(section_id) = changes.section_id {
            assignments.push("section_id = ?");
            bind_values.push(Value::Integer(section_id));
        }
        assignments.push("updated_at = ?");
        bind_values.push(Value::Integer(now_millis()));
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE todos
             SET {}
             WHERE id = ?
               AND deleted_at IS NULL
             RETURNING {TODO_COLUMNS};",
            assignments.join(", ")
        );

        self.fetch_one(&sql, bind_values)?
            .ok_or_else(|| RepoError::not_found(EntityKind::Todo, id))
    }

    fn soft_delete_todo(&self, id: TodoId) -> RepoResult<Todo> {
        self.fetch_one(
            &format!(
                "UPDATE todos
                 SET
                    deleted_at = COALESCE(deleted_at, ?1),
                    updated_at = ?1
                 WHERE id = ?2
                 RETURNING {TODO_COLUMNS};"
            ),
            vec![Value::Integer(now_millis()), Value::Integer(id)],
        )?
        .ok_or_else(|| RepoError::not_found(EntityKind::Todo, id))
    }

    fn restore_todo(&self, id: TodoId) -> RepoResult<Todo> {
        self.fetch_one(
            &format!(
                "UPDATE todos
                 SET
                    deleted_at = NULL,
                    updated_at = ?1
                 WHERE id = ?2
                 RETURNING {TODO_COLUMNS};"
            ),
            vec![Value::Integer(now_millis()), Value::Integer(id)],
        )?
        .ok_or_else(|| RepoError::not_found(EntityKind::Todo, id))
    }

    fn purge_deleted_todos(&self) -> RepoResult<u64> {
        let deleted = self
            .conn
            .execute("DELETE FROM todos WHERE deleted_at IS NOT NULL;", [])?;
        Ok(deleted as u64)
    }

    fn count_todos(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM todos;", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn get_section(&self, id: SectionId) -> RepoResult<Option<Section>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {SECTION_COLUMNS} FROM sections WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_section_row(row)?)),
            None => Ok(None),
        }
    }
}
