//! Column lists and row parsers shared by SQLite repositories.
//!
//! Parsers reject invalid persisted state instead of masking it.

use crate::model::project::Project;
use crate::model::section::Section;
use crate::model::time::{self, Timestamp};
use crate::model::todo::{Priority, Todo, TodoLifecycle, TodoStatus};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Row;

pub(crate) const TODO_COLUMNS: &str = "id,
    title,
    description,
    completed,
    priority,
    status,
    due_date,
    section_id,
    created_at,
    updated_at,
    deleted_at";

pub(crate) const PROJECT_COLUMNS: &str = "id,
    name,
    description,
    color,
    archived,
    created_at,
    updated_at";

pub(crate) const SECTION_COLUMNS: &str = "id,
    name,
    description,
    position,
    project_id,
    created_at,
    updated_at";

pub(crate) fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let priority_text: String = row.get("priority")?;
    let priority = Priority::from_db_str(&priority_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_text}` in todos.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TodoStatus::from_db_str(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in todos.status"))
    })?;

    let completed = parse_bool(row.get("completed")?, "todos.completed")?;
    if status.is_done() != completed {
        return Err(RepoError::InvalidData(format!(
            "todos.status `{status_text}` contradicts todos.completed={completed}"
        )));
    }

    let deleted_at = parse_optional_timestamp(row.get("deleted_at")?, "todos.deleted_at")?;

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        completed,
        priority,
        status,
        due_date: parse_optional_timestamp(row.get("due_date")?, "todos.due_date")?,
        section_id: row.get("section_id")?,
        created_at: parse_timestamp(row.get("created_at")?, "todos.created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "todos.updated_at")?,
        lifecycle: TodoLifecycle::from_deleted_at(deleted_at),
    })
}

pub(crate) fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        color: row.get("color")?,
        archived: parse_bool(row.get("archived")?, "projects.archived")?,
        created_at: parse_timestamp(row.get("created_at")?, "projects.created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "projects.updated_at")?,
    })
}

pub(crate) fn parse_section_row(row: &Row<'_>) -> RepoResult<Section> {
    Ok(Section {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        position: row.get("position")?,
        project_id: row.get("project_id")?,
        created_at: parse_timestamp(row.get("created_at")?, "sections.created_at")?,
        updated_at: parse_timestamp(row.get("updated_at")?, "sections.updated_at")?,
    })
}

pub(crate) fn parse_count(row: &Row<'_>, column: &str) -> RepoResult<u64> {
    let value: i64 = row.get(column)?;
    u64::try_from(value)
        .map_err(|_| RepoError::InvalidData(format!("negative count {value} in {column}")))
}

fn parse_bool(value: i64, column: &'static str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn parse_timestamp(millis: i64, column: &'static str) -> RepoResult<Timestamp> {
    time::from_millis(millis).ok_or_else(|| {
        RepoError::InvalidData(format!("timestamp {millis} out of range in {column}"))
    })
}

fn parse_optional_timestamp(
    millis: Option<i64>,
    column: &'static str,
) -> RepoResult<Option<Timestamp>> {
    millis
        .map(|value| parse_timestamp(value, column))
        .transpose()
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(crate) fn now_millis() -> i64 {
    time::to_millis(&time::now())
}
