use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rusqlite::Connection;
use serde::Deserialize;
use taskdeck_core::{
    coerce_query_flag, NewTodo, PurgeReport, ServiceResult, SqliteTodoRepository, Todo,
    TodoDetail, TodoId, TodoListQuery, TodoPatch, TodoService, TodoStatus,
};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTodosParams {
    pub status: Option<TodoStatus>,
    pub search: Option<String>,
    pub include_deleted: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetTodoParams {
    pub include_deleted: Option<String>,
}

fn todo_service(conn: &Connection) -> ServiceResult<TodoService<SqliteTodoRepository<'_>>> {
    Ok(TodoService::new(SqliteTodoRepository::try_new(conn)?))
}

pub async fn list_todos(
    State(state): State<AppState>,
    params: Result<Query<ListTodosParams>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, ApiError> {
    let Query(params) = params?;
    let query = TodoListQuery {
        status: params.status,
        search: params.search,
        include_deleted: coerce_query_flag(params.include_deleted.as_deref()),
    };
    let todos = state
        .with_conn(move |conn| todo_service(conn)?.list_todos(&query))
        .await?;
    Ok(Json(todos))
}

pub async fn get_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    params: Result<Query<GetTodoParams>, QueryRejection>,
) -> Result<Json<TodoDetail>, ApiError> {
    let Query(params) = params?;
    let include_deleted = coerce_query_flag(params.include_deleted.as_deref());
    let todo = state
        .with_conn(move |conn| todo_service(conn)?.get_todo(id, include_deleted))
        .await?;
    Ok(Json(todo))
}

pub async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<NewTodo>, JsonRejection>,
) -> Result<(StatusCode, Json<TodoDetail>), ApiError> {
    let Json(input) = payload?;
    let todo = state
        .with_conn(move |conn| todo_service(conn)?.create_todo(input))
        .await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
    payload: Result<Json<TodoPatch>, JsonRejection>,
) -> Result<Json<Todo>, ApiError> {
    let Json(patch) = payload?;
    let todo = state
        .with_conn(move |conn| todo_service(conn)?.update_todo(id, patch))
        .await?;
    Ok(Json(todo))
}

pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .with_conn(move |conn| todo_service(conn)?.soft_delete_todo(id))
        .await?;
    Ok(Json(todo))
}

pub async fn restore_todo(
    State(state): State<AppState>,
    Path(id): Path<TodoId>,
) -> Result<Json<Todo>, ApiError> {
    let todo = state
        .with_conn(move |conn| todo_service(conn)?.restore_todo(id))
        .await?;
    Ok(Json(todo))
}

pub async fn cleanup_deleted(State(state): State<AppState>) -> Result<Json<PurgeReport>, ApiError> {
    let report = state
        .with_conn(|conn| todo_service(conn)?.purge_deleted())
        .await?;
    Ok(Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/cleanup", post(cleanup_deleted))
        .route(
            "/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/todos/{id}/restore", post(restore_todo))
}
