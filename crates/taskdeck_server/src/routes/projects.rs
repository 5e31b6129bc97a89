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
    coerce_query_flag, NewProject, ProjectDetail, ProjectId, ProjectOverview, ProjectPatch,
    ProjectService, PurgeReport, ServiceResult, SqliteProjectRepository,
};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProjectsParams {
    pub include_archived: Option<String>,
}

fn project_service(
    conn: &Connection,
) -> ServiceResult<ProjectService<SqliteProjectRepository<'_>>> {
    Ok(ProjectService::new(SqliteProjectRepository::try_new(conn)?))
}

pub async fn list_projects(
    State(state): State<AppState>,
    params: Result<Query<ListProjectsParams>, QueryRejection>,
) -> Result<Json<Vec<ProjectOverview>>, ApiError> {
    let Query(params) = params?;
    let include_archived = coerce_query_flag(params.include_archived.as_deref());
    let projects = state
        .with_conn(move |conn| project_service(conn)?.list_projects(include_archived))
        .await?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectDetail>, ApiError> {
    let project = state
        .with_conn(move |conn| project_service(conn)?.get_project(id))
        .await?;
    Ok(Json(project))
}

pub async fn create_project(
    State(state): State<AppState>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<(StatusCode, Json<ProjectOverview>), ApiError> {
    let Json(input) = payload?;
    let project = state
        .with_conn(move |conn| project_service(conn)?.create_project(input))
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Result<Json<ProjectOverview>, ApiError> {
    let Json(patch) = payload?;
    let project = state
        .with_conn(move |conn| project_service(conn)?.update_project(id, patch))
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<StatusCode, ApiError> {
    state
        .with_conn(move |conn| project_service(conn)?.delete_project(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn archive_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectOverview>, ApiError> {
    let project = state
        .with_conn(move |conn| project_service(conn)?.archive_project(id))
        .await?;
    Ok(Json(project))
}

pub async fn unarchive_project(
    State(state): State<AppState>,
    Path(id): Path<ProjectId>,
) -> Result<Json<ProjectOverview>, ApiError> {
    let project = state
        .with_conn(move |conn| project_service(conn)?.unarchive_project(id))
        .await?;
    Ok(Json(project))
}

pub async fn cleanup_archived(
    State(state): State<AppState>,
) -> Result<Json<PurgeReport>, ApiError> {
    let report = state
        .with_conn(|conn| project_service(conn)?.purge_archived())
        .await?;
    Ok(Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/cleanup/archived", post(cleanup_archived))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{id}/archive", post(archive_project))
        .route("/projects/{id}/unarchive", post(unarchive_project))
}
