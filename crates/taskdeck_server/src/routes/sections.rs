use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rusqlite::Connection;
use serde::Deserialize;
use taskdeck_core::{
    NewSection, ProjectId, SectionDetail, SectionId, SectionOverview, SectionPatch,
    SectionService, ServiceResult, SqliteSectionRepository,
};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSectionsParams {
    pub project_id: Option<ProjectId>,
}

fn section_service(
    conn: &Connection,
) -> ServiceResult<SectionService<SqliteSectionRepository<'_>>> {
    Ok(SectionService::new(SqliteSectionRepository::try_new(conn)?))
}

pub async fn list_sections(
    State(state): State<AppState>,
    params: Result<Query<ListSectionsParams>, QueryRejection>,
) -> Result<Json<Vec<SectionOverview>>, ApiError> {
    let Query(params) = params?;
    let sections = state
        .with_conn(move |conn| section_service(conn)?.list_sections(params.project_id))
        .await?;
    Ok(Json(sections))
}

pub async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
) -> Result<Json<SectionDetail>, ApiError> {
    let section = state
        .with_conn(move |conn| section_service(conn)?.get_section(id))
        .await?;
    Ok(Json(section))
}

pub async fn create_section(
    State(state): State<AppState>,
    payload: Result<Json<NewSection>, JsonRejection>,
) -> Result<(StatusCode, Json<SectionOverview>), ApiError> {
    let Json(input) = payload?;
    let section = state
        .with_conn(move |conn| section_service(conn)?.create_section(input))
        .await?;
    Ok((StatusCode::CREATED, Json(section)))
}

pub async fn update_section(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
    payload: Result<Json<SectionPatch>, JsonRejection>,
) -> Result<Json<SectionOverview>, ApiError> {
    let Json(patch) = payload?;
    let section = state
        .with_conn(move |conn| section_service(conn)?.update_section(id, patch))
        .await?;
    Ok(Json(section))
}

pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<SectionId>,
) -> Result<StatusCode, ApiError> {
    state
        .with_conn(move |conn| section_service(conn)?.delete_section(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sections", get(list_sections).post(create_section))
        .route(
            "/sections/{id}",
            get(get_section).put(update_section).delete(delete_section),
        )
}
