use axum::extract::{Path, State};
use serde::Deserialize;

use crate::database::models::{Project, ProjectChanges};
use crate::database::ProjectStore;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation;

use super::{parse_id, NOT_FOUND};

#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl UpdateProjectRequest {
    pub fn validate(self) -> Result<ProjectChanges, ApiError> {
        Ok(ProjectChanges {
            title: validation::required("title", self.title)?,
            description: validation::required("description", self.description)?,
        })
    }
}

/// GET /api/v1/projects/:id - Single project
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Project> {
    let id = parse_id(&id)?;

    let project = state
        .store
        .find_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    Ok(ApiResponse::success(project))
}

/// PUT /api/v1/projects/:id - Replace title and description.
/// The existence check runs before the body is looked at, so an unknown id is
/// always a 404, even with a malformed body.
pub async fn put(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<ApiJson<UpdateProjectRequest>, ApiError>,
) -> ApiResult<Project> {
    let id = parse_id(&id)?;

    if state.store.find_project(id).await?.is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let ApiJson(payload) = payload?;
    let changes = payload.validate()?;

    let updated = state
        .store
        .update_project(id, changes)
        .await?
        .ok_or_else(|| ApiError::update_failed("Project could not be updated"))?;

    tracing::info!("Updated project {}", id);
    Ok(ApiResponse::accepted(updated))
}

/// DELETE /api/v1/projects/:id - Remove a project, answering with what was stored
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Project> {
    let id = parse_id(&id)?;

    if state.store.find_project(id).await?.is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    // Someone else may have deleted it since the check
    let deleted = state
        .store
        .delete_project(id)
        .await?
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))?;

    tracing::info!("Deleted project {}", id);
    Ok(ApiResponse::accepted(deleted))
}
