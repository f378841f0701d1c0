use axum::extract::State;
use serde::Deserialize;

use crate::database::models::{NewProject, Project};
use crate::database::ProjectStore;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

impl CreateProjectRequest {
    pub fn validate(self) -> Result<NewProject, ApiError> {
        Ok(NewProject {
            title: validation::required("title", self.title)?,
            description: validation::required("description", self.description)?,
            image_url: self.image_url.filter(|url| !url.trim().is_empty()),
        })
    }
}

/// GET /api/v1/projects - All projects; an empty store is an empty list
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Project>> {
    let projects = state.store.list_projects().await?;
    Ok(ApiResponse::success(projects))
}

/// POST /api/v1/projects - Create a project
pub async fn post(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateProjectRequest>,
) -> ApiResult<Project> {
    let new_project = payload.validate()?;

    let project = state
        .store
        .create_project(new_project)
        .await?
        .ok_or_else(|| ApiError::create_failed("Project could not be created"))?;

    tracing::info!("Created project {}", project.id);
    Ok(ApiResponse::created(project))
}
