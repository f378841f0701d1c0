pub mod collection;
pub mod record;
pub mod upload;

use uuid::Uuid;

use crate::error::ApiError;

// Re-export handler functions for use in routing
pub use collection::list as projects_list;
pub use collection::post as projects_post;
pub use record::delete as project_delete;
pub use record::get as project_get;
pub use record::put as project_put;
pub use upload::post as project_upload;

pub(crate) const NOT_FOUND: &str = "Project not found";

/// Ids that are not UUIDs cannot resolve to a project
pub(crate) fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(NOT_FOUND))
}
