pub mod auth;
pub mod errors;
pub mod json;
pub mod multipart;
pub mod response;
pub mod session;

pub use auth::{jwt_auth_middleware, AuthUser};
pub use errors::{not_found, redact_internal_errors};
pub use json::ApiJson;
pub use multipart::ApiMultipart;
pub use response::{ApiResponse, ApiResult};
