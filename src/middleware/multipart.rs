use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};

use crate::error::ApiError;

pub const UPLOAD_FAILED: &str = "Error uploading the image";

/// `Multipart` whose rejections (no body, wrong content type, bad boundary)
/// count as a failed upload instead of axum's plain-text 400
pub struct ApiMultipart(pub Multipart);

#[async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Multipart::from_request(req, state).await {
            Ok(multipart) => Ok(Self(multipart)),
            Err(rejection) => {
                tracing::debug!("Rejected upload body: {}", rejection.body_text());
                Err(ApiError::internal_server_error(UPLOAD_FAILED))
            }
        }
    }
}
