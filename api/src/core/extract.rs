//! Request extractors that report failures through [`AppError`].

use axum::extract::{FromRequest, Request};

use crate::error_handler::AppError;

/// JSON body extractor whose rejection carries the service error shape.
///
/// `axum::Json` replies to malformed bodies with its own plain-text
/// response; this wrapper routes the rejection through [`AppError`] so
/// clients always get the `{error, message}` JSON envelope.
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = axum::extract::rejection::JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
