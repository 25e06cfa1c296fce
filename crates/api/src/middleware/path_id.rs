//! Extractor for the `{id}` segment of item routes.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use songbook_core::types::DbId;

use crate::error::AppError;

/// A positive record id taken from the request path.
///
/// Anything that is not a positive integer answers 404 in the usual JSON
/// envelope, since no record can live at that address.
#[derive(Debug, Clone, Copy)]
pub struct PathId(pub DbId);

impl<S: Send + Sync> FromRequestParts<S> for PathId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        match raw.parse::<DbId>() {
            Ok(id) if id >= 1 => Ok(PathId(id)),
            _ => Err(AppError::NotFound),
        }
    }
}
