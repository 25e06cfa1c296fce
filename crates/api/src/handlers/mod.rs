//! Request handlers, one module per resource.

pub mod comments;
pub mod recommendations;
pub mod reservations;

use axum::http::HeaderMap;
use songbook_core::error::CoreError;
use songbook_core::types::{DbId, Version};

use crate::error::{AppError, AppResult};

/// Header a client may send on PATCH to pin the version it last read.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Reject the request with an edit conflict when the client pinned a
/// version that is no longer current.
///
/// Without the header the update is still guarded by the version read at
/// the start of the request.
pub fn check_expected_version(
    headers: &HeaderMap,
    entity: &'static str,
    id: DbId,
    current: Version,
) -> AppResult<()> {
    let Some(raw) = headers.get(EXPECTED_VERSION_HEADER) else {
        return Ok(());
    };

    let expected: Version = raw
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "{EXPECTED_VERSION_HEADER} must be an integer"
            )))
        })?;

    if expected != current {
        tracing::debug!(entity, id, expected, current, "Stale expected version");
        return Err(AppError::Core(CoreError::EditConflict { entity, id }));
    }
    Ok(())
}
