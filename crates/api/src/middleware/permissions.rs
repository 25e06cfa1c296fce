//! Permission-code authorization.
//!
//! [`Authorized`] wraps [`AuthUser`], checks the account is still active and
//! loads the user's permission codes once per request. Handlers then call [`Authorized::require`] with the code
//! their route needs, so a request without a token is still a 401 while a
//! valid token lacking the code is a 403.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use songbook_core::error::CoreError;
use songbook_core::permissions::Permissions;
use songbook_db::repositories::{PermissionRepo, UserRepo};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// An authenticated user together with their granted permission codes.
///
/// ```ignore
/// async fn create(auth: Authorized) -> AppResult<StatusCode> {
///     auth.require(RECOMMENDATIONS_WRITE)?;
///     Ok(StatusCode::CREATED)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Authorized {
    pub user: AuthUser,
    pub permissions: Permissions,
}

impl Authorized {
    /// Reject with 403 Forbidden unless `code` has been granted.
    pub fn require(&self, code: &str) -> Result<(), AppError> {
        if self.permissions.includes(code) {
            return Ok(());
        }
        tracing::debug!(user_id = self.user.user_id, code, "Permission denied");
        Err(AppError::Core(CoreError::Forbidden(
            "Your user account doesn't have the necessary permissions to access this resource"
                .into(),
        )))
    }
}

impl FromRequestParts<AppState> for Authorized {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        // A valid token for a removed or deactivated account is rejected.
        let active = UserRepo::find_by_id(&state.pool, user.user_id)
            .await?
            .is_some_and(|u| u.activated);
        if !active {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid or expired token".into(),
            )));
        }

        let permissions = PermissionRepo::codes_for_user(&state.pool, user.user_id).await?;
        Ok(Authorized { user, permissions })
    }
}
