//! Route definitions for comments, mounted at `/comments`.
//!
//! ```text
//! GET    /        list_comments     any authenticated user
//! POST   /        create_comment    comments:write
//! PATCH  /{id}    update_comment    comments:write
//! DELETE /{id}    delete_comment    comments:write
//! ```

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comments::list_comments).post(comments::create_comment))
        .route(
            "/{id}",
            patch(comments::update_comment).delete(comments::delete_comment),
        )
}
