//! Route definitions for recommendations, mounted at `/recommendations`.
//!
//! ```text
//! GET    /        list_recommendations     any authenticated user
//! POST   /        create_recommendation    recommendations:write
//! GET    /{id}    get_recommendation       recommendations:read
//! PATCH  /{id}    update_recommendation    recommendations:write
//! DELETE /{id}    delete_recommendation    recommendations:write
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::recommendations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(recommendations::list_recommendations)
                .post(recommendations::create_recommendation),
        )
        .route(
            "/{id}",
            get(recommendations::get_recommendation)
                .patch(recommendations::update_recommendation)
                .delete(recommendations::delete_recommendation),
        )
}
