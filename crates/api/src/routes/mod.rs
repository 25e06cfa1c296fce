pub mod comments;
pub mod health;
pub mod recommendations;
pub mod reservations;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /recommendations                  list, create
/// /recommendations/{id}             get (with comments), update, delete
/// /comments                         list, create
/// /comments/{id}                    update, delete
/// /reservations                     list, create
/// /reservations/{id}                get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/recommendations", recommendations::router())
        .nest("/comments", comments::router())
        .nest("/reservations", reservations::router())
}
