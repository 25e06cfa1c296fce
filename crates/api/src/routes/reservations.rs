//! Route definitions for reservations, mounted at `/reservations`.
//!
//! ```text
//! GET    /        list_reservations     reservations:read
//! POST   /        create_reservation    reservations:write
//! GET    /{id}    get_reservation       reservations:read
//! PATCH  /{id}    update_reservation    reservations:write
//! DELETE /{id}    delete_reservation    reservations:write
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::reservations;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(reservations::list_reservations).post(reservations::create_reservation),
        )
        .route(
            "/{id}",
            get(reservations::get_reservation)
                .patch(reservations::update_reservation)
                .delete(reservations::delete_reservation),
        )
}
