//! Handlers for `/reservations`.
//!
//! Reservations may point at a parent reservation (a recurring series). The
//! parent must exist when it is set; deleting a parent clears the link on its
//! children.

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use songbook_core::pagination::validate_filters;
use songbook_core::permissions::{RESERVATIONS_READ, RESERVATIONS_WRITE};
use songbook_core::reservation::{validate_reservation, ReservationDraft, SORT_SAFELIST};
use songbook_core::validator::Validator;
use songbook_db::models::reservation::{CreateReservation, ReservationQuery, UpdateReservation};
use songbook_db::repositories::ReservationRepo;
use songbook_db::store::StoreError;

use super::check_expected_version;
use crate::error::AppResult;
use crate::middleware::path_id::PathId;
use crate::middleware::permissions::Authorized;
use crate::query::{read_id, read_string, read_timestamp, PageParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// `GET /reservations` query string.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub created_by: Option<String>,
    /// RFC 3339; only reservations ending after this instant.
    pub from: Option<String>,
    /// RFC 3339; only reservations starting before this instant.
    pub to: Option<String>,
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate a reservation, including that its parent (if any) exists and
/// does not descend from the reservation itself.
async fn validate_with_parent(
    pool: &sqlx::PgPool,
    draft: &ReservationDraft<'_>,
) -> AppResult<()> {
    let mut v = Validator::new();
    validate_reservation(&mut v, draft);

    if let Some(parent_id) = draft.parent_reservation_id.filter(|id| *id > 0) {
        match ReservationRepo::get(pool, parent_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound { .. }) => {
                v.add_error("parent_reservation_id", "must reference an existing reservation");
            }
            Err(other) => return Err(other.into()),
        }

        if let Some(id) = draft.id.filter(|id| *id != parent_id) {
            if ReservationRepo::chain_contains(pool, parent_id, id).await? {
                v.add_error(
                    "parent_reservation_id",
                    "must not reference one of the reservation's own descendants",
                );
            }
        }
    }

    Ok(v.finish()?)
}

// ---------------------------------------------------------------------------
// GET /reservations
// ---------------------------------------------------------------------------

pub async fn list_reservations(
    auth: Authorized,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    auth.require(RESERVATIONS_READ)?;

    let mut v = Validator::new();
    let from = read_timestamp(&mut v, "from", params.from);
    let to = read_timestamp(&mut v, "to", params.to);
    let parent_reservation_id = read_id(&mut v, "parent_id", params.parent_id);
    let filters = params.page.into_filters(&mut v, &SORT_SAFELIST);
    validate_filters(&mut v, &filters);
    if let (Some(from), Some(to)) = (from, to) {
        v.check(to > from, "to", "must be after from");
    }
    v.finish()?;

    let query = ReservationQuery {
        created_by: read_string(params.created_by),
        from,
        to,
        parent_reservation_id,
    };

    let (data, metadata) = ReservationRepo::list(&state.pool, query, &filters).await?;
    tracing::debug!(count = data.len(), total = metadata.total_records, "Listed reservations");
    Ok(Json(ListResponse { data, metadata }))
}

// ---------------------------------------------------------------------------
// POST /reservations
// ---------------------------------------------------------------------------

pub async fn create_reservation(
    auth: Authorized,
    State(state): State<AppState>,
    Json(input): Json<CreateReservation>,
) -> AppResult<impl IntoResponse> {
    auth.require(RESERVATIONS_WRITE)?;
    validate_with_parent(&state.pool, &input.draft()).await?;

    let created = ReservationRepo::create(&state.pool, auth.user.user_id, &input).await?;
    tracing::info!(id = created.id, start = %created.start_time, "Reservation created");

    let location = format!("/api/v1/reservations/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: created }),
    ))
}

// ---------------------------------------------------------------------------
// GET /reservations/{id}
// ---------------------------------------------------------------------------

pub async fn get_reservation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<impl IntoResponse> {
    auth.require(RESERVATIONS_READ)?;

    let reservation = ReservationRepo::get(&state.pool, id).await?;
    Ok(Json(DataResponse { data: reservation }))
}

// ---------------------------------------------------------------------------
// PATCH /reservations/{id}
// ---------------------------------------------------------------------------

pub async fn update_reservation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
    headers: HeaderMap,
    Json(input): Json<UpdateReservation>,
) -> AppResult<impl IntoResponse> {
    auth.require(RESERVATIONS_WRITE)?;

    let mut reservation = ReservationRepo::get(&state.pool, id).await?;
    check_expected_version(&headers, "Reservation", id, reservation.version)?;

    input.apply_to(&mut reservation);
    validate_with_parent(&state.pool, &reservation.draft()).await?;

    ReservationRepo::update(&state.pool, &mut reservation).await?;
    tracing::info!(id, version = reservation.version, "Reservation updated");
    Ok(Json(DataResponse { data: reservation }))
}

// ---------------------------------------------------------------------------
// DELETE /reservations/{id}
// ---------------------------------------------------------------------------

pub async fn delete_reservation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    auth.require(RESERVATIONS_WRITE)?;

    ReservationRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}
