//! Handlers for `/recommendations`.

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use songbook_core::pagination::validate_filters;
use songbook_core::permissions::{RECOMMENDATIONS_READ, RECOMMENDATIONS_WRITE};
use songbook_core::recommendation::{validate_recommendation, SORT_SAFELIST};
use songbook_core::validator::Validator;
use songbook_db::models::comment::Comment;
use songbook_db::models::recommendation::{
    CreateRecommendation, Recommendation, RecommendationQuery, UpdateRecommendation,
};
use songbook_db::repositories::{CommentRepo, RecommendationRepo};

use super::check_expected_version;
use crate::error::AppResult;
use crate::middleware::path_id::PathId;
use crate::middleware::permissions::Authorized;
use crate::query::{read_date, read_string, PageParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters / responses
// ---------------------------------------------------------------------------

/// `GET /recommendations` query string.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Creation day, `YYYY-MM-DD`.
    pub created_at: Option<String>,
    pub created_by: Option<String>,
    pub title: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

/// A recommendation with its comments, oldest first.
#[derive(Debug, Serialize)]
pub struct RecommendationDetail {
    #[serde(flatten)]
    pub recommendation: Recommendation,
    pub comments: Vec<Comment>,
}

// ---------------------------------------------------------------------------
// GET /recommendations
// ---------------------------------------------------------------------------

/// List recommendations. Private entries are only listed for users who can
/// write recommendations.
pub async fn list_recommendations(
    auth: Authorized,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();
    let created_on = read_date(&mut v, "created_at", params.created_at);
    let filters = params.page.into_filters(&mut v, &SORT_SAFELIST);
    validate_filters(&mut v, &filters);
    v.finish()?;

    let query = RecommendationQuery {
        created_on,
        created_by: read_string(params.created_by),
        title: read_string(params.title),
        include_private: auth.permissions.includes(RECOMMENDATIONS_WRITE),
    };

    let (data, metadata) = RecommendationRepo::list(&state.pool, query, &filters).await?;
    tracing::debug!(count = data.len(), total = metadata.total_records, "Listed recommendations");
    Ok(Json(ListResponse { data, metadata }))
}

// ---------------------------------------------------------------------------
// POST /recommendations
// ---------------------------------------------------------------------------

pub async fn create_recommendation(
    auth: Authorized,
    State(state): State<AppState>,
    Json(input): Json<CreateRecommendation>,
) -> AppResult<impl IntoResponse> {
    auth.require(RECOMMENDATIONS_WRITE)?;

    let mut v = Validator::new();
    validate_recommendation(&mut v, &input.draft());
    v.finish()?;

    let created = RecommendationRepo::create(&state.pool, auth.user.user_id, &input).await?;
    tracing::info!(id = created.id, title = %created.title, "Recommendation created");

    let location = format!("/api/v1/recommendations/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: created }),
    ))
}

// ---------------------------------------------------------------------------
// GET /recommendations/{id}
// ---------------------------------------------------------------------------

pub async fn get_recommendation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<impl IntoResponse> {
    auth.require(RECOMMENDATIONS_READ)?;

    let recommendation = RecommendationRepo::get(&state.pool, id).await?;
    let comments = CommentRepo::list_for_recommendation(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: RecommendationDetail {
            recommendation,
            comments,
        },
    }))
}

// ---------------------------------------------------------------------------
// PATCH /recommendations/{id}
// ---------------------------------------------------------------------------

/// Apply a partial update. Fails with 409 when another request updated the
/// recommendation in between, or when `X-Expected-Version` is stale.
pub async fn update_recommendation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
    headers: HeaderMap,
    Json(input): Json<UpdateRecommendation>,
) -> AppResult<impl IntoResponse> {
    auth.require(RECOMMENDATIONS_WRITE)?;

    let mut recommendation = RecommendationRepo::get(&state.pool, id).await?;
    check_expected_version(&headers, "Recommendation", id, recommendation.version)?;

    input.apply_to(&mut recommendation);

    let mut v = Validator::new();
    validate_recommendation(&mut v, &recommendation.draft());
    v.finish()?;

    RecommendationRepo::update(&state.pool, &mut recommendation).await?;
    tracing::info!(id, version = recommendation.version, "Recommendation updated");
    Ok(Json(DataResponse {
        data: recommendation,
    }))
}

// ---------------------------------------------------------------------------
// DELETE /recommendations/{id}
// ---------------------------------------------------------------------------

/// Delete a recommendation and, by cascade, its comments.
pub async fn delete_recommendation(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    auth.require(RECOMMENDATIONS_WRITE)?;

    RecommendationRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Recommendation deleted");
    Ok(StatusCode::NO_CONTENT)
}
