//! Handlers for `/comments`.

use axum::extract::{Query, State};
use axum::http::header::LOCATION;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use songbook_core::comment::{validate_comment, SORT_SAFELIST};
use songbook_core::pagination::validate_filters;
use songbook_core::permissions::{COMMENTS_WRITE, RECOMMENDATIONS_WRITE};
use songbook_core::validator::Validator;
use songbook_db::models::comment::{CommentQuery, CreateComment, UpdateComment};
use songbook_db::repositories::{CommentRepo, RecommendationRepo};

use super::check_expected_version;
use crate::error::AppResult;
use crate::middleware::path_id::PathId;
use crate::middleware::permissions::Authorized;
use crate::query::{read_id, read_string, PageParams};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

/// `GET /comments` query string.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub recommendation_id: Option<String>,
    pub created_by: Option<String>,
    #[serde(flatten)]
    pub page: PageParams,
}

// ---------------------------------------------------------------------------
// GET /comments
// ---------------------------------------------------------------------------

/// List comments. Comments on private recommendations are only listed for
/// users who can write recommendations.
pub async fn list_comments(
    auth: Authorized,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let mut v = Validator::new();
    let recommendation_id = read_id(&mut v, "recommendation_id", params.recommendation_id);
    let filters = params.page.into_filters(&mut v, &SORT_SAFELIST);
    validate_filters(&mut v, &filters);
    v.finish()?;

    let query = CommentQuery {
        recommendation_id,
        created_by: read_string(params.created_by),
        include_private: auth.permissions.includes(RECOMMENDATIONS_WRITE),
    };

    let (data, metadata) = CommentRepo::list(&state.pool, query, &filters).await?;
    tracing::debug!(count = data.len(), total = metadata.total_records, "Listed comments");
    Ok(Json(ListResponse { data, metadata }))
}

// ---------------------------------------------------------------------------
// POST /comments
// ---------------------------------------------------------------------------

/// Comment on an existing recommendation.
pub async fn create_comment(
    auth: Authorized,
    State(state): State<AppState>,
    Json(input): Json<CreateComment>,
) -> AppResult<impl IntoResponse> {
    auth.require(COMMENTS_WRITE)?;

    let mut v = Validator::new();
    validate_comment(&mut v, input.recommendation_id, &input.content);
    v.finish()?;

    // 404 for an unknown recommendation rather than a foreign-key failure.
    RecommendationRepo::get(&state.pool, input.recommendation_id).await?;

    let created = CommentRepo::create(&state.pool, auth.user.user_id, &input).await?;
    tracing::info!(
        id = created.id,
        recommendation_id = created.recommendation_id,
        "Comment created"
    );

    let location = format!("/api/v1/comments/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(DataResponse { data: created }),
    ))
}

// ---------------------------------------------------------------------------
// PATCH /comments/{id}
// ---------------------------------------------------------------------------

pub async fn update_comment(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
    headers: HeaderMap,
    Json(input): Json<UpdateComment>,
) -> AppResult<impl IntoResponse> {
    auth.require(COMMENTS_WRITE)?;

    let mut comment = CommentRepo::get(&state.pool, id).await?;
    check_expected_version(&headers, "Comment", id, comment.version)?;

    if let Some(content) = input.content {
        comment.content = content;
    }

    let mut v = Validator::new();
    validate_comment(&mut v, comment.recommendation_id, &comment.content);
    v.finish()?;

    CommentRepo::update(&state.pool, &mut comment).await?;
    tracing::info!(id, version = comment.version, "Comment updated");
    Ok(Json(DataResponse { data: comment }))
}

// ---------------------------------------------------------------------------
// DELETE /comments/{id}
// ---------------------------------------------------------------------------

pub async fn delete_comment(
    auth: Authorized,
    State(state): State<AppState>,
    PathId(id): PathId,
) -> AppResult<StatusCode> {
    auth.require(COMMENTS_WRITE)?;

    CommentRepo::delete(&state.pool, id).await?;
    tracing::info!(id, "Comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
