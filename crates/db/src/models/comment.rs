//! Comment models and DTOs.

use serde::{Deserialize, Serialize};
use songbook_core::types::{DbId, Timestamp, Version};
use sqlx::FromRow;

use super::owner::Owner;

/// A row from the `comments` table joined with its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub created_at: Timestamp,
    pub recommendation_id: DbId,
    #[sqlx(flatten)]
    pub created_by: Owner,
    pub content: String,
    pub version: Version,
}

/// DTO for creating a comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub recommendation_id: DbId,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComment {
    pub content: Option<String>,
}

/// List filters for comments. `None` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct CommentQuery {
    pub recommendation_id: Option<DbId>,
    /// Owner username, matched case-insensitively.
    pub created_by: Option<String>,
    /// Also list comments on private recommendations.
    pub include_private: bool,
}
