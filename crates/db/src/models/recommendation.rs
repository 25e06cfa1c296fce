//! Recommendation models and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use songbook_core::patch::Patch;
use songbook_core::recommendation::RecommendationDraft;
use songbook_core::types::{DbId, Timestamp, Version};
use sqlx::FromRow;

use super::owner::Owner;

/// A row from the `recommendations` table joined with its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Recommendation {
    pub id: DbId,
    pub created_at: Timestamp,
    #[sqlx(flatten)]
    pub created_by: Owner,
    pub artist: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub yt_link: Option<String>,
    pub spotify_link: Option<String>,
    pub comment: Option<String>,
    pub is_public: bool,
    pub version: Version,
}

impl Recommendation {
    pub fn draft(&self) -> RecommendationDraft<'_> {
        RecommendationDraft {
            artist: &self.artist,
            title: &self.title,
            cover_url: self.cover_url.as_deref(),
            yt_link: self.yt_link.as_deref(),
            spotify_link: self.spotify_link.as_deref(),
            comment: self.comment.as_deref(),
        }
    }
}

/// DTO for creating a recommendation.
///
/// Absent optional fields are stored as `NULL`; an explicit empty string is
/// stored as given.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRecommendation {
    pub artist: String,
    pub title: String,
    pub cover_url: Option<String>,
    pub yt_link: Option<String>,
    pub spotify_link: Option<String>,
    pub comment: Option<String>,
    #[serde(default)]
    pub is_public: bool,
}

impl CreateRecommendation {
    pub fn draft(&self) -> RecommendationDraft<'_> {
        RecommendationDraft {
            artist: &self.artist,
            title: &self.title,
            cover_url: self.cover_url.as_deref(),
            yt_link: self.yt_link.as_deref(),
            spotify_link: self.spotify_link.as_deref(),
            comment: self.comment.as_deref(),
        }
    }
}

/// DTO for a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateRecommendation {
    pub artist: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub cover_url: Patch<String>,
    #[serde(default)]
    pub yt_link: Patch<String>,
    #[serde(default)]
    pub spotify_link: Patch<String>,
    #[serde(default)]
    pub comment: Patch<String>,
    pub is_public: Option<bool>,
}

impl UpdateRecommendation {
    pub fn apply_to(self, target: &mut Recommendation) {
        if let Some(artist) = self.artist {
            target.artist = artist;
        }
        if let Some(title) = self.title {
            target.title = title;
        }
        self.cover_url.apply_to(&mut target.cover_url);
        self.yt_link.apply_to(&mut target.yt_link);
        self.spotify_link.apply_to(&mut target.spotify_link);
        self.comment.apply_to(&mut target.comment);
        if let Some(is_public) = self.is_public {
            target.is_public = is_public;
        }
    }
}

/// List filters for recommendations. `None` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct RecommendationQuery {
    /// Calendar day (UTC) the recommendation was created on.
    pub created_on: Option<NaiveDate>,
    /// Owner username, matched case-insensitively.
    pub created_by: Option<String>,
    /// Full-text match against the title.
    pub title: Option<String>,
    /// Include recommendations with `is_public = false`.
    pub include_private: bool,
}
