//! Repository for the `recommendations` table.

use songbook_core::pagination::{Filters, Metadata};
use songbook_core::types::{DbId, Version};
use sqlx::PgPool;

use crate::models::recommendation::{CreateRecommendation, Recommendation, RecommendationQuery};
use crate::store::{self, ListQuery, NewEntity, PgQueryAs, StoreError, VersionedEntity};

impl VersionedEntity for Recommendation {
    const ENTITY: &'static str = "Recommendation";
    const TABLE: &'static str = "recommendations";
    const COLUMNS: &'static str = "e.artist, e.title, e.cover_url, e.yt_link, e.spotify_link, \
         e.comment, e.is_public";
    const UPDATE_ASSIGNMENTS: &'static str = "artist = $1, title = $2, cover_url = $3, \
         yt_link = $4, spotify_link = $5, comment = $6, is_public = $7";
    const UPDATE_PARAMS: usize = 7;

    fn id(&self) -> DbId {
        self.id
    }

    fn version(&self) -> Version {
        self.version
    }

    fn set_version(&mut self, version: Version) {
        self.version = version;
    }

    fn bind_update<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(&self.artist)
            .bind(&self.title)
            .bind(&self.cover_url)
            .bind(&self.yt_link)
            .bind(&self.spotify_link)
            .bind(&self.comment)
            .bind(self.is_public)
    }
}

impl NewEntity for CreateRecommendation {
    type Entity = Recommendation;

    const INSERT_COLUMNS: &'static str =
        "artist, title, cover_url, yt_link, spotify_link, comment, is_public";
    const INSERT_PARAMS: usize = 7;

    fn bind_insert<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(&self.artist)
            .bind(&self.title)
            .bind(&self.cover_url)
            .bind(&self.yt_link)
            .bind(&self.spotify_link)
            .bind(&self.comment)
            .bind(self.is_public)
    }
}

impl ListQuery for RecommendationQuery {
    type Entity = Recommendation;

    const PREDICATES: &'static str = "\
        ((e.created_at AT TIME ZONE 'UTC')::date = $1::date OR $1::date IS NULL) \
        AND (LOWER(u.username) = LOWER($2::text) OR $2::text IS NULL) \
        AND (to_tsvector('simple', e.title) @@ plainto_tsquery('simple', $3::text) \
             OR $3::text IS NULL) \
        AND ($4::boolean OR e.is_public)";
    const PARAMS: usize = 4;

    fn bind<'q, O>(self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.created_on)
            .bind(self.created_by)
            .bind(self.title)
            .bind(self.include_private)
    }
}

/// Provides CRUD and list operations for recommendations.
pub struct RecommendationRepo;

impl RecommendationRepo {
    /// Insert a new recommendation owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateRecommendation,
    ) -> Result<Recommendation, StoreError> {
        store::insert(pool, owner_id, input).await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Recommendation, StoreError> {
        store::get(pool, id).await
    }

    /// Persist `recommendation` if its version is current; bumps the version
    /// in place on success.
    pub async fn update(
        pool: &PgPool,
        recommendation: &mut Recommendation,
    ) -> Result<(), StoreError> {
        store::update(pool, recommendation).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), StoreError> {
        store::delete::<Recommendation>(pool, id).await
    }

    /// List one page of recommendations matching `query`.
    pub async fn list(
        pool: &PgPool,
        query: RecommendationQuery,
        filters: &Filters,
    ) -> Result<(Vec<Recommendation>, Metadata), StoreError> {
        store::list(pool, query, filters).await
    }
}
