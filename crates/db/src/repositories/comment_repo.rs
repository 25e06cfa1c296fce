//! Repository for the `comments` table.

use songbook_core::pagination::{Filters, Metadata};
use songbook_core::types::{DbId, Version};
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentQuery, CreateComment};
use crate::store::{
    self, bounded, select_list, ListQuery, NewEntity, PgQueryAs, StoreError, VersionedEntity,
    OWNER_JOIN,
};

impl VersionedEntity for Comment {
    const ENTITY: &'static str = "Comment";
    const TABLE: &'static str = "comments";
    const COLUMNS: &'static str = "e.recommendation_id, e.content";
    const UPDATE_ASSIGNMENTS: &'static str = "content = $1";
    const UPDATE_PARAMS: usize = 1;

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
        query.bind(&self.content)
    }
}

impl NewEntity for CreateComment {
    type Entity = Comment;

    const INSERT_COLUMNS: &'static str = "recommendation_id, content";
    const INSERT_PARAMS: usize = 2;

    fn bind_insert<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query.bind(self.recommendation_id).bind(&self.content)
    }
}

impl ListQuery for CommentQuery {
    type Entity = Comment;

    const PREDICATES: &'static str = "\
        (e.recommendation_id = $1::bigint OR $1::bigint IS NULL) \
        AND (LOWER(u.username) = LOWER($2::text) OR $2::text IS NULL) \
        AND ($3::boolean OR EXISTS ( \
             SELECT 1 FROM recommendations r \
             WHERE r.id = e.recommendation_id AND r.is_public))";
    const PARAMS: usize = 3;

    fn bind<'q, O>(self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.recommendation_id)
            .bind(self.created_by)
            .bind(self.include_private)
    }
}

/// Provides CRUD and list operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateComment,
    ) -> Result<Comment, StoreError> {
        store::insert(pool, owner_id, input).await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Comment, StoreError> {
        store::get(pool, id).await
    }

    pub async fn update(pool: &PgPool, comment: &mut Comment) -> Result<(), StoreError> {
        store::update(pool, comment).await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), StoreError> {
        store::delete::<Comment>(pool, id).await
    }

    pub async fn list(
        pool: &PgPool,
        query: CommentQuery,
        filters: &Filters,
    ) -> Result<(Vec<Comment>, Metadata), StoreError> {
        store::list(pool, query, filters).await
    }

    /// All comments on one recommendation, oldest first.
    pub async fn list_for_recommendation(
        pool: &PgPool,
        recommendation_id: DbId,
    ) -> Result<Vec<Comment>, StoreError> {
        let query = format!(
            "SELECT {} FROM comments e {OWNER_JOIN} \
             WHERE e.recommendation_id = $1 \
             ORDER BY e.created_at ASC, e.id ASC",
            select_list::<Comment>()
        );
        bounded(Comment::ENTITY, async {
            Ok(sqlx::query_as::<_, Comment>(&query)
                .bind(recommendation_id)
                .fetch_all(pool)
                .await?)
        })
        .await
    }
}
