//! Generic versioned entity store.
//!
//! Every mutable entity (recommendations, reservations, comments) shares the
//! same persistence rules:
//!
//! - `id`, `created_at` and `version = 1` are assigned by the database on
//!   insert, and the owner is set once from the acting user.
//! - Updates are a single conditional statement,
//!   `UPDATE .. SET .., version = version + 1 WHERE id = $n AND version = $m`.
//!   Zero matched rows means another writer got there first and is reported
//!   as [`StoreError::EditConflict`]. No row lock is held between the
//!   caller's read and its write.
//! - Lists run one statement that filters with bound predicates, counts the
//!   full match set with `count(*) OVER()`, orders by a safelisted column with
//!   `id DESC` as tie-break, and applies `LIMIT`/`OFFSET`.
//! - Every statement runs under [`QUERY_TIMEOUT`]. Dropping the returned
//!   future cancels the statement.
//!
//! Entity tables are always aliased `e` and joined to their owner as `u`.
//! The only text spliced into SQL comes from the `const` items of the traits
//! below and from [`Filters::sort_clause`]; every value is bound.

use std::future::Future;
use std::time::Duration;

use songbook_core::pagination::{calculate_metadata, Filters, Metadata};
use songbook_core::types::{DbId, Version};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, PgPool, Postgres, Row};

/// Upper bound on the run time of a single store operation.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(3);

/// Join from an entity row (`e`) to its owner (`u`).
pub(crate) const OWNER_JOIN: &str = "INNER JOIN users u ON u.id = e.user_id";

/// Owner columns, aliased to match [`crate::models::owner::Owner`].
const OWNER_COLUMNS: &str =
    "e.user_id AS owner_id, u.name AS owner_name, u.username AS owner_username";

/// A bindable `sqlx` query producing rows of type `O`.
pub type PgQueryAs<'q, O> = QueryAs<'q, Postgres, O, PgArguments>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The id is below 1, was never inserted, or has been deleted.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The presented version no longer matches the stored one.
    #[error("{entity} with id {id} was modified by another request")]
    EditConflict { entity: &'static str, id: DbId },

    #[error("Query did not complete within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Entity traits
// ---------------------------------------------------------------------------

/// A row type stored with an owner and an optimistic-concurrency version.
pub trait VersionedEntity: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin {
    /// Name used in errors and log fields.
    const ENTITY: &'static str;

    const TABLE: &'static str;

    /// Entity-specific select columns, qualified with `e.`.
    const COLUMNS: &'static str;

    /// `SET` assignments for the updatable columns, numbered from `$1`.
    const UPDATE_ASSIGNMENTS: &'static str;

    /// Number of placeholders in [`Self::UPDATE_ASSIGNMENTS`].
    const UPDATE_PARAMS: usize;

    fn id(&self) -> DbId;

    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);

    /// Bind the updatable fields in the order of [`Self::UPDATE_ASSIGNMENTS`].
    fn bind_update<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O>;
}

/// Insert payload for a [`VersionedEntity`].
pub trait NewEntity: Send + Sync {
    type Entity: VersionedEntity;

    /// Entity-specific insert columns. The owner column comes first and is
    /// bound as `$1`, so these take `$2` onwards.
    const INSERT_COLUMNS: &'static str;

    /// Number of columns in [`Self::INSERT_COLUMNS`].
    const INSERT_PARAMS: usize;

    fn bind_insert<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O>;
}

/// Optional list predicates for a [`VersionedEntity`].
///
/// Predicates are written as `(<expr> = $n OR $n IS NULL)` so one statement
/// serves both the filtered and unfiltered case; an unset filter is bound as
/// SQL `NULL`.
pub trait ListQuery: Send {
    type Entity: VersionedEntity;

    /// `WHERE` body, numbered from `$1`.
    const PREDICATES: &'static str;

    /// Number of placeholders in [`Self::PREDICATES`].
    const PARAMS: usize;

    fn bind<'q, O>(self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O>;
}

/// One list row plus the window count of the whole match set.
struct Counted<E> {
    total_records: i64,
    entity: E,
}

impl<'r, E> FromRow<'r, PgRow> for Counted<E>
where
    E: FromRow<'r, PgRow>,
{
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            total_records: row.try_get("total_records")?,
            entity: E::from_row(row)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Full select list for an entity joined with its owner.
pub(crate) fn select_list<E: VersionedEntity>() -> String {
    format!(
        "e.id, e.created_at, e.version, {}, {OWNER_COLUMNS}",
        E::COLUMNS
    )
}

/// Run `operation` under [`QUERY_TIMEOUT`].
pub(crate) async fn bounded<T, F>(entity: &'static str, operation: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(QUERY_TIMEOUT, operation).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(entity, timeout = ?QUERY_TIMEOUT, "Store operation timed out");
            Err(StoreError::Timeout(QUERY_TIMEOUT))
        }
    }
}

fn placeholders(range: std::ops::RangeInclusive<usize>) -> String {
    range
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Insert a new entity owned by `owner_id`, returning the stored row.
///
/// The statement inserts and re-selects through a CTE so the returned row
/// carries the database-assigned id, `created_at`, `version` and the joined
/// owner.
pub async fn insert<N: NewEntity>(
    pool: &PgPool,
    owner_id: DbId,
    new: &N,
) -> Result<N::Entity, StoreError> {
    let sql = format!(
        "WITH e AS ( \
             INSERT INTO {table} (user_id, {columns}) \
             VALUES ({values}) \
             RETURNING * \
         ) \
         SELECT {select} FROM e {OWNER_JOIN}",
        table = <N::Entity as VersionedEntity>::TABLE,
        columns = N::INSERT_COLUMNS,
        values = placeholders(1..=N::INSERT_PARAMS + 1),
        select = select_list::<N::Entity>(),
    );

    bounded(<N::Entity as VersionedEntity>::ENTITY, async {
        let query = sqlx::query_as::<_, N::Entity>(&sql).bind(owner_id);
        let entity = new.bind_insert(query).fetch_one(pool).await?;
        Ok(entity)
    })
    .await
}

/// Fetch one entity with its owner.
///
/// Ids below 1 are rejected as [`StoreError::NotFound`] without a query.
pub async fn get<E: VersionedEntity>(pool: &PgPool, id: DbId) -> Result<E, StoreError> {
    if id < 1 {
        return Err(StoreError::NotFound {
            entity: E::ENTITY,
            id,
        });
    }

    let sql = format!(
        "SELECT {} FROM {} e {OWNER_JOIN} WHERE e.id = $1",
        select_list::<E>(),
        E::TABLE,
    );

    bounded(E::ENTITY, async {
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or(StoreError::NotFound {
                entity: E::ENTITY,
                id,
            })
    })
    .await
}

/// Write the updatable fields of `entity` if its version is still current.
///
/// On success the incremented version is written back into `entity`, so a
/// caller can chain another update without re-fetching. A stale version
/// yields [`StoreError::EditConflict`] and leaves the stored row untouched.
pub async fn update<E: VersionedEntity>(pool: &PgPool, entity: &mut E) -> Result<(), StoreError> {
    let id = entity.id();
    let presented = entity.version();
    let sql = format!(
        "UPDATE {table} \
         SET {assignments}, version = version + 1 \
         WHERE id = ${id_param} AND version = ${version_param} \
         RETURNING version",
        table = E::TABLE,
        assignments = E::UPDATE_ASSIGNMENTS,
        id_param = E::UPDATE_PARAMS + 1,
        version_param = E::UPDATE_PARAMS + 2,
    );

    let current: &E = entity;
    let row = bounded(E::ENTITY, async move {
        let query = sqlx::query_as::<_, (Version,)>(&sql);
        let row = current
            .bind_update(query)
            .bind(id)
            .bind(presented)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    })
    .await?;

    match row {
        Some((version,)) => {
            entity.set_version(version);
            Ok(())
        }
        None => {
            tracing::debug!(entity = E::ENTITY, id, presented, "Edit conflict");
            Err(StoreError::EditConflict {
                entity: E::ENTITY,
                id,
            })
        }
    }
}

/// Permanently delete an entity.
///
/// Deleting a missing id, including one deleted earlier, is
/// [`StoreError::NotFound`].
pub async fn delete<E: VersionedEntity>(pool: &PgPool, id: DbId) -> Result<(), StoreError> {
    if id < 1 {
        return Err(StoreError::NotFound {
            entity: E::ENTITY,
            id,
        });
    }

    let sql = format!("DELETE FROM {} WHERE id = $1", E::TABLE);

    let result = bounded(E::ENTITY, async {
        Ok(sqlx::query(&sql).bind(id).execute(pool).await?)
    })
    .await?;

    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound {
            entity: E::ENTITY,
            id,
        });
    }
    Ok(())
}

/// List one page of entities matching `query`, with pagination metadata.
///
/// `filters` must have passed
/// [`validate_filters`](songbook_core::pagination::validate_filters); an
/// unsafelisted sort token panics in [`Filters::sort_clause`] before any SQL
/// is built.
pub async fn list<Q: ListQuery>(
    pool: &PgPool,
    query: Q,
    filters: &Filters,
) -> Result<(Vec<Q::Entity>, Metadata), StoreError> {
    let sort = filters.sort_clause();
    let sql = format!(
        "SELECT count(*) OVER() AS total_records, {select} \
         FROM {table} e {OWNER_JOIN} \
         WHERE {predicates} \
         ORDER BY {order}, e.id DESC \
         LIMIT ${limit_param} OFFSET ${offset_param}",
        select = select_list::<Q::Entity>(),
        table = <Q::Entity as VersionedEntity>::TABLE,
        predicates = Q::PREDICATES,
        order = sort.to_sql(),
        limit_param = Q::PARAMS + 1,
        offset_param = Q::PARAMS + 2,
    );

    let rows = bounded(<Q::Entity as VersionedEntity>::ENTITY, async {
        let page = sqlx::query_as::<_, Counted<Q::Entity>>(&sql);
        let rows = query
            .bind(page)
            .bind(filters.limit())
            .bind(filters.offset())
            .fetch_all(pool)
            .await?;
        Ok(rows)
    })
    .await?;

    let total_records = rows.first().map_or(0, |row| row.total_records);
    let metadata = calculate_metadata(total_records, filters.page, filters.page_size);
    let entities = rows.into_iter().map(|row| row.entity).collect();

    Ok((entities, metadata))
}
