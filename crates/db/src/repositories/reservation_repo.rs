//! Repository for the `reservations` table.

use songbook_core::pagination::{Filters, Metadata};
use songbook_core::types::{DbId, Version};
use sqlx::PgPool;

use crate::models::reservation::{CreateReservation, Reservation, ReservationQuery};
use crate::store::{self, bounded, ListQuery, NewEntity, PgQueryAs, StoreError, VersionedEntity};

impl VersionedEntity for Reservation {
    const ENTITY: &'static str = "Reservation";
    const TABLE: &'static str = "reservations";
    const COLUMNS: &'static str = "e.title, e.description, e.start_time, e.end_time, e.color, \
         e.parent_reservation_id";
    const UPDATE_ASSIGNMENTS: &'static str = "title = $1, description = $2, start_time = $3, \
         end_time = $4, color = $5, parent_reservation_id = $6";
    const UPDATE_PARAMS: usize = 6;

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
            .bind(&self.title)
            .bind(&self.description)
            .bind(self.start_time)
            .bind(self.end_time)
            .bind(&self.color)
            .bind(self.parent_reservation_id)
    }
}

impl NewEntity for CreateReservation {
    type Entity = Reservation;

    const INSERT_COLUMNS: &'static str =
        "title, description, start_time, end_time, color, parent_reservation_id";
    const INSERT_PARAMS: usize = 6;

    fn bind_insert<'q, O>(&'q self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(&self.title)
            .bind(&self.description)
            .bind(self.start_time)
            .bind(self.end_time)
            .bind(&self.color)
            .bind(self.parent_reservation_id)
    }
}

impl ListQuery for ReservationQuery {
    type Entity = Reservation;

    const PREDICATES: &'static str = "\
        (LOWER(u.username) = LOWER($1::text) OR $1::text IS NULL) \
        AND (e.end_time > $2::timestamptz OR $2::timestamptz IS NULL) \
        AND (e.start_time < $3::timestamptz OR $3::timestamptz IS NULL) \
        AND (e.parent_reservation_id = $4::bigint OR $4::bigint IS NULL)";
    const PARAMS: usize = 4;

    fn bind<'q, O>(self, query: PgQueryAs<'q, O>) -> PgQueryAs<'q, O> {
        query
            .bind(self.created_by)
            .bind(self.from)
            .bind(self.to)
            .bind(self.parent_reservation_id)
    }
}

/// Provides CRUD and list operations for reservations.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Insert a new reservation owned by `owner_id`.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateReservation,
    ) -> Result<Reservation, StoreError> {
        store::insert(pool, owner_id, input).await
    }

    pub async fn get(pool: &PgPool, id: DbId) -> Result<Reservation, StoreError> {
        store::get(pool, id).await
    }

    pub async fn update(pool: &PgPool, reservation: &mut Reservation) -> Result<(), StoreError> {
        store::update(pool, reservation).await
    }

    /// Delete a reservation. Children keep existing with their parent link
    /// cleared.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<(), StoreError> {
        store::delete::<Reservation>(pool, id).await
    }

    /// Whether `id` appears on the parent chain that starts at `parent_id`
    /// (inclusive). Linking `id` under such a parent would form a cycle.
    pub async fn chain_contains(
        pool: &PgPool,
        parent_id: DbId,
        id: DbId,
    ) -> Result<bool, StoreError> {
        bounded(Reservation::ENTITY, async {
            Ok(sqlx::query_scalar::<_, bool>(
                "WITH RECURSIVE chain (id, parent_reservation_id) AS ( \
                     SELECT id, parent_reservation_id FROM reservations WHERE id = $1 \
                     UNION \
                     SELECT r.id, r.parent_reservation_id \
                     FROM reservations r JOIN chain c ON r.id = c.parent_reservation_id \
                 ) \
                 SELECT EXISTS (SELECT 1 FROM chain WHERE id = $2)",
            )
            .bind(parent_id)
            .bind(id)
            .fetch_one(pool)
            .await?)
        })
        .await
    }

    /// List one page of reservations matching `query`.
    pub async fn list(
        pool: &PgPool,
        query: ReservationQuery,
        filters: &Filters,
    ) -> Result<(Vec<Reservation>, Metadata), StoreError> {
        store::list(pool, query, filters).await
    }
}
