//! Reservation models and DTOs.

use serde::{Deserialize, Serialize};
use songbook_core::patch::Patch;
use songbook_core::reservation::ReservationDraft;
use songbook_core::types::{DbId, Timestamp, Version};
use sqlx::FromRow;

use super::owner::Owner;

/// A row from the `reservations` table joined with its owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub created_at: Timestamp,
    #[sqlx(flatten)]
    pub created_by: Owner,
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub color: Option<String>,
    pub parent_reservation_id: Option<DbId>,
    pub version: Version,
}

impl Reservation {
    pub fn draft(&self) -> ReservationDraft<'_> {
        ReservationDraft {
            id: Some(self.id),
            title: &self.title,
            description: self.description.as_deref(),
            start_time: self.start_time,
            end_time: self.end_time,
            color: self.color.as_deref(),
            parent_reservation_id: self.parent_reservation_id,
        }
    }
}

/// DTO for creating a reservation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReservation {
    pub title: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub color: Option<String>,
    pub parent_reservation_id: Option<DbId>,
}

impl CreateReservation {
    pub fn draft(&self) -> ReservationDraft<'_> {
        ReservationDraft {
            id: None,
            title: &self.title,
            description: self.description.as_deref(),
            start_time: self.start_time,
            end_time: self.end_time,
            color: self.color.as_deref(),
            parent_reservation_id: self.parent_reservation_id,
        }
    }
}

/// DTO for a partial update. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateReservation {
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    pub start_time: Option<Timestamp>,
    pub end_time: Option<Timestamp>,
    #[serde(default)]
    pub color: Patch<String>,
    #[serde(default)]
    pub parent_reservation_id: Patch<DbId>,
}

impl UpdateReservation {
    pub fn apply_to(self, target: &mut Reservation) {
        if let Some(title) = self.title {
            target.title = title;
        }
        self.description.apply_to(&mut target.description);
        if let Some(start_time) = self.start_time {
            target.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            target.end_time = end_time;
        }
        self.color.apply_to(&mut target.color);
        self.parent_reservation_id
            .apply_to(&mut target.parent_reservation_id);
    }
}

/// List filters for reservations. `None` disables a filter.
#[derive(Debug, Clone, Default)]
pub struct ReservationQuery {
    /// Owner username, matched case-insensitively.
    pub created_by: Option<String>,
    /// Only reservations that end after this instant.
    pub from: Option<Timestamp>,
    /// Only reservations that start before this instant.
    pub to: Option<Timestamp>,
    pub parent_reservation_id: Option<DbId>,
}
