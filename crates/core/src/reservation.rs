//! Reservation field rules and list sort keys.

use std::sync::LazyLock;

use regex::Regex;

use crate::pagination::{SortKey, SortSafelist};
use crate::types::{DbId, Timestamp};
use crate::validator::Validator;

/// Maximum length in bytes of `title`.
pub const MAX_TITLE_LEN: usize = 128;

/// Maximum length in bytes of `description`.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Calendar colours are `#RRGGBB` hex triplets.
pub const COLOR_PATTERN: &str = r"^#[0-9A-Fa-f]{6}$";

static COLOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COLOR_PATTERN).expect("valid regex"));

/// Sort keys accepted by `GET /reservations`.
pub static SORT_SAFELIST: SortSafelist = SortSafelist::new(&[
    SortKey {
        token: "created_at",
        column: "e.created_at",
    },
    SortKey {
        token: "start_time",
        column: "e.start_time",
    },
    SortKey {
        token: "title",
        column: "e.title",
    },
]);

/// Borrowed view of the validated fields of a reservation.
///
/// `id` is `None` for a reservation that has not been stored yet.
#[derive(Debug, Clone, Copy)]
pub struct ReservationDraft<'a> {
    pub id: Option<DbId>,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub color: Option<&'a str>,
    pub parent_reservation_id: Option<DbId>,
}

pub fn validate_reservation(v: &mut Validator, r: &ReservationDraft<'_>) {
    v.check(!r.title.is_empty(), "title", "must be provided");
    v.check(
        r.title.len() <= MAX_TITLE_LEN,
        "title",
        format!("must not be more than {MAX_TITLE_LEN} bytes long"),
    );

    if let Some(description) = r.description {
        v.check(
            description.len() <= MAX_DESCRIPTION_LEN,
            "description",
            format!("must not be more than {MAX_DESCRIPTION_LEN} bytes long"),
        );
    }

    v.check(
        r.end_time > r.start_time,
        "end_time",
        "must be after start_time",
    );

    if let Some(color) = r.color {
        v.check(
            COLOR_RE.is_match(color),
            "color",
            "must be a hex colour like #1a2b3c",
        );
    }

    if let Some(parent_id) = r.parent_reservation_id {
        v.check(parent_id > 0, "parent_reservation_id", "must be a valid id");
        v.check(
            r.id != Some(parent_id),
            "parent_reservation_id",
            "must not reference the reservation itself",
        );
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn start() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 3, 14, 18, 0, 0).unwrap()
    }

    fn draft() -> ReservationDraft<'static> {
        ReservationDraft {
            id: None,
            title: "Listening party",
            description: None,
            start_time: start(),
            end_time: start() + Duration::hours(2),
            color: Some("#ff8800"),
            parent_reservation_id: None,
        }
    }

    fn failed_fields(d: &ReservationDraft<'_>) -> Vec<String> {
        let mut v = Validator::new();
        validate_reservation(&mut v, d);
        v.errors().iter().map(|e| e.field.clone()).collect()
    }

    #[test]
    fn accepts_valid_reservation() {
        assert!(failed_fields(&draft()).is_empty());
    }

    #[test]
    fn end_must_follow_start() {
        let d = ReservationDraft {
            end_time: start(),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["end_time"]);

        let d = ReservationDraft {
            end_time: start() - Duration::minutes(1),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["end_time"]);
    }

    #[test]
    fn rejects_malformed_color() {
        for color in ["red", "#fff", "#12345g", "ff8800"] {
            let d = ReservationDraft {
                color: Some(color),
                ..draft()
            };
            assert_eq!(failed_fields(&d), vec!["color"], "color {color:?}");
        }
    }

    #[test]
    fn rejects_self_parent() {
        let d = ReservationDraft {
            id: Some(7),
            parent_reservation_id: Some(7),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["parent_reservation_id"]);
    }

    #[test]
    fn collects_multiple_failures() {
        let long = "d".repeat(MAX_DESCRIPTION_LEN + 1);
        let d = ReservationDraft {
            title: "",
            description: Some(&long),
            end_time: start(),
            parent_reservation_id: Some(0),
            ..draft()
        };
        assert_eq!(
            failed_fields(&d),
            vec!["title", "description", "end_time", "parent_reservation_id"]
        );
    }
}
