//! Recommendation field rules and list sort keys.

use crate::pagination::{SortKey, SortSafelist};
use crate::validator::Validator;

/// Maximum length in bytes of `artist` and `title`.
pub const MAX_NAME_LEN: usize = 128;

/// Maximum length in bytes of any link field.
pub const MAX_LINK_LEN: usize = 2048;

/// Maximum length in bytes of the free-text `comment`.
pub const MAX_COMMENT_LEN: usize = 1024;

/// Sort keys accepted by `GET /recommendations`.
pub static SORT_SAFELIST: SortSafelist = SortSafelist::new(&[
    SortKey {
        token: "created_at",
        column: "e.created_at",
    },
    SortKey {
        token: "created_by",
        column: "u.username",
    },
    SortKey {
        token: "title",
        column: "e.title",
    },
    SortKey {
        token: "artist",
        column: "e.artist",
    },
]);

/// Borrowed view of the validated fields of a recommendation.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationDraft<'a> {
    pub artist: &'a str,
    pub title: &'a str,
    pub cover_url: Option<&'a str>,
    pub yt_link: Option<&'a str>,
    pub spotify_link: Option<&'a str>,
    pub comment: Option<&'a str>,
}

pub fn validate_recommendation(v: &mut Validator, r: &RecommendationDraft<'_>) {
    v.check(!r.artist.is_empty(), "artist", "must be provided");
    v.check(
        r.artist.len() <= MAX_NAME_LEN,
        "artist",
        format!("must not be more than {MAX_NAME_LEN} bytes long"),
    );

    v.check(!r.title.is_empty(), "title", "must be provided");
    v.check(
        r.title.len() <= MAX_NAME_LEN,
        "title",
        format!("must not be more than {MAX_NAME_LEN} bytes long"),
    );

    let has_link = [r.yt_link, r.spotify_link]
        .iter()
        .any(|link| link.is_some_and(|l| !l.is_empty()));
    v.check(has_link, "yt_link|spotify_link", "must be provided");

    check_link(v, "cover_url", r.cover_url);
    check_link(v, "yt_link", r.yt_link);
    check_link(v, "spotify_link", r.spotify_link);

    if let Some(comment) = r.comment {
        v.check(
            comment.len() <= MAX_COMMENT_LEN,
            "comment",
            format!("must not be more than {MAX_COMMENT_LEN} bytes long"),
        );
    }
}

/// An empty link is allowed (it is stored as given); anything else must be
/// an http(s) URL within the length limit.
fn check_link(v: &mut Validator, field: &str, link: Option<&str>) {
    let Some(link) = link.filter(|l| !l.is_empty()) else {
        return;
    };
    v.check(
        link.len() <= MAX_LINK_LEN,
        field,
        format!("must not be more than {MAX_LINK_LEN} bytes long"),
    );
    v.check(
        link.starts_with("https://") || link.starts_with("http://"),
        field,
        "must be an http or https URL",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RecommendationDraft<'static> {
        RecommendationDraft {
            artist: "Boards of Canada",
            title: "Roygbiv",
            cover_url: None,
            yt_link: Some("https://youtu.be/abc"),
            spotify_link: None,
            comment: None,
        }
    }

    fn failed_fields(d: &RecommendationDraft<'_>) -> Vec<String> {
        let mut v = Validator::new();
        validate_recommendation(&mut v, d);
        v.errors().iter().map(|e| e.field.clone()).collect()
    }

    #[test]
    fn accepts_valid_recommendation() {
        assert!(failed_fields(&draft()).is_empty());
    }

    #[test]
    fn requires_artist_and_title() {
        let d = RecommendationDraft {
            artist: "",
            title: "",
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["artist", "title"]);
    }

    #[test]
    fn rejects_overlong_title() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let d = RecommendationDraft {
            title: &long,
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["title"]);
    }

    #[test]
    fn requires_at_least_one_link() {
        let d = RecommendationDraft {
            yt_link: None,
            spotify_link: Some(""),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["yt_link|spotify_link"]);
    }

    #[test]
    fn spotify_link_alone_is_enough() {
        let d = RecommendationDraft {
            yt_link: None,
            spotify_link: Some("https://open.spotify.com/track/1"),
            ..draft()
        };
        assert!(failed_fields(&d).is_empty());
    }

    #[test]
    fn rejects_non_http_links() {
        let d = RecommendationDraft {
            cover_url: Some("javascript:alert(1)"),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["cover_url"]);
    }

    #[test]
    fn empty_optional_fields_are_accepted() {
        let d = RecommendationDraft {
            cover_url: Some(""),
            comment: Some(""),
            ..draft()
        };
        assert!(failed_fields(&d).is_empty());
    }

    #[test]
    fn rejects_overlong_comment() {
        let long = "c".repeat(MAX_COMMENT_LEN + 1);
        let d = RecommendationDraft {
            comment: Some(&long),
            ..draft()
        };
        assert_eq!(failed_fields(&d), vec!["comment"]);
    }

    #[test]
    fn safelist_covers_expected_tokens() {
        assert!(SORT_SAFELIST.accepts("-created_at"));
        assert!(SORT_SAFELIST.accepts("created_by"));
        assert!(!SORT_SAFELIST.accepts("is_public"));
    }
}
