//! Comment field rules and list sort keys.

use crate::pagination::{SortKey, SortSafelist};
use crate::types::DbId;
use crate::validator::Validator;

/// Comment bodies must stay strictly below this many bytes.
pub const MAX_CONTENT_LEN: usize = 1024;

/// Sort keys accepted by `GET /comments`.
pub static SORT_SAFELIST: SortSafelist = SortSafelist::new(&[SortKey {
    token: "created_at",
    column: "e.created_at",
}]);

pub fn validate_comment(v: &mut Validator, recommendation_id: DbId, content: &str) {
    v.check(
        recommendation_id > 0,
        "recommendation_id",
        "must be provided",
    );
    v.check(!content.is_empty(), "content", "must be provided");
    v.check(
        content.len() < MAX_CONTENT_LEN,
        "content",
        format!("must be less than {MAX_CONTENT_LEN} bytes long"),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed_fields(recommendation_id: DbId, content: &str) -> Vec<String> {
        let mut v = Validator::new();
        validate_comment(&mut v, recommendation_id, content);
        v.errors().iter().map(|e| e.field.clone()).collect()
    }

    #[test]
    fn accepts_valid_comment() {
        assert!(failed_fields(1, "great track").is_empty());
    }

    #[test]
    fn requires_content_and_recommendation() {
        assert_eq!(failed_fields(0, ""), vec!["recommendation_id", "content"]);
    }

    #[test]
    fn content_limit_is_exclusive() {
        assert_eq!(
            failed_fields(1, &"a".repeat(MAX_CONTENT_LEN)),
            vec!["content"]
        );
        assert!(failed_fields(1, &"a".repeat(MAX_CONTENT_LEN - 1)).is_empty());
    }
}
