//! Permission codes and the per-user permission set.

/// Read single recommendations.
pub const RECOMMENDATIONS_READ: &str = "recommendations:read";

/// Create, edit and delete recommendations; also grants visibility of
/// private recommendations in listings.
pub const RECOMMENDATIONS_WRITE: &str = "recommendations:write";

/// Read reservations.
pub const RESERVATIONS_READ: &str = "reservations:read";

/// Create, edit and delete reservations.
pub const RESERVATIONS_WRITE: &str = "reservations:write";

/// Create, edit and delete comments.
pub const COMMENTS_WRITE: &str = "comments:write";

/// All known permission codes.
pub const ALL_PERMISSIONS: &[&str] = &[
    RECOMMENDATIONS_READ,
    RECOMMENDATIONS_WRITE,
    RESERVATIONS_READ,
    RESERVATIONS_WRITE,
    COMMENTS_WRITE,
];

/// The permission codes granted to one user.
#[derive(Debug, Clone, Default)]
pub struct Permissions(Vec<String>);

impl Permissions {
    pub fn new(codes: Vec<String>) -> Self {
        Self(codes)
    }

    pub fn includes(&self, code: &str) -> bool {
        self.0.iter().any(|c| c == code)
    }
}
