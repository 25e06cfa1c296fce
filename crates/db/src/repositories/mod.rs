//! Repositories, one per table.
//!
//! Versioned entities delegate to [`crate::store`]; each repository module
//! supplies the column lists, update assignments and list predicates for its
//! table.

pub mod comment_repo;
pub mod permission_repo;
pub mod recommendation_repo;
pub mod reservation_repo;
pub mod user_repo;

pub use comment_repo::CommentRepo;
pub use permission_repo::PermissionRepo;
pub use recommendation_repo::RecommendationRepo;
pub use reservation_repo::ReservationRepo;
pub use user_repo::UserRepo;
