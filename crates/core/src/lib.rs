//! Domain logic shared by the database and HTTP layers.
//!
//! Nothing in this crate performs I/O: it holds the id/timestamp aliases,
//! the error taxonomy, filter and pagination parameters, the sort safelist
//! resolver, and the per-entity field validators.

pub mod comment;
pub mod error;
pub mod pagination;
pub mod patch;
pub mod permissions;
pub mod recommendation;
pub mod reservation;
pub mod types;
pub mod validator;
