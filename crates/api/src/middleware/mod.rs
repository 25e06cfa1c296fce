//! Request extractors.
//!
//! - [`auth::AuthUser`] -- the user identified by a JWT Bearer token.
//! - [`permissions::Authorized`] -- an [`auth::AuthUser`] with their permission codes loaded.
//! - [`path_id::PathId`] -- the record id of an item route.

pub mod auth;
pub mod path_id;
pub mod permissions;
