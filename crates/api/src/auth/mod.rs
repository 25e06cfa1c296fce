//! Bearer-token identity.
//!
//! - [`jwt`] -- HS256 access-token encoding and validation.

pub mod jwt;
