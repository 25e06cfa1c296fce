//! Response envelopes shared by all handlers.
//!
//! Single items are wrapped as `{ "data": ... }`, pages of a list as
//! `{ "data": [...], "metadata": {...} }`.

use serde::Serialize;
use songbook_core::pagination::Metadata;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// One page of a list endpoint plus its pagination metadata.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    pub metadata: Metadata,
}
