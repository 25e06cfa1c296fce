//! Row structs and request DTOs, one module per table.

pub mod comment;
pub mod owner;
pub mod recommendation;
pub mod reservation;
pub mod user;
