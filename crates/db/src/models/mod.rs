//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Read-side projections joined across tables where a handler needs them

pub mod batch;
pub mod drive;
pub mod participation;
pub mod round;
pub mod round_outcome;
pub mod student;
