//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - Update DTOs for the writes the workflow performs

pub mod line;
pub mod page;
pub mod user;
