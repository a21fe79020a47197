//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&DbPool` as the first argument.

pub mod line_repo;
pub mod page_repo;
pub mod user_repo;

pub use line_repo::LineRepo;
pub use page_repo::PageRepo;
pub use user_repo::UserRepo;
