//! Domain logic for the Scriptorium OCR correction service.
//!
//! Everything in this crate is framework-free so that the DB and API layers
//! (and their tests) share one definition of the workflow rules.

pub mod assignment;
pub mod error;
pub mod line;
pub mod page;
pub mod redirect;
pub mod types;
pub mod workflow;
