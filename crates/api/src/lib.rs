//! Scriptorium web server library.
//!
//! Exposes the building blocks (config, state, auth, forms, handlers,
//! routes) so integration tests, the server binary and the operator CLI can
//! all reach them.

pub mod admin;
pub mod auth;
pub mod config;
pub mod cookies;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
