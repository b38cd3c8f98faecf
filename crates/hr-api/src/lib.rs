//! HR assistant API: library crate for the REST server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `hr-e2e-tests`) can access `AppState`, `build_router` and the
//! concrete collaborators.

pub mod config;
pub mod error;
pub mod mailer;
pub mod routes;
pub mod state;
pub mod w2;
