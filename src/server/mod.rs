//! HTTP server for the diagnostic questionnaire.
//!
//! The UI shell talks to these endpoints to fetch the statement catalog,
//! score answers, request feedback and persist submissions. Administrative
//! endpoints list submissions and report fleet-wide averages.

pub mod routes;

pub use routes::{app_router, AppState};
