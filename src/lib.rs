//! # Supply Diagnostic
//!
//! Backend for a supply-chain self-assessment questionnaire.
//!
//! A respondent rates a fixed catalog of statements on a 1-5 scale. The
//! service averages the answers per dimension, asks a language model for
//! three short pieces of consultant-style feedback (falling back to
//! placeholder text when the model is unavailable), and appends the whole
//! submission to a JSON document. Administrators can list submissions and
//! see averages across all of them.

pub mod catalog;
pub mod config;
pub mod feedback;
pub mod llms;
pub mod scoring;
pub mod server;
pub mod store;
pub mod types;
pub mod utilities;

/// Crate version reported by `/health`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use catalog::{Statement, StatementCatalog};
pub use config::AppConfig;
pub use feedback::{FeedbackGenerator, FeedbackOutcome, FeedbackSource};
pub use scoring::{calculate_dimension_scores, AdminStats, DimensionScore, DimensionScores};
pub use store::{JsonFileStore, SubmissionStore};
pub use types::{Answer, Feedback, Submission, UserInfo};
