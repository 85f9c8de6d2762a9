//! Natural-language feedback for a finished diagnostic.
//!
//! - [`prompt`] renders the request from identity, answers and scores
//! - [`parser`] pulls labelled sections out of the reply
//! - [`generator`] runs the call and applies the placeholder fallback

pub mod generator;
pub mod parser;
pub mod prompt;

pub use generator::{FeedbackGenerator, FeedbackOutcome, FeedbackSource};
pub use parser::{parse_feedback, Section};
pub use prompt::build_feedback_prompt;
