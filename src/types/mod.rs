//! Session and record types shared across the service.

pub mod feedback;
pub mod submission;

pub use feedback::Feedback;
pub use submission::{Answer, Submission, UserInfo};
