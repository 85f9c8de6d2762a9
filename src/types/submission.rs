//! Questionnaire session and submission records.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::DimensionScores;

/// Identity collected at the start of a session.
///
/// `email` is collected last; a record without it is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
}

impl UserInfo {
    /// Whether the collection flow reached the email step.
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// Name used to address the user, falling back to a neutral greeting.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() {
            "there"
        } else {
            name
        }
    }
}

/// One response to one catalog statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub statement_id: u32,
    pub value: u8,
}

impl Answer {
    pub const MIN_VALUE: u8 = 1;
    pub const MAX_VALUE: u8 = 5;

    pub fn new(statement_id: u32, value: u8) -> Self {
        Self {
            statement_id,
            value,
        }
    }

    /// Whether the value lies on the 1..=5 answer scale.
    pub fn in_range(&self) -> bool {
        (Self::MIN_VALUE..=Self::MAX_VALUE).contains(&self.value)
    }
}

/// A completed, persisted questionnaire.
///
/// Created once and appended to the store; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    pub user_info: UserInfo,
    #[serde(default)]
    pub answers: Vec<Answer>,
    #[serde(default)]
    pub category_scores: DimensionScores,
    #[serde(default)]
    pub timestamp: String,
}

impl Submission {
    /// Build a new submission with a fresh id and the current timestamp.
    pub fn new(user_info: UserInfo, answers: Vec<Answer>, category_scores: DimensionScores) -> Self {
        Self {
            id: generate_submission_id(),
            user_info,
            answers,
            category_scores,
            timestamp: now_timestamp(),
        }
    }

    /// Fill in the id and timestamp when the client left them blank.
    pub fn with_defaults(mut self) -> Self {
        if self.id.trim().is_empty() {
            self.id = generate_submission_id();
        }
        if self.timestamp.trim().is_empty() {
            self.timestamp = now_timestamp();
        }
        self
    }
}

/// `<unix-millis>-<9 lowercase alphanumerics>`.
pub fn generate_submission_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(9)
        .collect();
    format!("{}-{}", millis, suffix)
}

/// Current time as an ISO-8601 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
