//! Structured narrative feedback returned to the user.

use serde::{Deserialize, Serialize};

use super::submission::UserInfo;

/// Default for a missing key observation section.
pub const DEFAULT_KEY_OBSERVATION: &str = "Multiple areas identified for improvement.";

/// Default for a missing first-thing-to-change section.
pub const DEFAULT_FIRST_THING_TO_CHANGE: &str = "Focus on process clarity and ownership.";

/// Default for a missing watch-outs section.
pub const DEFAULT_WATCH_OUTS: &str = "Monitor capacity and decision-making speed.";

/// Feedback derived from a submission's scores. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub key_observation: String,
    pub first_thing_to_change: String,
    pub watch_outs: String,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            key_observation: DEFAULT_KEY_OBSERVATION.to_string(),
            first_thing_to_change: DEFAULT_FIRST_THING_TO_CHANGE.to_string(),
            watch_outs: DEFAULT_WATCH_OUTS.to_string(),
        }
    }
}

impl Feedback {
    /// Fixed feedback used when generation is unavailable or fails.
    pub fn placeholder(user_info: &UserInfo) -> Self {
        Self {
            key_observation: format!(
                "Thank you for completing the diagnostic, {}. Your answers point to a need for \
                 stronger end-to-end visibility and clearer ownership of each process, a common \
                 challenge for growing organizations.",
                user_info.display_name()
            ),
            first_thing_to_change: "Establish clear decision-making authority for each key \
                process. Start by writing down who owns each critical decision point in your \
                supply chain flow."
                .to_string(),
            watch_outs: "Watch for capacity constraints as you scale. Check how well your current \
                processes handle volume increases, and make sure your team has room for \
                strategic work, not just firefighting."
                .to_string(),
        }
    }
}
