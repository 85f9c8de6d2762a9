//! Statement definition, the unit of the diagnostic questionnaire.

use serde::{Deserialize, Serialize};

/// How the user answers a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerKind {
    /// 1 to 5 agreement scale.
    Scale,
    /// Yes scores 5, No scores 1.
    #[serde(alias = "yes-no")]
    YesNo,
    /// Pick one labelled choice; each carries its own value.
    Dropdown,
}

/// One labelled dropdown option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropdownChoice {
    pub label: String,
    pub value: u8,
}

/// A scorable statement in the catalog.
///
/// Example YAML:
/// ```yaml
/// - id: 5
///   dimension: Process Ownership
///   question: "Do you have documented procedures?"
///   answerKind: yesNo
///   interpretation: "A No means the process lives in people's heads."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    /// Stable identifier referenced by answers.
    pub id: u32,
    /// Grouping key for scoring.
    pub dimension: String,
    pub question: String,
    pub answer_kind: AnswerKind,
    /// Only populated for dropdown statements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dropdown_choices: Vec<DropdownChoice>,
    /// Note on what a low or high answer means; fed to the feedback prompt.
    pub interpretation: String,
}

impl Statement {
    pub const YES_VALUE: u8 = 5;
    pub const NO_VALUE: u8 = 1;

    /// The dropdown choice carrying `value`, if any.
    pub fn choice_for_value(&self, value: u8) -> Option<&DropdownChoice> {
        self.dropdown_choices.iter().find(|c| c.value == value)
    }

    /// Resolve a yes/no response to its numeric value.
    pub fn value_for_yes_no(&self, yes: bool) -> Option<u8> {
        match self.answer_kind {
            AnswerKind::YesNo => Some(if yes { Self::YES_VALUE } else { Self::NO_VALUE }),
            _ => None,
        }
    }

    /// Whether `value` is a legal answer for this statement's kind.
    pub fn accepts(&self, value: u8) -> bool {
        match self.answer_kind {
            AnswerKind::Scale => (1..=5).contains(&value),
            AnswerKind::YesNo => {
                self.value_for_yes_no(true) == Some(value) || self.value_for_yes_no(false) == Some(value)
            }
            AnswerKind::Dropdown => self.choice_for_value(value).is_some(),
        }
    }

    /// Check internal consistency. Returns a message describing the first problem.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.dimension.trim().is_empty() {
            return Err("dimension is empty".to_string());
        }
        if self.question.trim().is_empty() {
            return Err("question is empty".to_string());
        }
        match self.answer_kind {
            AnswerKind::Dropdown => {
                if self.dropdown_choices.is_empty() {
                    return Err("dropdown statement has no choices".to_string());
                }
                if let Some(bad) = self
                    .dropdown_choices
                    .iter()
                    .find(|c| !(1..=5).contains(&c.value))
                {
                    return Err(format!(
                        "choice '{}' has value {} outside 1-5",
                        bad.label, bad.value
                    ));
                }
            }
            _ => {
                if !self.dropdown_choices.is_empty() {
                    return Err("only dropdown statements may declare choices".to_string());
                }
            }
        }
        Ok(())
    }
}
