//! Feedback request prompt rendering.

use std::collections::HashMap;
use std::fmt::Write;

use crate::catalog::StatementCatalog;
use crate::scoring::DimensionScores;
use crate::types::{Answer, UserInfo};

use super::parser::Section;

/// Render the prompt sent to the language model.
///
/// Dimensions follow `scores` order and statements follow catalog order.
/// A statement with no answer keeps its question and context lines but
/// drops the `A:` line. Repeated answers for one statement each get their own
/// `A:` line, in submission order, matching how scoring counts them.
pub fn build_feedback_prompt(
    user_info: &UserInfo,
    answers: &[Answer],
    scores: &DimensionScores,
    catalog: &StatementCatalog,
) -> String {
    let mut answers_by_id: HashMap<u32, Vec<u8>> = HashMap::new();
    for answer in answers {
        answers_by_id
            .entry(answer.statement_id)
            .or_default()
            .push(answer.value);
    }

    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are a Senior Supply Chain Consultant reviewing diagnostic results for {}, who works as {} at {}.",
        or_fallback(&user_info.name, "the respondent"),
        or_fallback(&user_info.role, "an undisclosed role"),
        or_fallback(&user_info.company, "their company"),
    );
    prompt.push('\n');
    prompt.push_str("RESPONSES BY AREA:\n");

    for dimension in scores.dimensions() {
        let _ = write!(prompt, "\n## {}\n", dimension);
        for statement in catalog.in_dimension(dimension) {
            let _ = writeln!(prompt, "Q: {}", statement.question);
            for value in answers_by_id.get(&statement.id).into_iter().flatten() {
                let _ = writeln!(prompt, "A: {}/5", value);
            }
            let _ = writeln!(prompt, "Context: {}", statement.interpretation);
        }
    }

    prompt.push_str("\nTASK:\n");
    prompt.push_str(
        "Based on these responses, write feedback using exactly these section labels, each on its own line:\n\n",
    );
    for section in Section::ALL {
        let _ = writeln!(prompt, "{}: {}", section.label(), section.instruction());
    }
    prompt.push_str(
        "\nRules:\n\
         - Write in the second person, speaking directly to the reader.\n\
         - Do not quote numeric scores or the area names above.\n\
         - Avoid jargon and consulting buzzwords.\n\
         - Keep each section to 1-3 sentences.\n\
         - Refer to what their answers describe, not to the questionnaire itself.\n",
    );

    prompt
}

fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        fallback
    } else {
        trimmed
    }
}
