//! Labelled-section parsing for free-text model replies.
//!
//! The reply is scanned once for section labels. Each label's content runs
//! from the end of the label to the start of the nearest following label, or
//! to the end of the text. Sections may appear in any order. When a label
//! repeats, the first occurrence with content wins. Missing or empty sections
//! fall back to fixed defaults, so parsing never fails.
//!
//! A label counts as a section boundary when it is directly followed by a
//! colon, or when it stands alone on its line as a heading (optionally wrapped
//! in list or heading markup such as `-`, `*`, `#`, `**`). A sentence that
//! merely starts with label words, like "Watch out for ...", is content.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::feedback::{
    Feedback, DEFAULT_FIRST_THING_TO_CHANGE, DEFAULT_KEY_OBSERVATION, DEFAULT_WATCH_OUTS,
};

static LABEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?P<key>KEY[ \t_-]+OBSERVATIONS?)|(?P<first>FIRST[ \t_-]+THING[ \t_-]+TO[ \t_-]+CHANGE)|(?P<watch>WATCH[ \t_-]*OUTS?))\b(?P<tail>[ \t]*\*{0,2}[ \t]*(?P<colon>:)?(?:[ \t]*\*{1,2})?)",
    )
    .unwrap()
});

/// One feedback section the model is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    KeyObservation,
    FirstThingToChange,
    WatchOuts,
}

impl Section {
    /// Canonical order, as requested in the prompt.
    pub const ALL: [Section; 3] = [
        Section::KeyObservation,
        Section::FirstThingToChange,
        Section::WatchOuts,
    ];

    /// Label the model must emit.
    pub fn label(self) -> &'static str {
        match self {
            Section::KeyObservation => "KEY OBSERVATION",
            Section::FirstThingToChange => "FIRST THING TO CHANGE",
            Section::WatchOuts => "WATCH-OUTS",
        }
    }

    /// What the section should contain, phrased for the prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Section::KeyObservation => {
                "The single most important pattern or insight in their answers."
            }
            Section::FirstThingToChange => {
                "The one specific, practical change that would help most right now."
            }
            Section::WatchOuts => "The risks they should keep an eye on given where they are today.",
        }
    }

    /// Text used when the section is missing or empty.
    pub fn default_text(self) -> &'static str {
        match self {
            Section::KeyObservation => DEFAULT_KEY_OBSERVATION,
            Section::FirstThingToChange => DEFAULT_FIRST_THING_TO_CHANGE,
            Section::WatchOuts => DEFAULT_WATCH_OUTS,
        }
    }
}

/// A recognised label occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    section: Section,
    /// Byte offset where the label (including leading markup) begins.
    start: usize,
    /// Byte offset just past the label, colon and closing markup.
    end: usize,
}

/// Scan `text` once and return every label occurrence in text order.
fn scan(text: &str) -> Vec<Marker> {
    let mut markers = Vec::new();

    for caps in LABEL_PATTERN.captures_iter(text) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let section = if caps.name("key").is_some() {
            Section::KeyObservation
        } else if caps.name("first").is_some() {
            Section::FirstThingToChange
        } else {
            Section::WatchOuts
        };

        let line_start = text[..whole.start()].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &text[line_start..whole.start()];
        let at_line_start = prefix.chars().all(|c| c.is_whitespace() || is_markup(c));
        let has_colon = caps.name("colon").is_some();

        let line_end = text[whole.end()..]
            .find('\n')
            .map_or(text.len(), |i| whole.end() + i);
        let heading = at_line_start
            && text[whole.end()..line_end]
                .chars()
                .all(|c| c.is_whitespace() || is_markup(c));

        if has_colon || heading {
            let start = if at_line_start {
                line_start
            } else {
                whole.start() - leading_markup_len(prefix)
            };
            markers.push(Marker {
                section,
                start,
                end: whole.end(),
            });
        }
    }

    markers
}

fn is_markup(c: char) -> bool {
    matches!(c, '-' | '*' | '#' | '>' | '_')
}

/// Bytes of `*`/`_` emphasis directly before an inline label.
fn leading_markup_len(prefix: &str) -> usize {
    prefix.len() - prefix.trim_end_matches(['*', '_']).len()
}

/// Content of `section`, if its label occurs and the captured text is non-empty.
pub fn extract_section(text: &str, section: Section) -> Option<String> {
    let markers = scan(text);
    extract_from_markers(text, &markers, section)
}

fn extract_from_markers(text: &str, markers: &[Marker], section: Section) -> Option<String> {
    markers
        .iter()
        .enumerate()
        .filter(|(_, m)| m.section == section)
        .find_map(|(idx, own)| {
            let stop = markers.get(idx + 1).map_or(text.len(), |next| next.start);
            let content = text[own.end..stop].trim();
            (!content.is_empty()).then(|| content.to_string())
        })
}

/// Sections whose label is missing or whose content is empty.
pub fn missing_sections(text: &str) -> Vec<Section> {
    let markers = scan(text);
    Section::ALL
        .into_iter()
        .filter(|s| extract_from_markers(text, &markers, *s).is_none())
        .collect()
}

/// Parse a model reply into feedback, defaulting each missing field.
pub fn parse_feedback(text: &str) -> Feedback {
    let markers = scan(text);
    let field = |section: Section| {
        extract_from_markers(text, &markers, section)
            .unwrap_or_else(|| section.default_text().to_string())
    };

    Feedback {
        key_observation: field(Section::KeyObservation),
        first_thing_to_change: field(Section::FirstThingToChange),
        watch_outs: field(Section::WatchOuts),
    }
}
