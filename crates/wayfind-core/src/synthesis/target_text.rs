//! Human-readable target labels for click, input and key-press steps.
//!
//! Labels are produced by an ordered list of rules; the first rule that yields
//! a non-empty label wins. No rule ever fails hard: when nothing applies the
//! label degrades to `"<tag> element"` or `"element"`.

use super::identifiers::{href_label, readable_identifier};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;
use wayfind_common::protocol::CapturedElement;

/// Tags whose visible text is the user's own input rather than a label.
const FORM_CONTROL_TAGS: &[&str] = &["input", "textarea", "select"];

const LABEL_ATTRIBUTES: &[&str] = &["aria-label", "placeholder", "title", "alt"];

/// Leading words dropped from a captured phrase.
const LEADING_NOISE: &[&str] = &[
    "the", "a", "an", "then", "now", "next", "i", "enter", "type", "fill", "click", "select",
];

/// One or more capitalized words.
const CAPITALIZED_WORDS: &str = r"[A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*";

static ELEMENT_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(?i:element):\s*"?([^"\]]+?)"?\s*\]"#).unwrap());

static FIELD_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b({CAPITALIZED_WORDS})\s+(?i:field|input|box)\b"
    ))
    .unwrap()
});

static CLICK_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"\b(?i:click|tap|press)(?i:ed|ing|s)?\s+(?:(?i:on)\s+)?(?:(?i:the)\s+)?({CAPITALIZED_WORDS})\s+(?i:button|link)\b"
    ))
    .unwrap()
});

/// Everything the extractor may look at for one action.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractionInput<'a> {
    pub element: Option<&'a CapturedElement>,
    /// Text entered by the action (`text`/`value` parameter).
    pub entered_value: Option<&'a str>,
    pub rationale: Option<&'a str>,
}

type Rule = fn(&CapturedElement, &ExtractionInput<'_>) -> Option<String>;

const RULES: &[(&str, Rule)] = &[
    ("visible_text", visible_text),
    ("label_attribute", label_attribute),
    ("element_marker", element_marker),
    ("rationale_phrase", rationale_phrase),
    ("name_or_id", name_or_id),
    ("href", href),
];

/// Best human-readable label for the element an action targeted.
pub fn extract_target_text(input: &ExtractionInput<'_>) -> String {
    let Some(element) = input.element else {
        return input
            .entered_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or("element")
            .to_string();
    };

    for (name, rule) in RULES {
        if let Some(label) = rule(element, input) {
            debug!(rule = name, label = %label, "Extracted target text");
            return label;
        }
    }

    fallback(element, input)
}

fn fallback(element: &CapturedElement, input: &ExtractionInput<'_>) -> String {
    if let Some(value) = input.entered_value.map(str::trim).filter(|v| !v.is_empty()) {
        return value.to_string();
    }
    if !element.tag.is_empty() {
        return format!("{} element", element.tag);
    }
    "element".to_string()
}

fn visible_text(element: &CapturedElement, _: &ExtractionInput<'_>) -> Option<String> {
    if FORM_CONTROL_TAGS.contains(&element.tag.as_str()) {
        return None;
    }
    let text = element.text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn label_attribute(element: &CapturedElement, _: &ExtractionInput<'_>) -> Option<String> {
    LABEL_ATTRIBUTES
        .iter()
        .find_map(|attr| element.attribute(attr))
        .map(str::to_string)
}

fn element_marker(_: &CapturedElement, input: &ExtractionInput<'_>) -> Option<String> {
    last_element_marker(input.rationale?)
}

/// Text of the last `[ELEMENT: "..."]` marker in a rationale.
pub fn last_element_marker(rationale: &str) -> Option<String> {
    ELEMENT_MARKER
        .captures_iter(rationale)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|text| !text.is_empty())
        .last()
        .map(str::to_string)
}

fn rationale_phrase(_: &CapturedElement, input: &ExtractionInput<'_>) -> Option<String> {
    let rationale = input.rationale?;

    if let Some(value) = input.entered_value.map(str::trim).filter(|v| !v.is_empty())
        && let Some(label) = value_target_phrase(rationale, value)
    {
        return Some(label);
    }

    [&*FIELD_PHRASE, &*CLICK_PHRASE]
        .into_iter()
        .find_map(|pattern| first_capture(pattern, rationale))
}

/// `"<value>" into the <Label> field`.
fn value_target_phrase(rationale: &str, value: &str) -> Option<String> {
    let pattern = Regex::new(&format!(
        r#"{}['"]?\s+(?i:into|in|for)\s+(?:(?i:the)\s+)?({CAPITALIZED_WORDS})\s+(?i:field|input|box)\b"#,
        regex::escape(value)
    ))
    .ok()?;
    first_capture(&pattern, rationale)
}

fn first_capture(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures_iter(haystack)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| clean_phrase(m.as_str()))
}

fn clean_phrase(phrase: &str) -> Option<String> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let start = words
        .iter()
        .position(|w| !LEADING_NOISE.contains(&w.to_lowercase().as_str()))?;
    Some(words[start..].join(" "))
}

fn name_or_id(element: &CapturedElement, _: &ExtractionInput<'_>) -> Option<String> {
    ["name", "id"]
        .iter()
        .filter_map(|attr| element.attribute(attr))
        .find_map(readable_identifier)
}

fn href(element: &CapturedElement, _: &ExtractionInput<'_>) -> Option<String> {
    if element.tag != "a" {
        return None;
    }
    element.attribute("href").and_then(href_label)
}
