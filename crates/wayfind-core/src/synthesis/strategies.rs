//! Locator strategy synthesis.
//!
//! Turns one captured element into the ranked list of semantic strategies that
//! the resolver later replays against a fresh snapshot. Every strategy kind has
//! a fixed priority; the list is built by testing independent conditions, one
//! per kind, and is always returned sorted by priority.

use wayfind_common::protocol::CapturedElement;
use wayfind_common::workflow::{LocatorStrategy, StrategyKind};

/// Similarity threshold written into `text_fuzzy` strategies.
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.8;

/// Visible text must be longer than this (in characters) to get a fuzzy strategy.
const MIN_FUZZY_TEXT_CHARS: usize = 3;

/// Attribute-backed strategies, in priority order.
const ATTRIBUTE_STRATEGIES: [(StrategyKind, &str); 4] = [
    (StrategyKind::AriaLabel, "aria-label"),
    (StrategyKind::Placeholder, "placeholder"),
    (StrategyKind::Title, "title"),
    (StrategyKind::AltText, "alt"),
];

/// Infer the semantic role of an element.
///
/// An explicit role always wins. Otherwise the tag decides, with `input` refined
/// by its `type` attribute.
pub fn infer_role<'a>(
    tag: &str,
    explicit: Option<&'a str>,
    input_type: Option<&str>,
) -> Option<&'a str> {
    if let Some(role) = explicit.map(str::trim).filter(|r| !r.is_empty()) {
        return Some(role);
    }

    if tag == "input"
        && let Some(input_type) = input_type
    {
        match input_type.trim().to_lowercase().as_str() {
            "checkbox" => return Some("checkbox"),
            "radio" => return Some("radio"),
            "submit" => return Some("button"),
            _ => {}
        }
    }

    match tag {
        "button" => Some("button"),
        "a" => Some("link"),
        "input" | "textarea" => Some("textbox"),
        "select" => Some("combobox"),
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Some("heading"),
        "img" => Some("img"),
        "table" => Some("table"),
        "ul" | "ol" => Some("list"),
        "nav" => Some("navigation"),
        _ => None,
    }
}

/// Role of a captured element: its own role, the `role` attribute, or the tag table.
pub fn element_role(element: &CapturedElement) -> Option<&str> {
    let explicit = element
        .role
        .as_deref()
        .or_else(|| element.attribute("role"));
    infer_role(&element.tag, explicit, element.attribute("type"))
}

/// Generate the ranked strategy list for an element using the default fuzzy threshold.
pub fn generate_strategies(element: &CapturedElement) -> Vec<LocatorStrategy> {
    generate_strategies_with_threshold(element, DEFAULT_FUZZY_THRESHOLD)
}

/// Generate the ranked strategy list for an element.
///
/// Identical input always yields an identical list.
pub fn generate_strategies_with_threshold(
    element: &CapturedElement,
    fuzzy_threshold: f64,
) -> Vec<LocatorStrategy> {
    let tag = element.tag.as_str();
    let text = element.text.trim();
    let mut strategies = Vec::new();

    if !text.is_empty() {
        strategies.push(LocatorStrategy::new(StrategyKind::TextExact, text).with_meta("tag", tag));
    }

    // Kept even though text_exact already covers the same value: persisted
    // workflows depend on the exact list shape.
    if let Some(role) = element_role(element)
        && !text.is_empty()
    {
        strategies.push(
            LocatorStrategy::new(StrategyKind::RoleText, text)
                .with_meta("role", role)
                .with_meta("tag", tag),
        );
    }

    for (kind, attr) in ATTRIBUTE_STRATEGIES {
        if let Some(value) = element.attribute(attr) {
            strategies.push(LocatorStrategy::new(kind, value).with_meta("tag", tag));
        }
    }

    if text.chars().count() > MIN_FUZZY_TEXT_CHARS {
        strategies.push(
            LocatorStrategy::new(StrategyKind::TextFuzzy, text)
                .with_meta("threshold", fuzzy_threshold)
                .with_meta("tag", tag),
        );
    }

    sort_by_priority(&mut strategies);
    strategies
}

/// Stable sort ascending by priority. Input order breaks ties.
pub fn sort_by_priority(strategies: &mut [LocatorStrategy]) {
    strategies.sort_by_key(|s| s.priority);
}

/// Human-readable overview of a strategy list, showing at most five entries.
pub fn summarize(strategies: &[LocatorStrategy]) -> String {
    const SHOWN: usize = 5;
    const PREVIEW_CHARS: usize = 50;

    let mut lines = vec![format!(
        "Generated {} selector strategies:",
        strategies.len()
    )];

    for (i, s) in strategies.iter().take(SHOWN).enumerate() {
        let preview = if s.value.chars().count() > PREVIEW_CHARS {
            let head: String = s.value.chars().take(PREVIEW_CHARS).collect();
            format!("{}...", head)
        } else {
            s.value.clone()
        };
        lines.push(format!(
            "  {}. [priority {}] {}: {}",
            i + 1,
            s.priority,
            s.kind,
            preview
        ));
    }

    if strategies.len() > SHOWN {
        lines.push(format!("  ... and {} more", strategies.len() - SHOWN));
    }

    lines.join("\n")
}
