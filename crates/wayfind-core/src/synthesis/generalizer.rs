//! Generalization of click targets that are record identifiers.
//!
//! A recorded click on `AP00945776` in a result list only replays on the same
//! data. Such labels are swapped for a generic one ("license number link") and
//! the step is pinned to the first search result instead.

use regex::Regex;
use std::sync::LazyLock;

pub const POSITION_HINT: &str = "first";
pub const CONTAINER_HINT: &str = "search results";

const DEFAULT_LABEL: &str = "id link";

/// Rationale keywords and the generic label each one selects, checked in order.
const KEYWORD_LABELS: &[(&str, &str)] = &[
    ("license", "license number link"),
    ("provider", "provider id link"),
    ("order", "order id link"),
    ("invoice", "invoice number link"),
    ("ticket", "ticket number link"),
    ("case", "case number link"),
    ("patient", "patient id link"),
    ("user", "user id link"),
    ("customer", "customer id link"),
    ("product", "product id link"),
    ("transaction", "transaction id link"),
    ("record", "record id link"),
];

static IDENTIFIER_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // AP00945776
        Regex::new(r"^[A-Z0-9]*[A-Z][A-Z0-9]*\d{3}$").unwrap(),
        // 123456
        Regex::new(r"^\d{3,}$").unwrap(),
        // INV-2023-001, a1b2.c3
        Regex::new(r"^[A-Za-z0-9]+(?:[-_./][A-Za-z0-9]+)+$").unwrap(),
    ]
});

/// Result of generalizing a click label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generalization {
    pub label: String,
    pub position_hint: &'static str,
    pub container_hint: &'static str,
    /// The label as recorded.
    pub original: String,
}

/// Whether a label looks like a data-specific identifier.
pub fn is_dynamic_identifier(label: &str) -> bool {
    let label = label.trim();
    if label.is_empty() || !label.chars().any(|c| c.is_ascii_digit()) {
        return false;
    }
    IDENTIFIER_PATTERNS.iter().any(|p| p.is_match(label))
}

/// Generalize a click label, or `None` when it is not an identifier.
pub fn generalize_identifier(label: &str, rationale: Option<&str>) -> Option<Generalization> {
    if !is_dynamic_identifier(label) {
        return None;
    }

    Some(Generalization {
        label: generic_label(rationale.unwrap_or("")).to_string(),
        position_hint: POSITION_HINT,
        container_hint: CONTAINER_HINT,
        original: label.trim().to_string(),
    })
}

fn generic_label(rationale: &str) -> &'static str {
    let lower = rationale.to_lowercase();
    KEYWORD_LABELS
        .iter()
        .find(|(keyword, _)| starts_word(&lower, keyword))
        .map(|(_, label)| *label)
        .unwrap_or(DEFAULT_LABEL)
}

/// Whether `keyword` occurs in `haystack` at the start of a word.
fn starts_word(haystack: &str, keyword: &str) -> bool {
    haystack.match_indices(keyword).any(|(at, _)| {
        haystack[..at]
            .chars()
            .next_back()
            .is_none_or(|c| !c.is_alphanumeric())
    })
}
