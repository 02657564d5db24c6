//! Per-kind match predicates between a locator strategy and a snapshot node.

use crate::synthesis::strategies::infer_role;
use similar::{DiffTag, TextDiff};
use wayfind_common::protocol::DomNode;
use wayfind_common::workflow::{LocatorStrategy, StrategyKind};

/// Character match ratio `2 * M / T` in `[0, 1]`, where `M` is the number of
/// characters the two strings share in order and `T` their combined length.
///
/// Two empty strings are identical (1.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let diff = TextDiff::from_chars(a, b);
    let matched: usize = diff
        .ops()
        .iter()
        .filter(|op| op.tag() == DiffTag::Equal)
        .map(|op| op.old_range().len())
        .sum();

    (2 * matched) as f64 / total as f64
}

/// Inferred role of a node, lowercased: explicit role, else the tag table,
/// else the tag name itself.
pub fn node_role(node: &DomNode) -> String {
    let tag = node.tag_name.trim().to_lowercase();
    let input_type = node.attributes.get("type").map(String::as_str);
    infer_role(&tag, node.explicit_role(), input_type)
        .map(str::to_lowercase)
        .unwrap_or(tag)
}

/// Whether `node` satisfies `strategy`. Blank strategy values never match.
pub fn strategy_matches(strategy: &LocatorStrategy, node: &DomNode, default_threshold: f64) -> bool {
    let value = strategy.value.trim();
    if value.is_empty() {
        return false;
    }

    match strategy.kind {
        StrategyKind::TextExact => node.trimmed_text() == value,
        StrategyKind::RoleText => {
            let Some(role) = strategy.meta_str("role") else {
                return false;
            };
            node_role(node).eq_ignore_ascii_case(role.trim()) && node.trimmed_text() == value
        }
        StrategyKind::AriaLabel => attr_equals(node, "aria-label", value),
        StrategyKind::Placeholder => attr_equals(node, "placeholder", value),
        StrategyKind::Title => attr_equals(node, "title", value),
        StrategyKind::AltText => attr_equals(node, "alt", value),
        StrategyKind::TextFuzzy => {
            let text = node.trimmed_text();
            if text.is_empty() {
                return false;
            }
            let threshold = strategy.threshold().unwrap_or(default_threshold);
            similarity(&value.to_lowercase(), &text.to_lowercase()) >= threshold
        }
    }
}

fn attr_equals(node: &DomNode, name: &str, value: &str) -> bool {
    node.semantic_attr(name)
        .is_some_and(|attr| attr.trim() == value)
}
