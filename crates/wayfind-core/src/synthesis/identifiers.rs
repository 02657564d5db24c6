//! Human-readable labels from `name`/`id` attributes and link targets.

use regex::Regex;
use std::sync::LazyLock;

/// Substrings that mark a server-generated identifier.
const TECHNICAL_MARKERS: &[&str] = &["$", "ctl", "ctr", "__", "guid"];

/// Prefixes UI frameworks put on generated ids.
const FRAMEWORK_PREFIXES: &[&str] = &["mat-", "ng-", "react-", "ember", "ext-gen", "yui_", ":r"];

/// Trailing segments that describe the control kind rather than its meaning.
const GENERIC_SEGMENTS: &[&str] = &[
    "txt", "text", "parameter", "param", "ctrl", "ctl", "button", "btn", "label", "lbl", "input",
    "field", "value", "dd", "ddl", "tb", "cbo", "chk",
];

/// Hungarian-style control prefixes stripped before splitting camel case.
const CONTROL_PREFIXES: &[&str] = &["txt", "ddl", "btn", "chk", "lbl", "cbo", "rdo", "tb"];

/// Path segments that never make a useful link label.
const HREF_STOPLIST: &[&str] = &["www", "com", "http:", "https:", "index", "home", "default"];

const MAX_SYMBOL_DENSITY: f64 = 0.7;
const MIN_SEGMENT_CHARS: usize = 3;
const MAX_SHORT_CAPS_CHARS: usize = 4;

static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z0-9])([A-Z])|([A-Z])([A-Z][a-z])").unwrap());

static FRAMEWORK_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)(ctl|ctr)\d+$").unwrap());

static PAGE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\.(html?|php|aspx?|jsp)$").unwrap());

/// Whether a `name`/`id` value can be shown to a person as-is.
pub fn is_human_readable(value: &str) -> bool {
    let lower = value.to_lowercase();
    if TECHNICAL_MARKERS.iter().any(|m| lower.contains(m))
        || FRAMEWORK_PREFIXES.iter().any(|p| lower.starts_with(p))
    {
        return false;
    }

    let total = value.chars().count();
    if total == 0 {
        return false;
    }
    let symbols = value.chars().filter(|c| !c.is_alphanumeric()).count();
    (symbols as f64 / total as f64) <= MAX_SYMBOL_DENSITY
}

/// Pull a meaningful segment out of a generated identifier such as
/// `ctl00$MainContent$txtLastName`, scanning segments from the end.
pub fn segment_label(value: &str) -> Option<String> {
    value
        .split(['$', '_'])
        .rev()
        .map(str::trim)
        .find(|segment| is_meaningful_segment(segment))
        .map(|segment| split_camel_case(strip_control_prefix(segment)))
        .filter(|label| !label.is_empty())
}

fn is_meaningful_segment(segment: &str) -> bool {
    let len = segment.chars().count();
    if len < MIN_SEGMENT_CHARS {
        return false;
    }
    if segment.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    if GENERIC_SEGMENTS.contains(&segment.to_lowercase().as_str()) {
        return false;
    }
    let all_caps = segment.chars().all(|c| !c.is_lowercase());
    if all_caps && len <= MAX_SHORT_CAPS_CHARS {
        return false;
    }
    !FRAMEWORK_COUNTER.is_match(segment)
}

fn strip_control_prefix(segment: &str) -> &str {
    for prefix in CONTROL_PREFIXES {
        if let Some(rest) = segment.strip_prefix(prefix)
            && rest.starts_with(|c: char| c.is_uppercase())
        {
            return rest;
        }
    }
    segment
}

/// `LastName` -> `Last Name`, `HTMLParser` -> `HTML Parser`.
pub fn split_camel_case(value: &str) -> String {
    let spaced = CAMEL_BOUNDARY.replace_all(value, "$1$3 $2$4");
    // Two passes catch boundaries that overlap (e.g. `aBC`).
    let spaced = CAMEL_BOUNDARY.replace_all(&spaced, "$1$3 $2$4");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Label derived from an attribute value: readable values are returned as-is,
/// generated identifiers are segmented.
pub fn readable_identifier(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if is_human_readable(value) {
        return Some(value.to_string());
    }
    segment_label(value)
}

/// Label derived from a link target: the last path segment, title-cased.
///
/// `https://example.com/investors/sec-filings?x=1` -> `Sec Filings`.
pub fn href_label(href: &str) -> Option<String> {
    let href = href.trim();
    let without_fragment = href.split('#').next().unwrap_or("");
    let without_query = without_fragment.split('?').next().unwrap_or("");

    // Absolute URLs: only the path counts, the host is never a label.
    let path = match url::Url::parse(without_query) {
        Ok(parsed) if parsed.has_host() => parsed.path().to_string(),
        Ok(_) => return None,
        Err(_) => without_query.to_string(),
    };

    let last = path.trim_end_matches('/').rsplit('/').next()?.trim();
    let last = PAGE_EXTENSION.replace(last, "");
    let lower = last.to_lowercase();

    if last.is_empty() || HREF_STOPLIST.contains(&lower.as_str()) || looks_like_host(&lower) {
        return None;
    }

    let label = last
        .replace(['-', '_', '+'], " ")
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ");

    (!label.is_empty()).then_some(label)
}

fn looks_like_host(segment: &str) -> bool {
    segment.starts_with("www.")
        || segment.ends_with(".com")
        || segment.ends_with(".org")
        || segment.ends_with(".net")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readable_values_pass_through() {
        assert_eq!(readable_identifier("email"), Some("email".into()));
        assert_eq!(readable_identifier("first-name"), Some("first-name".into()));
    }

    #[test]
    fn test_technical_values_are_rejected() {
        assert!(!is_human_readable("ctl00$MainContent$txtLastName"));
        assert!(!is_human_readable("mat-input-3"));
        assert!(!is_human_readable("field__inner"));
        assert!(!is_human_readable("a-guid-1234"));
        assert!(!is_human_readable("--::--"));
    }

    #[test]
    fn test_segmentation_from_end() {
        assert_eq!(
            readable_identifier("ctl00$MainContent$txtLastName"),
            Some("Last Name".into())
        );
        assert_eq!(
            readable_identifier("ctl00$ContentPlaceHolder1$ProviderName$txt"),
            Some("Provider Name".into())
        );
        assert_eq!(readable_identifier("ctl00$ID$12345"), None);
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_camel_case("LastName"), "Last Name");
        assert_eq!(split_camel_case("zipCode5"), "zip Code5");
        assert_eq!(split_camel_case("HTMLParser"), "HTML Parser");
    }

    #[test]
    fn test_href_label() {
        assert_eq!(
            href_label("https://example.com/investors/sec-filings?year=2023#top"),
            Some("Sec Filings".into())
        );
        assert_eq!(href_label("/about_us/"), Some("About Us".into()));
        assert_eq!(href_label("/products/index.html"), None);
        assert_eq!(href_label("/press-releases.html"), Some("Press Releases".into()));
        assert_eq!(href_label("https://www.example.com/"), None);
        assert_eq!(href_label("mailto:someone@example.com"), None);
        assert_eq!(href_label("#"), None);
    }
}
