use crate::error::ModelError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};

/// Custom deserializer for attribute maps that drops null values.
/// Recorders emit `null` for attributes that were queried but absent; scalar values
/// (numbers, booleans) are kept in their textual form.
fn deserialize_nullable_string_map<'de, D, M>(deserializer: D) -> Result<M, D::Error>
where
    D: Deserializer<'de>,
    M: FromIterator<(String, String)>,
{
    let map: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(map
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            Value::Number(n) => Some((k, n.to_string())),
            Value::Bool(b) => Some((k, b.to_string())),
            _ => None,
        })
        .collect())
}

/// Element data as captured by the recorder, before normalization.
///
/// Different recorder versions use different key names for the same data, so the
/// common aliases are accepted here and collapsed by [`RawElement::normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawElement {
    #[serde(
        default,
        alias = "tag_name",
        alias = "tagName",
        alias = "node_name",
        alias = "nodeName"
    )]
    pub tag: Option<String>,
    #[serde(default, alias = "node_value", alias = "nodeValue")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl RawElement {
    /// Normalize into a [`CapturedElement`].
    ///
    /// Returns `None` for records that carry nothing usable (no tag, no text and no
    /// attributes); callers treat that the same as "no element data".
    pub fn normalize(self) -> Option<CapturedElement> {
        let tag = self.tag.unwrap_or_default().trim().to_lowercase();
        let text = self.text.unwrap_or_default().trim().to_string();

        if tag.is_empty() && text.is_empty() && self.attributes.is_empty() {
            return None;
        }

        Some(CapturedElement {
            tag,
            text,
            attributes: self.attributes,
            role: self
                .role
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        })
    }
}

/// A normalized element captured at recording time. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedElement {
    /// Lowercase tag name.
    pub tag: String,
    /// Trimmed visible text (may be empty).
    #[serde(default)]
    pub text: String,
    /// Attributes keyed exactly as captured.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl CapturedElement {
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into().trim().to_lowercase(),
            text: text.into().trim().to_string(),
            attributes: BTreeMap::new(),
            role: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Trimmed attribute value, `None` when missing or blank.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Stable 10-character fingerprint of the element, used to key per-session caches
    /// and persisted as `elementHash`.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.tag.as_bytes());
        hasher.update(b"_");
        hasher.update(self.text.as_bytes());
        for (key, value) in &self.attributes {
            hasher.update(b"|");
            hasher.update(key.as_bytes());
            hasher.update(b"=");
            hasher.update(value.as_bytes());
        }
        hasher
            .finalize()
            .iter()
            .take(5)
            .map(|b| format!("{:02x}", b))
            .collect()
    }
}

/// One interactive node of a page snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomNode {
    pub index: u32,
    #[serde(default, alias = "tag", alias = "tag_name")]
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_string_map")]
    pub attributes: HashMap<String, String>,
    #[serde(default, alias = "aria_label", skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl DomNode {
    pub fn new(index: u32, tag_name: impl Into<String>) -> Self {
        Self {
            index,
            tag_name: tag_name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Trimmed visible text, empty when the node has none.
    pub fn trimmed_text(&self) -> &str {
        self.text.as_deref().map(str::trim).unwrap_or("")
    }

    /// Value of a semantic attribute (`aria-label`, `placeholder`, `title`, `alt`).
    ///
    /// A non-blank dedicated snapshot field wins; the raw attribute is used when
    /// the snapshot producer left the field empty or did not lift it at all.
    pub fn semantic_attr(&self, name: &str) -> Option<&str> {
        let field = match name {
            "aria-label" => self.aria_label.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "title" => self.title.as_deref(),
            "alt" => self.alt.as_deref(),
            _ => None,
        };
        field
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.attributes.get(name).map(String::as_str))
    }

    /// Explicit role: the snapshot's role field, else the `role` attribute.
    pub fn explicit_role(&self) -> Option<&str> {
        self.role
            .as_deref()
            .or_else(|| self.attributes.get("role").map(String::as_str))
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}

/// Point-in-time view of the interactive elements of a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub elements: Vec<DomNode>,
}

impl DomSnapshot {
    pub fn new(elements: Vec<DomNode>) -> Self {
        Self {
            url: None,
            title: None,
            elements,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, index: u32) -> Option<&DomNode> {
        self.elements.iter().find(|e| e.index == index)
    }

    /// Nodes in snapshot order.
    pub fn iter(&self) -> impl Iterator<Item = &DomNode> {
        self.elements.iter()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// One recorded action as emitted by the automation runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionRecord {
    #[serde(alias = "action_type", alias = "type")]
    pub action_type: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(default, alias = "element_index", skip_serializing_if = "Option::is_none")]
    pub element_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, alias = "page_url", skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, alias = "page_title", skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// Element data captured inline with the action, if the recorder provides it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element: Option<RawElement>,
}

impl ActionRecord {
    pub fn new(action_type: impl Into<String>) -> Self {
        Self {
            action_type: action_type.into(),
            ..Default::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_element_index(mut self, index: u32) -> Self {
        self.element_index = Some(index);
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    pub fn with_page(mut self, url: impl Into<String>, title: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self.page_title = Some(title.into());
        self
    }

    pub fn with_element(mut self, element: RawElement) -> Self {
        self.element = Some(element);
        self
    }

    /// Index of the interacted element: explicit field first, then `params.index`.
    pub fn index(&self) -> Option<u32> {
        self.element_index.or_else(|| {
            self.params
                .get("index")
                .and_then(Value::as_u64)
                .and_then(|i| u32::try_from(i).ok())
        })
    }

    /// Non-blank string parameter.
    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Rationale text, `None` when missing or blank.
    pub fn rationale_text(&self) -> Option<&str> {
        self.rationale.as_deref().filter(|r| !r.trim().is_empty())
    }
}

/// A full recording: the elements captured during the run plus the ordered actions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedTrace {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub elements: BTreeMap<u32, RawElement>,
    #[serde(default)]
    pub actions: Vec<ActionRecord>,
}

impl RecordedTrace {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }
}
