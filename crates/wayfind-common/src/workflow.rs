use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The fixed set of semantic locator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TextExact,
    RoleText,
    AriaLabel,
    Placeholder,
    Title,
    AltText,
    TextFuzzy,
}

impl StrategyKind {
    pub const ALL: [StrategyKind; 7] = [
        StrategyKind::TextExact,
        StrategyKind::RoleText,
        StrategyKind::AriaLabel,
        StrategyKind::Placeholder,
        StrategyKind::Title,
        StrategyKind::AltText,
        StrategyKind::TextFuzzy,
    ];

    /// Fixed priority of the kind. 1 is tried first.
    pub fn priority(self) -> u32 {
        match self {
            StrategyKind::TextExact => 1,
            StrategyKind::RoleText => 2,
            StrategyKind::AriaLabel => 3,
            StrategyKind::Placeholder => 4,
            StrategyKind::Title => 5,
            StrategyKind::AltText => 6,
            StrategyKind::TextFuzzy => 7,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StrategyKind::TextExact => "text_exact",
            StrategyKind::RoleText => "role_text",
            StrategyKind::AriaLabel => "aria_label",
            StrategyKind::Placeholder => "placeholder",
            StrategyKind::Title => "title",
            StrategyKind::AltText => "alt_text",
            StrategyKind::TextFuzzy => "text_fuzzy",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named matching rule used to relocate an element without positional identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorStrategy {
    #[serde(rename = "type")]
    pub kind: StrategyKind,
    pub value: String,
    pub priority: u32,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl LocatorStrategy {
    /// Create a strategy carrying the kind's fixed priority.
    pub fn new(kind: StrategyKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            priority: kind.priority(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }

    /// Fuzzy threshold recorded in the metadata, if any.
    pub fn threshold(&self) -> Option<f64> {
        self.metadata.get("threshold").and_then(Value::as_f64)
    }
}

/// Context shared by every step variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepContext {
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
}

impl StepContext {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Default::default()
        }
    }
}

/// Element targeting data carried by click, input and key-press steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementTarget {
    pub target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub selector_strategies: Vec<LocatorStrategy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationStep {
    #[serde(flatten)]
    pub context: StepContext,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputStep {
    #[serde(flatten)]
    pub context: StepContext,
    #[serde(flatten)]
    pub target: ElementTarget,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickStep {
    #[serde(flatten)]
    pub context: StepContext,
    #[serde(flatten)]
    pub target: ElementTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_hint: Option<String>,
    /// Label as recorded, kept when the active target was generalized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_target_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPressStep {
    #[serde(flatten)]
    pub context: StepContext,
    #[serde(flatten)]
    pub target: ElementTarget,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractStep {
    #[serde(flatten)]
    pub context: StepContext,
    pub goal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollStep {
    #[serde(flatten)]
    pub context: StepContext,
    pub scroll_x: i64,
    pub scroll_y: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStep {
    #[serde(flatten)]
    pub context: StepContext,
}

/// A declarative, replayable workflow step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkflowStep {
    Navigation(NavigationStep),
    Input(InputStep),
    Click(ClickStep),
    KeyPress(KeyPressStep),
    Extract(ExtractStep),
    Scroll(ScrollStep),
    GoBack(HistoryStep),
    GoForward(HistoryStep),
}

impl WorkflowStep {
    /// Serialized `type` tag of the step.
    pub fn kind_name(&self) -> &'static str {
        match self {
            WorkflowStep::Navigation(_) => "navigation",
            WorkflowStep::Input(_) => "input",
            WorkflowStep::Click(_) => "click",
            WorkflowStep::KeyPress(_) => "key_press",
            WorkflowStep::Extract(_) => "extract",
            WorkflowStep::Scroll(_) => "scroll",
            WorkflowStep::GoBack(_) => "go_back",
            WorkflowStep::GoForward(_) => "go_forward",
        }
    }

    pub fn context(&self) -> &StepContext {
        match self {
            WorkflowStep::Navigation(s) => &s.context,
            WorkflowStep::Input(s) => &s.context,
            WorkflowStep::Click(s) => &s.context,
            WorkflowStep::KeyPress(s) => &s.context,
            WorkflowStep::Extract(s) => &s.context,
            WorkflowStep::Scroll(s) => &s.context,
            WorkflowStep::GoBack(s) | WorkflowStep::GoForward(s) => &s.context,
        }
    }

    pub fn context_mut(&mut self) -> &mut StepContext {
        match self {
            WorkflowStep::Navigation(s) => &mut s.context,
            WorkflowStep::Input(s) => &mut s.context,
            WorkflowStep::Click(s) => &mut s.context,
            WorkflowStep::KeyPress(s) => &mut s.context,
            WorkflowStep::Extract(s) => &mut s.context,
            WorkflowStep::Scroll(s) => &mut s.context,
            WorkflowStep::GoBack(s) | WorkflowStep::GoForward(s) => &mut s.context,
        }
    }

    pub fn description(&self) -> &str {
        &self.context().description
    }

    pub fn target(&self) -> Option<&ElementTarget> {
        match self {
            WorkflowStep::Input(s) => Some(&s.target),
            WorkflowStep::Click(s) => Some(&s.target),
            WorkflowStep::KeyPress(s) => Some(&s.target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut ElementTarget> {
        match self {
            WorkflowStep::Input(s) => Some(&mut s.target),
            WorkflowStep::Click(s) => Some(&mut s.target),
            WorkflowStep::KeyPress(s) => Some(&mut s.target),
            _ => None,
        }
    }

    /// Locator strategies of the step; empty for steps without an element target.
    pub fn strategies(&self) -> &[LocatorStrategy] {
        self.target()
            .map(|t| t.selector_strategies.as_slice())
            .unwrap_or(&[])
    }
}

/// Declared workflow input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDefinition {
    pub name: String,
    #[serde(rename = "type", default = "default_input_type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl InputDefinition {
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: default_input_type(),
            format: None,
            required: true,
        }
    }
}

fn default_input_type() -> String {
    "string".to_string()
}

fn default_required() -> bool {
    true
}

/// A complete, persisted workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub version: String,
    #[serde(default)]
    pub input_schema: Vec<InputDefinition>,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
}

impl WorkflowDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        version: impl Into<String>,
        steps: Vec<WorkflowStep>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            version: version.into(),
            input_schema: Vec::new(),
            steps,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn step(&self, index: usize) -> Result<&WorkflowStep, ModelError> {
        self.steps.get(index).ok_or(ModelError::StepOutOfRange {
            index,
            len: self.steps.len(),
        })
    }

    /// Strategies of the step at `index`; errors for steps without an element target.
    pub fn step_strategies(&self, index: usize) -> Result<&[LocatorStrategy], ModelError> {
        let step = self.step(index)?;
        step.target()
            .map(|t| t.selector_strategies.as_slice())
            .ok_or(ModelError::NoTarget(index))
    }
}
