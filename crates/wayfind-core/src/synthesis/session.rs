use super::action::ActionKind;
use super::generalizer::generalize_identifier;
use super::strategies::generate_strategies_with_threshold;
use super::target_text::{ExtractionInput, extract_target_text};
use crate::config::{SynthesisConfig, WayfindConfig};

use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};
use wayfind_common::protocol::{ActionRecord, CapturedElement, RawElement, RecordedTrace};
use wayfind_common::workflow::{
    ClickStep, ElementTarget, ExtractStep, HistoryStep, InputStep, KeyPressStep, LocatorStrategy,
    NavigationStep, ScrollStep, StepContext, WorkflowDefinition, WorkflowStep,
};

const EXTRACT_GOAL_KEYS: &[&str] = &["value", "goal", "content", "query"];
const DEFAULT_EXTRACT_GOAL: &str = "page content";

/// Per-recording state: captured elements, their fingerprints and the
/// strategies generated for each fingerprint.
#[derive(Debug, Default)]
pub struct SessionState {
    elements: HashMap<u32, CapturedElement>,
    fingerprints: HashMap<u32, String>,
    strategy_cache: HashMap<String, Vec<LocatorStrategy>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the element seen at `index`, replacing any earlier capture.
    pub fn capture(&mut self, index: u32, element: CapturedElement) {
        self.fingerprints.remove(&index);
        self.elements.insert(index, element);
    }

    pub fn element(&self, index: u32) -> Option<&CapturedElement> {
        self.elements.get(&index)
    }

    /// Fingerprint of the element at `index`, computed on first use.
    pub fn fingerprint(&mut self, index: u32) -> Option<String> {
        let element = self.elements.get(&index)?;
        Some(
            self.fingerprints
                .entry(index)
                .or_insert_with(|| element.fingerprint())
                .clone(),
        )
    }

    pub fn cached_strategies(&self, fingerprint: &str) -> Option<&[LocatorStrategy]> {
        self.strategy_cache.get(fingerprint).map(Vec::as_slice)
    }

    fn strategies_for(
        &mut self,
        fingerprint: &str,
        element: &CapturedElement,
        fuzzy_threshold: f64,
    ) -> Vec<LocatorStrategy> {
        if let Some(cached) = self.strategy_cache.get(fingerprint) {
            debug!(fingerprint, "Reusing cached strategies");
            return cached.clone();
        }
        let strategies = generate_strategies_with_threshold(element, fuzzy_threshold);
        self.strategy_cache
            .insert(fingerprint.to_string(), strategies.clone());
        strategies
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }
}

/// Element data resolved for one action.
struct Located {
    element: CapturedElement,
    fingerprint: String,
}

/// Converts single recorded actions into workflow steps.
///
/// The synthesizer itself is stateless; everything remembered across actions
/// lives in the [`SessionState`] passed to [`StepSynthesizer::synthesize`].
#[derive(Debug, Clone, Default)]
pub struct StepSynthesizer {
    config: SynthesisConfig,
}

impl StepSynthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    /// Produce the step for one action, or `None` for ignored, unknown or
    /// unusable actions.
    pub fn synthesize(&self, action: &ActionRecord, state: &mut SessionState) -> Option<WorkflowStep> {
        let kind = ActionKind::parse(&action.action_type);
        let located = if kind.targets_element() {
            locate(action, state)
        } else {
            None
        };

        let step = match kind {
            ActionKind::Navigate => self.navigation(action),
            ActionKind::Input => Some(self.input(action, located, state)),
            ActionKind::Click => Some(self.click(action, located, state)),
            ActionKind::SendKeys => self.key_press(action, located),
            ActionKind::Extract => Some(self.extract(action)),
            ActionKind::Scroll => Some(self.scroll(action)),
            ActionKind::SelectDropdownOption => Some(self.select_option(action, located)),
            ActionKind::GoBack => Some(WorkflowStep::GoBack(HistoryStep {
                context: context(action, "Navigate back to previous page".to_string()),
            })),
            ActionKind::GoForward => Some(WorkflowStep::GoForward(HistoryStep {
                context: context(action, "Navigate forward to next page".to_string()),
            })),
            ActionKind::Ignored => {
                debug!(action = %action.action_type, "Ignoring action");
                None
            }
            ActionKind::Unknown => {
                warn!(action = %action.action_type, "Unknown action type, skipping");
                None
            }
        }?;

        debug!(kind = step.kind_name(), description = step.description(), "Synthesized step");
        Some(step)
    }

    fn navigation(&self, action: &ActionRecord) -> Option<WorkflowStep> {
        let Some(url) = action.param_str("url") else {
            warn!("Navigation action without url, skipping");
            return None;
        };
        let url = url.trim().to_string();
        Some(WorkflowStep::Navigation(NavigationStep {
            context: context(action, format!("Navigate to {}", url)),
            url,
        }))
    }

    fn input(
        &self,
        action: &ActionRecord,
        located: Option<Located>,
        state: &mut SessionState,
    ) -> WorkflowStep {
        let label = self.label(action, located.as_ref());
        let description = self.enrich(format!("Enter text into {}", label), action);
        let value = raw_entered_value(action).unwrap_or_default().to_string();

        WorkflowStep::Input(InputStep {
            context: context(action, description),
            target: self.target(label, located, state),
            value,
        })
    }

    fn click(
        &self,
        action: &ActionRecord,
        located: Option<Located>,
        state: &mut SessionState,
    ) -> WorkflowStep {
        let label = self.label(action, located.as_ref());

        let (label, description, generalization) =
            match generalize_identifier(&label, action.rationale_text()) {
                Some(g) => {
                    debug!(original = %g.original, label = %g.label, "Generalized identifier click");
                    let description = format!(
                        "Click on the {} {} in {}",
                        g.position_hint, g.label, g.container_hint
                    );
                    (g.label.clone(), description, Some(g))
                }
                None => (label.clone(), format!("Click on {}", label), None),
            };

        WorkflowStep::Click(ClickStep {
            context: context(action, self.enrich(description, action)),
            target: self.target(label, located, state),
            position_hint: generalization.as_ref().map(|g| g.position_hint.to_string()),
            container_hint: generalization.as_ref().map(|g| g.container_hint.to_string()),
            original_target_text: generalization.map(|g| g.original),
        })
    }

    fn select_option(&self, action: &ActionRecord, located: Option<Located>) -> WorkflowStep {
        let label = match action.param_str("text") {
            Some(option) => option.trim().to_string(),
            None => self.label(action, located.as_ref()),
        };

        WorkflowStep::Click(ClickStep {
            context: context(action, format!("Select dropdown option: {}", label)),
            target: ElementTarget {
                target_text: label,
                element_hash: located.map(|l| l.fingerprint),
                selector_strategies: Vec::new(),
            },
            position_hint: None,
            container_hint: None,
            original_target_text: None,
        })
    }

    fn key_press(&self, action: &ActionRecord, located: Option<Located>) -> Option<WorkflowStep> {
        let Some(keys) = action.param_str("keys").or_else(|| action.param_str("key")) else {
            warn!("Key press action without keys, skipping");
            return None;
        };
        let keys = keys.trim().to_string();

        Some(WorkflowStep::KeyPress(KeyPressStep {
            context: context(action, format!("Press {} key", keys)),
            target: ElementTarget {
                target_text: self.label(action, located.as_ref()),
                element_hash: located.map(|l| l.fingerprint),
                selector_strategies: Vec::new(),
            },
            key: keys,
        }))
    }

    fn extract(&self, action: &ActionRecord) -> WorkflowStep {
        let goal = EXTRACT_GOAL_KEYS
            .iter()
            .find_map(|key| action.param_str(key))
            .map(str::trim)
            .unwrap_or(DEFAULT_EXTRACT_GOAL)
            .to_string();

        WorkflowStep::Extract(ExtractStep {
            context: context(action, format!("Extract: {}", goal)),
            goal,
        })
    }

    fn scroll(&self, action: &ActionRecord) -> WorkflowStep {
        let down = match action.params.get("down").and_then(Value::as_bool) {
            Some(down) => down,
            None => !action
                .param_str("direction")
                .is_some_and(|d| d.trim().eq_ignore_ascii_case("up")),
        };
        let pages = ["pages", "num_pages"]
            .iter()
            .find_map(|key| action.params.get(*key).and_then(Value::as_f64))
            .unwrap_or(1.0);

        let pixels = (pages * self.config.scroll_pixels_per_page as f64).round() as i64;
        let direction = if down { "down" } else { "up" };

        WorkflowStep::Scroll(ScrollStep {
            context: context(
                action,
                format!("Scroll {} {} pages", direction, format_pages(pages)),
            ),
            scroll_x: 0,
            scroll_y: if down { pixels } else { -pixels },
        })
    }

    fn label(&self, action: &ActionRecord, located: Option<&Located>) -> String {
        extract_target_text(&ExtractionInput {
            element: located.map(|l| &l.element),
            entered_value: entered_value(action),
            rationale: action.rationale_text(),
        })
    }

    fn target(
        &self,
        label: String,
        located: Option<Located>,
        state: &mut SessionState,
    ) -> ElementTarget {
        let Some(located) = located else {
            return ElementTarget {
                target_text: label,
                ..Default::default()
            };
        };

        let selector_strategies = state.strategies_for(
            &located.fingerprint,
            &located.element,
            self.config.fuzzy_threshold,
        );

        ElementTarget {
            target_text: label,
            element_hash: Some(located.fingerprint),
            selector_strategies,
        }
    }

    fn enrich(&self, description: String, action: &ActionRecord) -> String {
        match action.page_title.as_deref().map(str::trim) {
            Some(title) if self.config.enrich_descriptions && !title.is_empty() => {
                format!("{} (on {})", description, title)
            }
            _ => description,
        }
    }
}

/// Element data for an action: inline data wins and is remembered under the
/// action's index; otherwise the element captured earlier at that index.
fn locate(action: &ActionRecord, state: &mut SessionState) -> Option<Located> {
    let index = action.index();
    let inline = action.element.clone().and_then(RawElement::normalize);

    let located = match (inline, index) {
        (Some(element), Some(index)) => {
            state.capture(index, element.clone());
            let fingerprint = state.fingerprint(index)?;
            Some(Located {
                element,
                fingerprint,
            })
        }
        (Some(element), None) => Some(Located {
            fingerprint: element.fingerprint(),
            element,
        }),
        (None, Some(index)) => {
            let element = state.element(index)?.clone();
            let fingerprint = state.fingerprint(index)?;
            Some(Located {
                element,
                fingerprint,
            })
        }
        (None, None) => None,
    };

    if located.is_none() {
        debug!(index = ?index, "No element data for action");
    }
    located
}

fn context(action: &ActionRecord, description: String) -> StepContext {
    StepContext {
        description,
        rationale: action.rationale_text().map(str::to_string),
        page_url: action
            .page_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .map(str::to_string),
        page_title: action
            .page_title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string),
    }
}

/// Entered text, trimmed and non-blank.
fn entered_value(action: &ActionRecord) -> Option<&str> {
    action
        .param_str("text")
        .or_else(|| action.param_str("value"))
        .map(str::trim)
}

/// Entered text exactly as typed.
fn raw_entered_value(action: &ActionRecord) -> Option<&str> {
    ["text", "value"]
        .iter()
        .find_map(|key| action.params.get(*key).and_then(Value::as_str))
}

fn format_pages(pages: f64) -> String {
    if pages.fract() == 0.0 {
        format!("{}", pages as i64)
    } else {
        format!("{}", pages)
    }
}

/// One recording in progress: owns the session state and the steps produced so far.
#[derive(Debug)]
pub struct RecordingSession {
    synthesizer: StepSynthesizer,
    state: SessionState,
    steps: Vec<WorkflowStep>,
    version: String,
}

impl RecordingSession {
    pub fn new(config: &WayfindConfig) -> Self {
        Self {
            synthesizer: StepSynthesizer::new(config.synthesis.clone()),
            state: SessionState::new(),
            steps: Vec::new(),
            version: config.workflow.version.clone(),
        }
    }

    /// Replay a full recorded trace into a new session.
    pub fn from_trace(trace: RecordedTrace, config: &WayfindConfig) -> Self {
        let mut session = Self::new(config);
        for (index, raw) in trace.elements {
            session.capture_element(index, raw);
        }
        for action in &trace.actions {
            session.record(action);
        }
        session
    }

    /// Remember the element shown at `index`. Returns `false` when the data is unusable.
    pub fn capture_element(&mut self, index: u32, raw: RawElement) -> bool {
        match raw.normalize() {
            Some(element) => {
                self.state.capture(index, element);
                true
            }
            None => {
                debug!(index, "Dropping empty element capture");
                false
            }
        }
    }

    /// Synthesize the step for one action and append it.
    pub fn record(&mut self, action: &ActionRecord) -> Option<&WorkflowStep> {
        let step = self.synthesizer.synthesize(action, &mut self.state)?;
        self.steps.push(step);
        self.steps.last()
    }

    pub fn steps(&self) -> &[WorkflowStep] {
        &self.steps
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Close the session and build the workflow definition.
    pub fn finish(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> WorkflowDefinition {
        let workflow = WorkflowDefinition::new(name, description, self.version, self.steps);
        debug!(name = %workflow.name, steps = workflow.steps.len(), "Finished recording session");
        workflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wayfind_common::workflow::StrategyKind;

    fn raw(tag: &str, text: &str) -> RawElement {
        RawElement {
            tag: Some(tag.to_string()),
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    fn session() -> RecordingSession {
        RecordingSession::new(&WayfindConfig::default())
    }

    #[test]
    fn test_navigation() {
        let mut session = session();
        let step = session
            .record(&ActionRecord::new("go_to_url").with_param("url", "https://example.com"))
            .cloned()
            .unwrap();

        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "navigation",
                "description": "Navigate to https://example.com",
                "url": "https://example.com"
            })
        );
    }

    #[test]
    fn test_click_uses_captured_element() {
        let mut session = session();
        session.capture_element(5, raw("button", "Submit"));

        let action = ActionRecord::new("click_element")
            .with_element_index(5)
            .with_rationale("Submit the form")
            .with_page("https://example.com/form", "Signup");
        let step = session.record(&action).cloned().unwrap();

        let WorkflowStep::Click(click) = step else {
            panic!("Expected click step");
        };
        assert_eq!(click.target.target_text, "Submit");
        assert_eq!(click.context.description, "Click on Submit (on Signup)");
        assert_eq!(click.context.rationale.as_deref(), Some("Submit the form"));
        assert_eq!(click.target.element_hash.as_deref().map(str::len), Some(10));
        assert_eq!(click.target.selector_strategies[0].kind, StrategyKind::TextExact);
        assert!(click.position_hint.is_none());
    }

    #[test]
    fn test_click_without_element_has_no_hash() {
        let mut session = session();
        let step = session
            .record(&ActionRecord::new("click").with_param("index", 9))
            .cloned()
            .unwrap();

        let target = step.target().unwrap();
        assert_eq!(target.target_text, "element");
        assert!(target.element_hash.is_none());
        assert!(target.selector_strategies.is_empty());
        assert!(step.context().page_title.is_none());
    }

    #[test]
    fn test_identifier_click_is_generalized() {
        let mut session = session();
        session.capture_element(2, raw("a", "AP00945776"));

        let action = ActionRecord::new("click")
            .with_element_index(2)
            .with_rationale("Open the first license result");
        let step = session.record(&action).cloned().unwrap();

        let WorkflowStep::Click(click) = step else {
            panic!("Expected click step");
        };
        assert_eq!(click.target.target_text, "license number link");
        assert_eq!(
            click.context.description,
            "Click on the first license number link in search results"
        );
        assert_eq!(click.position_hint.as_deref(), Some("first"));
        assert_eq!(click.container_hint.as_deref(), Some("search results"));
        assert_eq!(click.original_target_text.as_deref(), Some("AP00945776"));
        // Strategies still describe the recorded element.
        assert_eq!(click.target.selector_strategies[0].value, "AP00945776");
    }

    #[test]
    fn test_input_step() {
        let mut session = session();
        let element = RawElement {
            tag: Some("input".into()),
            attributes: [("placeholder".to_string(), "Email".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let action = ActionRecord::new("input_text")
            .with_param("index", 1)
            .with_param("text", "me@example.com")
            .with_element(element);
        let step = session.record(&action).cloned().unwrap();

        let WorkflowStep::Input(input) = step else {
            panic!("Expected input step");
        };
        assert_eq!(input.value, "me@example.com");
        assert_eq!(input.target.target_text, "Email");
        assert_eq!(input.context.description, "Enter text into Email");
        assert_eq!(
            input.target.selector_strategies[0].kind,
            StrategyKind::Placeholder
        );
        assert!(session.state().element(1).is_some());
    }

    #[test]
    fn test_key_press_has_no_strategies() {
        let mut session = session();
        session.capture_element(3, raw("input", ""));
        let step = session
            .record(
                &ActionRecord::new("send_keys")
                    .with_element_index(3)
                    .with_param("keys", "Enter"),
            )
            .cloned()
            .unwrap();

        let WorkflowStep::KeyPress(press) = step else {
            panic!("Expected key press step");
        };
        assert_eq!(press.key, "Enter");
        assert_eq!(press.context.description, "Press Enter key");
        assert!(press.target.element_hash.is_some());
        assert!(press.target.selector_strategies.is_empty());
    }

    #[test]
    fn test_extract_goal_keys() {
        let mut session = session();
        let step = session
            .record(&ActionRecord::new("extract_content").with_param("goal", "prices"))
            .cloned()
            .unwrap();
        assert_eq!(step.description(), "Extract: prices");

        let step = session
            .record(&ActionRecord::new("extract"))
            .cloned()
            .unwrap();
        assert_eq!(step.description(), "Extract: page content");
    }

    #[test]
    fn test_scroll_directions() {
        let mut session = session();
        let step = session
            .record(&ActionRecord::new("scroll").with_param("pages", 2))
            .cloned()
            .unwrap();
        let WorkflowStep::Scroll(scroll) = step else {
            panic!("Expected scroll step");
        };
        assert_eq!(scroll.scroll_y, 1600);
        assert_eq!(scroll.context.description, "Scroll down 2 pages");

        let step = session
            .record(
                &ActionRecord::new("scroll")
                    .with_param("down", false)
                    .with_param("num_pages", 0.5),
            )
            .cloned()
            .unwrap();
        let WorkflowStep::Scroll(scroll) = step else {
            panic!("Expected scroll step");
        };
        assert_eq!(scroll.scroll_y, -400);
        assert_eq!(scroll.context.description, "Scroll up 0.5 pages");
    }

    #[test]
    fn test_dropdown_becomes_click() {
        let mut session = session();
        session.capture_element(4, raw("select", ""));
        let step = session
            .record(
                &ActionRecord::new("select_dropdown_option")
                    .with_element_index(4)
                    .with_param("text", "California"),
            )
            .cloned()
            .unwrap();

        assert_eq!(step.kind_name(), "click");
        assert_eq!(step.description(), "Select dropdown option: California");
        assert_eq!(step.target().unwrap().target_text, "California");
        assert!(step.strategies().is_empty());
    }

    #[test]
    fn test_ignored_and_unknown_produce_nothing() {
        let mut session = session();
        assert!(session.record(&ActionRecord::new("done")).is_none());
        assert!(session.record(&ActionRecord::new("switch_tab")).is_none());
        assert!(session.record(&ActionRecord::new("hover")).is_none());
        assert!(session.steps().is_empty());
    }

    #[test]
    fn test_navigation_without_url_is_skipped() {
        let mut session = session();
        assert!(session.record(&ActionRecord::new("navigate")).is_none());
        assert!(
            session
                .record(&ActionRecord::new("go_to_url").with_param("url", "  "))
                .is_none()
        );
        assert!(session.steps().is_empty());
    }

    #[test]
    fn test_key_press_without_keys_is_skipped() {
        let mut session = session();
        session.capture_element(3, raw("input", ""));
        assert!(
            session
                .record(&ActionRecord::new("send_keys").with_element_index(3))
                .is_none()
        );

        let step = session
            .record(
                &ActionRecord::new("send-keys")
                    .with_element_index(3)
                    .with_param("key", "Tab"),
            )
            .cloned()
            .unwrap();
        assert_eq!(step.description(), "Press Tab key");
        assert_eq!(session.steps().len(), 1);
    }

    #[test]
    fn test_history_steps() {
        let mut session = session();
        session.record(&ActionRecord::new("go_back"));
        session.record(&ActionRecord::new("go-forward"));

        let workflow = session.finish("History", "");
        assert_eq!(workflow.version, "1.0.0");
        assert_eq!(workflow.steps[0].kind_name(), "go_back");
        assert_eq!(workflow.steps[1].kind_name(), "go_forward");
    }

    #[test]
    fn test_strategies_are_cached_per_fingerprint() {
        let mut session = session();
        session.capture_element(1, raw("button", "Next"));
        session.capture_element(2, raw("button", "Next"));

        session.record(&ActionRecord::new("click").with_element_index(1));
        session.record(&ActionRecord::new("click").with_element_index(2));

        let steps = session.steps();
        assert_eq!(steps[0].target(), steps[1].target());
        let fingerprint = steps[0].target().unwrap().element_hash.clone().unwrap();
        assert!(session.state().cached_strategies(&fingerprint).is_some());
    }

    #[test]
    fn test_enrichment_can_be_disabled() {
        let mut config = WayfindConfig::default();
        config.synthesis.enrich_descriptions = false;
        let mut session = RecordingSession::new(&config);
        session.capture_element(1, raw("a", "Docs"));

        let step = session
            .record(
                &ActionRecord::new("click")
                    .with_element_index(1)
                    .with_page("https://example.com", "Home"),
            )
            .cloned()
            .unwrap();
        assert_eq!(step.description(), "Click on Docs");
        assert_eq!(step.context().page_title.as_deref(), Some("Home"));
    }
}
