//! Inline variable markers.
//!
//! A recorded value written as `VAR:first_name:John` turns into the placeholder
//! `{first_name}` and a declared string input named `first_name`.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;
use wayfind_common::workflow::{InputDefinition, WorkflowDefinition, WorkflowStep};

static VAR_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"VAR:([a-z_][a-z0-9_]*):(\S+)").unwrap());

/// One `VAR:<name>:<value>` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableMarker {
    pub name: String,
    /// Value recorded alongside the marker.
    pub value: String,
}

/// All markers in `text`, in order of appearance.
pub fn find_markers(text: &str) -> Vec<VariableMarker> {
    VAR_MARKER
        .captures_iter(text)
        .map(|caps| VariableMarker {
            name: caps[1].to_string(),
            value: caps[2].to_string(),
        })
        .collect()
}

/// Replace every marker in `text` with its `{name}` placeholder.
pub fn replace_markers(text: &str) -> Cow<'_, str> {
    VAR_MARKER.replace_all(text, |caps: &Captures| format!("{{{}}}", &caps[1]))
}

/// Rewrite markers in every step of `workflow` and declare the variables they
/// name in its input schema.
///
/// Returns the markers found, one per variable name (first occurrence wins).
pub fn apply_markers(workflow: &mut WorkflowDefinition) -> Vec<VariableMarker> {
    let mut found: Vec<VariableMarker> = Vec::new();

    for step in &mut workflow.steps {
        for field in marker_fields(step) {
            for marker in find_markers(field) {
                if !found.iter().any(|m| m.name == marker.name) {
                    found.push(marker);
                }
            }
            if VAR_MARKER.is_match(field) {
                *field = replace_markers(field).into_owned();
            }
        }
    }

    for marker in &found {
        let input = InputDefinition::string(&marker.name);
        match workflow
            .input_schema
            .iter_mut()
            .find(|existing| existing.name == marker.name)
        {
            Some(existing) => *existing = input,
            None => workflow.input_schema.push(input),
        }
    }

    debug!(variables = found.len(), "Applied variable markers");
    found
}

/// Text fields of a step that may carry markers.
fn marker_fields(step: &mut WorkflowStep) -> Vec<&mut String> {
    match step {
        WorkflowStep::Navigation(s) => vec![&mut s.url, &mut s.context.description],
        WorkflowStep::Input(s) => vec![
            &mut s.value,
            &mut s.target.target_text,
            &mut s.context.description,
        ],
        WorkflowStep::Click(s) => vec![&mut s.target.target_text, &mut s.context.description],
        WorkflowStep::KeyPress(s) => vec![&mut s.target.target_text, &mut s.context.description],
        WorkflowStep::Extract(s) => vec![&mut s.context.description],
        WorkflowStep::Scroll(s) => vec![&mut s.context.description],
        WorkflowStep::GoBack(s) | WorkflowStep::GoForward(s) => vec![&mut s.context.description],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfind_common::workflow::{ElementTarget, InputStep, NavigationStep, StepContext};

    fn input_step(value: &str) -> WorkflowStep {
        WorkflowStep::Input(InputStep {
            context: StepContext::new(format!("Enter text into {}", value)),
            target: ElementTarget {
                target_text: "First Name".into(),
                ..Default::default()
            },
            value: value.into(),
        })
    }

    #[test]
    fn test_find_and_replace() {
        let text = "search?q=VAR:search_term:laptop&page=1 and VAR:page_size:20";
        let markers = find_markers(text);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].name, "search_term");
        assert_eq!(markers[0].value, "laptop&page=1");
        assert_eq!(replace_markers(text), "search?q={search_term} and {page_size}");
    }

    #[test]
    fn test_uppercase_names_are_not_markers() {
        assert!(find_markers("VAR:Name:John").is_empty());
        assert!(matches!(replace_markers("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_apply_to_workflow() {
        let mut workflow = WorkflowDefinition::new(
            "Signup",
            "",
            "1.0.0",
            vec![
                WorkflowStep::Navigation(NavigationStep {
                    context: StepContext::new("Navigate to site"),
                    url: "https://example.com/?ref=VAR:referrer:mail".into(),
                }),
                input_step("VAR:first_name:John"),
                input_step("VAR:first_name:Jane"),
            ],
        );
        workflow.input_schema.push(InputDefinition {
            name: "first_name".into(),
            kind: "number".into(),
            format: None,
            required: false,
        });

        let found = apply_markers(&mut workflow);

        assert_eq!(
            found.iter().map(|m| m.value.as_str()).collect::<Vec<_>>(),
            vec!["mail", "John"]
        );
        assert_eq!(workflow.input_schema.len(), 2);
        assert_eq!(workflow.input_schema[0], InputDefinition::string("first_name"));
        assert_eq!(workflow.input_schema[1].name, "referrer");

        let WorkflowStep::Input(input) = &workflow.steps[1] else {
            panic!("Expected input step");
        };
        assert_eq!(input.value, "{first_name}");
        assert_eq!(input.context.description, "Enter text into {first_name}");

        let WorkflowStep::Navigation(nav) = &workflow.steps[0] else {
            panic!("Expected navigation step");
        };
        assert_eq!(nav.url, "https://example.com/?ref={referrer}");
    }
}
