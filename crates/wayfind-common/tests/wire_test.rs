use serde_json::json;
use wayfind_common::{ActionRecord, WorkflowDefinition, WorkflowStep};

#[test]
fn test_action_record_snake_case_aliases() {
    let action: ActionRecord = serde_json::from_value(json!({
        "action_type": "input_text",
        "element_index": 3,
        "params": {"text": "hello"},
        "page_url": "https://example.com",
        "page_title": "Example",
        "element": {"tagName": "INPUT", "attributes": {"placeholder": "Name", "id": null}}
    }))
    .unwrap();

    assert_eq!(action.action_type, "input_text");
    assert_eq!(action.index(), Some(3));
    assert_eq!(action.param_str("text"), Some("hello"));
    assert_eq!(action.page_title.as_deref(), Some("Example"));

    let element = action.element.unwrap().normalize().unwrap();
    assert_eq!(element.tag, "input");
    assert_eq!(element.attribute("placeholder"), Some("Name"));
    assert!(!element.attributes.contains_key("id"));
}

#[test]
fn test_blank_params_are_absent() {
    let action: ActionRecord = serde_json::from_value(json!({
        "type": "click",
        "params": {"text": "   ", "index": "7"},
        "rationale": "  "
    }))
    .unwrap();

    assert_eq!(action.param_str("text"), None);
    // String indices are not accepted.
    assert_eq!(action.index(), None);
    assert_eq!(action.rationale_text(), None);
}

#[test]
fn test_workflow_definition_decodes_all_step_kinds() {
    let workflow = WorkflowDefinition::from_json(
        &json!({
            "name": "Everything",
            "version": "1.0.0",
            "input_schema": [{"name": "query"}],
            "steps": [
                {"type": "navigation", "description": "Navigate to https://example.com", "url": "https://example.com"},
                {"type": "input", "description": "Enter text into Search", "targetText": "Search", "value": "{query}"},
                {"type": "click", "description": "Click on Go", "targetText": "Go", "elementHash": "0123456789"},
                {"type": "key_press", "description": "Press Enter key", "targetText": "Search", "key": "Enter"},
                {"type": "extract", "description": "Extract: results", "goal": "results"},
                {"type": "scroll", "description": "Scroll down 1 pages", "scrollX": 0, "scrollY": 800},
                {"type": "go_back", "description": "Navigate back to previous page"},
                {"type": "go_forward", "description": "Navigate forward to next page"}
            ]
        })
        .to_string(),
    )
    .unwrap();

    assert_eq!(workflow.description, "");
    assert_eq!(workflow.input_schema[0].kind, "string");
    assert!(workflow.input_schema[0].required);
    assert_eq!(workflow.steps.len(), 8);
    assert!(matches!(workflow.steps[3], WorkflowStep::KeyPress(ref k) if k.key == "Enter"));
    assert_eq!(workflow.steps[2].target().unwrap().element_hash.as_deref(), Some("0123456789"));
    assert!(workflow.steps[1].strategies().is_empty());
    assert_eq!(workflow.steps[7].kind_name(), "go_forward");
}
