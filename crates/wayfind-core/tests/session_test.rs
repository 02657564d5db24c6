use serde_json::json;
use wayfind_common::protocol::RecordedTrace;
use wayfind_common::workflow::{StrategyKind, WorkflowStep};
use wayfind_core::protocol::DomSnapshot;
use wayfind_core::{ElementResolver, RecordingSession, WayfindConfig, apply_markers};

fn trace() -> RecordedTrace {
    serde_json::from_value(json!({
        "name": "License lookup",
        "elements": {
            "4": {"tag_name": "input", "attributes": {"name": "ctl00$MainContent$txtLastName"}},
            "7": {"tag_name": "button", "node_value": "Search", "attributes": {"type": "submit"}},
            "12": {"tag_name": "a", "node_value": "AP00945776", "attributes": {"href": "/license/AP00945776"}}
        },
        "actions": [
            {"actionType": "go_to_url", "params": {"url": "https://lookup.example.gov"}},
            {"actionType": "input_text", "elementIndex": 4,
             "params": {"text": "VAR:last_name:Smith"},
             "pageTitle": "License Search"},
            {"actionType": "click_element", "params": {"index": 7},
             "rationale": "Run the search"},
            {"actionType": "click_element", "elementIndex": 12,
             "rationale": "Open the license record for the provider"},
            {"actionType": "extract_page_content", "params": {"value": "license status"}},
            {"actionType": "done", "params": {"text": "finished"}}
        ]
    }))
    .unwrap()
}

#[test]
fn test_trace_to_workflow() {
    let config = WayfindConfig::default();
    let session = RecordingSession::from_trace(trace(), &config);
    let mut workflow = session.finish("License lookup", "Find a license");
    let variables = apply_markers(&mut workflow);

    let kinds: Vec<&str> = workflow.steps.iter().map(|s| s.kind_name()).collect();
    assert_eq!(kinds, vec!["navigation", "input", "click", "click", "extract"]);

    let WorkflowStep::Input(input) = &workflow.steps[1] else {
        panic!("Expected input step");
    };
    assert_eq!(input.value, "{last_name}");
    assert_eq!(input.target.target_text, "Last Name");
    assert_eq!(
        input.context.description,
        "Enter text into Last Name (on License Search)"
    );
    // No visible text and no label attributes: nothing to locate by.
    assert!(input.target.selector_strategies.is_empty());
    assert!(input.target.element_hash.is_some());

    let search = workflow.steps[2].target().unwrap();
    assert_eq!(search.target_text, "Search");
    assert_eq!(search.selector_strategies[1].kind, StrategyKind::RoleText);
    assert_eq!(search.selector_strategies[1].meta_str("role"), Some("button"));

    let WorkflowStep::Click(record) = &workflow.steps[3] else {
        panic!("Expected click step");
    };
    assert_eq!(record.target.target_text, "license number link");
    assert_eq!(record.original_target_text.as_deref(), Some("AP00945776"));
    assert_eq!(record.position_hint.as_deref(), Some("first"));

    assert_eq!(workflow.steps[4].description(), "Extract: license status");

    assert_eq!(variables.len(), 1);
    assert_eq!(workflow.input_schema.len(), 1);
    assert_eq!(workflow.input_schema[0].name, "last_name");
    assert!(workflow.input_schema[0].required);
}

#[test]
fn test_workflow_json_shape() {
    let workflow = RecordingSession::from_trace(trace(), &WayfindConfig::default())
        .finish("License lookup", "");
    let value = serde_json::to_value(&workflow).unwrap();

    assert_eq!(value["version"], "1.0.0");
    assert_eq!(value["steps"][0]["type"], "navigation");
    assert_eq!(value["steps"][0]["url"], "https://lookup.example.gov");
    assert_eq!(value["steps"][2]["selectorStrategies"][0]["type"], "text_exact");
    assert_eq!(value["steps"][2]["selectorStrategies"][0]["priority"], 1);
    assert_eq!(value["steps"][2]["rationale"], "Run the search");
    assert_eq!(value["steps"][3]["containerHint"], "search results");
    assert!(value["steps"][0].get("pageTitle").is_none());
}

#[test]
fn test_recorded_click_replays_against_snapshot() {
    let workflow = RecordingSession::from_trace(trace(), &WayfindConfig::default())
        .finish("License lookup", "");
    let snapshot = DomSnapshot::from_json(
        r#"{"elements": [
            {"index": 0, "tagName": "a", "text": "Help"},
            {"index": 1, "tagName": "input", "attributes": {"type": "submit"}, "text": "Search"}
        ]}"#,
    )
    .unwrap();

    let resolution = ElementResolver::default()
        .resolve_step(&workflow, 2, Some(&snapshot))
        .unwrap();
    assert_eq!(resolution.index(), Some(1));
    assert_eq!(
        resolution.strategy().map(|s| s.kind),
        Some(StrategyKind::TextExact)
    );
}

#[test]
fn test_custom_scroll_ratio() {
    let mut config = WayfindConfig::default();
    config.synthesis.scroll_pixels_per_page = 600;
    let trace: RecordedTrace = serde_json::from_value(json!({
        "actions": [{"actionType": "scroll", "params": {"direction": "up", "pages": 2}}]
    }))
    .unwrap();

    let workflow = RecordingSession::from_trace(trace, &config).finish("Scroll", "");
    let WorkflowStep::Scroll(scroll) = &workflow.steps[0] else {
        panic!("Expected scroll step");
    };
    assert_eq!(scroll.scroll_y, -1200);
    assert_eq!(scroll.scroll_x, 0);
}
