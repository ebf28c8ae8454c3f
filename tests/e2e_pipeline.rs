//! End-to-end: parse canvas JSON, validate it, analyze it, and deliver the
//! result through a validation session.

#[allow(dead_code)]
mod helpers;

use std::time::{Duration, Instant};

use flowguard::parse::{self, Category};
use flowguard::schema::{DataType, FieldDescriptor, Port};
use flowguard::session::{Delivery, ValidationSession};
use flowguard::validate;
use flowguard::{NodeTypeRegistry, Validator, ValidatorConfig};
use serde_json::{Map, json};

#[test]
fn trigger_and_action_without_edges() {
    let json = r#"{
        "id": "wf-1",
        "nodes": [
            {"id": "t1", "category": "trigger"},
            {"id": "a1", "category": "action"}
        ],
        "edges": []
    }"#;
    let workflow = parse::parse(json).expect("Should parse");
    let registry = NodeTypeRegistry::new();
    let config = ValidatorConfig::default();
    let validator = Validator::builtin(&registry, &config);

    let report = validator.validate_graph(&workflow);
    assert!(report.findings.iter().all(|f| f.edge_id.is_none()), "{report:?}");

    let suggestions = validator.analyze_graph(&workflow);
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].id, "connect-nodes");
}

#[test]
fn object_output_into_required_string_input() {
    let registry = NodeTypeRegistry::new();
    let config = ValidatorConfig::default();
    let validator = Validator::builtin(&registry, &config);

    let source = helpers::node("s", Category::Integration).with_port(Port::output("body", DataType::Object));
    let target = helpers::node("t", Category::Action).with_port(Port::input("text", DataType::String).required());

    let verdict = validator.validate_connection(Some(&source), Some(&target), None, None);
    assert!(!verdict.is_valid);
    assert!(verdict.message.contains("Type mismatch"), "{}", verdict.message);
}

#[test]
fn email_field_rejects_then_accepts() {
    let fields = vec![FieldDescriptor::string("email").pattern("^.+@.+$", None)];
    let mut values = Map::new();

    values.insert("email".into(), json!("not-an-email"));
    assert_eq!(validate::validate_config(&fields, &values).len(), 1);

    values.insert("email".into(), json!("a@b.com"));
    assert!(validate::validate_config(&fields, &values).is_empty());
}

#[test]
fn full_pipeline_on_support_workflow() {
    let fixture = helpers::Fixture::new();
    let validator = fixture.validator();
    let (workflow, graph) = parse::parse_and_build(include_str!("fixtures/support_workflow.json")).unwrap();

    let report = validator.validate_graph_with(&workflow, &graph);
    assert!(report.is_valid(), "{:?}", report.errors());
    assert!(validator.validate_workflow_configs(&workflow).is_empty());

    let suggestions = validator.analyze_graph(&workflow);
    assert!(suggestions.iter().all(|s| s.id != "add-trigger"));

    // Every existing edge re-validates the same way on its own.
    for edge in &workflow.edges {
        assert!(validator.validate_edge(&workflow, edge).is_valid, "{}", edge.id);
    }
}

#[test]
fn only_the_latest_result_is_delivered() {
    let fixture = helpers::Fixture::new();
    let validator = fixture.validator();
    let workflow = helpers::support_workflow();
    let mut session = ValidationSession::from_config(validator.config());

    let t0 = Instant::now();
    let (stale, _) = session.run(t0, || validator.validate_graph(&workflow));
    let (ticket, report) = session.run(t0 + Duration::from_millis(50), || validator.validate_graph(&workflow));

    assert_eq!(session.complete(stale, report.clone(), t0), Delivery::Stale);
    match session.complete(ticket, report, t0 + Duration::from_millis(60)) {
        Delivery::Ready { deliver_at, result } => {
            assert_eq!(deliver_at, t0 + Duration::from_millis(450));
            assert!(result.is_valid());
        }
        Delivery::Stale => panic!("latest request reported stale"),
    }
}
