//! Integration tests for node configuration and wizard-step validation.

#[allow(dead_code)]
mod helpers;

use flowguard::parse::Category;
use flowguard::schema::FieldDescriptor;
use flowguard::validate::{self, FieldError};
use helpers::{Fixture, typed};
use serde_json::{Map, Value, json};

fn values(v: Value) -> Map<String, Value> {
    v.as_object().cloned().unwrap_or_default()
}

fn email_schema() -> Vec<FieldDescriptor> {
    vec![FieldDescriptor::string("email").required().pattern("^.+@.+$", None)]
}

#[test]
fn email_pattern() {
    let fields = email_schema();

    let errors = validate::validate_config(&fields, &values(json!({"email": "not-an-email"})));
    assert_eq!(
        errors,
        vec![FieldError {
            field: "email".into(),
            message: "email has invalid format".into(),
        }]
    );

    assert!(validate::validate_config(&fields, &values(json!({"email": "a@b.com"}))).is_empty());
}

#[test]
fn empty_required_value_reports_only_required() {
    let fields = email_schema();
    for empty in [json!({}), json!({"email": ""}), json!({"email": "   "}), json!({"email": null})] {
        let errors = validate::validate_config(&fields, &values(empty.clone()));
        assert_eq!(errors.len(), 1, "{empty}");
        assert_eq!(errors[0].message, "email is required");
    }
}

#[test]
fn validation_is_idempotent() {
    let fields = email_schema();
    let input = values(json!({"email": "nope"}));
    assert_eq!(
        validate::validate_config(&fields, &input),
        validate::validate_config(&fields, &input)
    );
}

#[test]
fn optional_empty_fields_pass() {
    let fields = vec![
        FieldDescriptor::number("retries").range(Some(0.0), Some(5.0)),
        FieldDescriptor::select("mode", ["fast", "safe"]),
    ];
    assert!(validate::is_config_complete(&fields, &Map::new()));
}

#[test]
fn registered_node_config() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    let email = typed("m1", Category::Action, "sendEmail")
        .with_config("to", json!("ops"))
        .with_config("priority", json!("urgent"));
    let errors = validator.validate_node_config(&email).unwrap();
    let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec!["Enter a valid email address", "priority must be one of: low, normal, high"]
    );

    let http = typed("h1", Category::Integration, "httpRequest")
        .with_config("url", json!("https://example.com"))
        .with_config("timeoutSeconds", json!("500"))
        .with_config("followRedirects", json!("yes"));
    let errors = validator.validate_node_config(&http).unwrap();
    let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
    assert_eq!(
        messages,
        vec![
            "Timeout (seconds) must be at most 300",
            "followRedirects must be true or false"
        ]
    );
}

#[test]
fn untyped_and_unknown_nodes() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    let plain = helpers::node("n1", Category::Action);
    assert!(validator.validate_node_config(&plain).unwrap().is_empty());

    let unknown = typed("n2", Category::Action, "sendFax");
    let err = validator.validate_node_config(&unknown).unwrap_err();
    assert_eq!(err.code(), "R001");
}

#[test]
fn wizard_steps_gate_their_own_fields() {
    let registry = helpers::registry();
    let spec = registry.lookup("sendEmail").unwrap();
    let input = values(json!({"subject": "x".repeat(121)}));

    let recipient = validate::validate_step(spec, "recipient", &input).unwrap();
    assert_eq!(recipient.len(), 1);
    assert_eq!(recipient[0].field, "to");

    let content = validate::validate_step(spec, "content", &input).unwrap();
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].message, "subject must be at most 120 characters");

    let err = validate::validate_step(spec, "attachments", &input).unwrap_err();
    assert_eq!(err.code(), "R002");
}

#[test]
fn whole_workflow_configs() {
    let fixture = Fixture::new();
    let validator = fixture.validator();

    let mut workflow = helpers::support_workflow();
    assert!(validator.validate_workflow_configs(&workflow).is_empty());

    workflow.nodes[4].config.insert("channel".into(), json!("support"));
    workflow.nodes.push(typed("x1", Category::Action, "sendFax"));
    let errors = validator.validate_workflow_configs(&workflow);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].node_id, "s1");
    assert_eq!(errors[0].errors[0].message, "Channel must start with #");
}
