//! Per-node configuration validation against a field schema.
//!
//! Used twice by the editor: per wizard step (gating "Next") and for the
//! whole node at submission (gating "Complete"). Both are pure.

use serde::Serialize;
use serde_json::{Map, Value};

use super::Validator;
use crate::error::{Error, Result};
use crate::parse::types::{Workflow, WorkflowNode};
use crate::schema::fields::{FieldDescriptor, FieldKind, is_empty_value};
use crate::schema::registry::NodeTypeSpec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigErrors {
    pub node_id: String,
    pub errors: Vec<FieldError>,
}

/// Validate config values against a field schema, in schema order.
pub fn validate_config(fields: &[FieldDescriptor], values: &Map<String, Value>) -> Vec<FieldError> {
    let mut errors = Vec::new();
    for field in fields {
        validate_field(field, values.get(&field.name), &mut errors);
    }
    errors
}

/// Every required field present and every value well-formed.
pub fn is_config_complete(fields: &[FieldDescriptor], values: &Map<String, Value>) -> bool {
    validate_config(fields, values).is_empty()
}

/// Validate only the fields gated by one wizard step.
pub fn validate_step(
    spec: &NodeTypeSpec,
    step_id: &str,
    values: &Map<String, Value>,
) -> Result<Vec<FieldError>> {
    let step = spec.step(step_id).ok_or_else(|| Error::UnknownStep {
        node_type: spec.id.clone(),
        step: step_id.to_string(),
    })?;
    let fields: Vec<FieldDescriptor> = spec
        .fields
        .iter()
        .filter(|f| step.fields.contains(&f.name))
        .cloned()
        .collect();
    Ok(validate_config(&fields, values))
}

fn validate_field(field: &FieldDescriptor, value: Option<&Value>, errors: &mut Vec<FieldError>) {
    let name = field.display_name();
    let mut push = |message: String| {
        errors.push(FieldError {
            field: field.name.clone(),
            message,
        })
    };

    if is_empty_value(value) {
        if field.required {
            push(format!("{name} is required"));
        }
        return;
    }
    let Some(value) = value else { return };

    match &field.kind {
        FieldKind::Number { min, max } => {
            let Some(number) = as_finite_number(value) else {
                push(format!("{name} must be a valid number"));
                return;
            };
            if let Some(min) = min
                && number < *min
            {
                push(format!("{name} must be at least {min}"));
            }
            if let Some(max) = max
                && number > *max
            {
                push(format!("{name} must be at most {max}"));
            }
        }
        FieldKind::String {
            min_length,
            max_length,
            pattern,
            pattern_message,
        } => {
            let Some(text) = value.as_str() else {
                push(format!("{name} must be text"));
                return;
            };
            let length = text.chars().count();
            if let Some(min) = min_length
                && length < *min
            {
                push(format!("{name} must be at least {min} characters"));
            }
            if let Some(max) = max_length
                && length > *max
            {
                push(format!("{name} must be at most {max} characters"));
            }
            if let Some(pattern) = pattern {
                match pattern.regex() {
                    Ok(re) if !re.is_match(text) => push(
                        pattern_message
                            .clone()
                            .unwrap_or_else(|| format!("{name} has invalid format")),
                    ),
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(field = %field.name, error = %e, "skipping uncompilable field pattern");
                    }
                }
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                push(format!("{name} must be true or false"));
            }
        }
        FieldKind::Select { options } => {
            let chosen = value.as_str().is_some_and(|v| options.iter().any(|o| o == v));
            if !chosen {
                push(format!("{name} must be one of: {}", options.join(", ")));
            }
        }
    }
}

/// JSON numbers, or strings that parse as a finite number.
fn as_finite_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

impl Validator<'_> {
    /// Validate a node's config against its registered type. Nodes without a
    /// type have no schema and always pass.
    pub fn validate_node_config(&self, node: &WorkflowNode) -> Result<Vec<FieldError>> {
        let Some(node_type) = node.node_type.as_deref() else {
            return Ok(Vec::new());
        };
        let spec = self.registry.lookup(node_type)?;
        Ok(validate_config(&spec.fields, &node.config))
    }

    /// Validate every node's config for submission. Unknown node types are
    /// skipped rather than failing the whole pass.
    pub fn validate_workflow_configs(&self, workflow: &Workflow) -> Vec<NodeConfigErrors> {
        workflow
            .nodes
            .iter()
            .filter_map(|node| {
                let errors = match self.validate_node_config(node) {
                    Ok(errors) => errors,
                    Err(e) => {
                        tracing::warn!(node_id = %node.id, error = %e, "skipping config validation");
                        return None;
                    }
                };
                (!errors.is_empty()).then(|| NodeConfigErrors {
                    node_id: node.id.clone(),
                    errors,
                })
            })
            .collect()
    }
}
