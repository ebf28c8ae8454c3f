//! Node-type registry: ports, field schema and category per node type.
//!
//! The registry is loaded once (usually from the backend's JSON) and then
//! only read. Specs are checked on registration so that validation never has
//! to deal with a contradictory schema.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::fields::{FieldDescriptor, FieldKind};
use super::ports::{Port, PortDirection};
use crate::error::{Error, Result};
use crate::parse::types::{Category, Workflow, WorkflowNode};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeSpec {
    pub id: String,
    pub category: Category,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    /// Configuration wizard steps, in display order.
    #[serde(default)]
    pub steps: Vec<WizardStep>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardStep {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Names of the fields this step gates.
    pub fields: Vec<String>,
}

impl NodeTypeSpec {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        NodeTypeSpec {
            id: id.into(),
            category,
            ports: Vec::new(),
            fields: Vec::new(),
            steps: Vec::new(),
        }
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_step(mut self, id: &str, fields: &[&str]) -> Self {
        self.steps.push(WizardStep {
            id: id.to_string(),
            title: None,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        self
    }

    pub fn step(&self, step_id: &str) -> Option<&WizardStep> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    fn check(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(Error::invalid_node_type(&self.id, "node type id must not be empty"));
        }

        let mut seen_ports = HashSet::new();
        for port in &self.ports {
            if !seen_ports.insert((port.direction, port.id.as_str())) {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("duplicate port '{}'", port.id),
                ));
            }
            if port.direction == PortDirection::Input && self.category == Category::Trigger {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("trigger node types cannot declare input port '{}'", port.id),
                ));
            }
            if port.direction == PortDirection::Output && port.required {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("output port '{}' cannot be required", port.id),
                ));
            }
        }

        let mut seen_fields = HashSet::new();
        for field in &self.fields {
            if !seen_fields.insert(field.name.as_str()) {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("duplicate field '{}'", field.name),
                ));
            }
            self.check_field(field)?;
        }

        for step in &self.steps {
            if let Some(missing) = step.fields.iter().find(|f| !seen_fields.contains(f.as_str())) {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("step '{}' references unknown field '{}'", step.id, missing),
                ));
            }
        }

        Ok(())
    }

    fn check_field(&self, field: &FieldDescriptor) -> Result<()> {
        match &field.kind {
            FieldKind::String {
                min_length,
                max_length,
                pattern,
                ..
            } => {
                if let (Some(min), Some(max)) = (min_length, max_length)
                    && min > max
                {
                    return Err(Error::invalid_node_type(
                        &self.id,
                        format!("field '{}' has minLength greater than maxLength", field.name),
                    ));
                }
                if let Some(pattern) = pattern {
                    pattern.regex().map_err(|source| Error::InvalidPattern {
                        node_type: self.id.clone(),
                        field: field.name.clone(),
                        source: source.clone(),
                    })?;
                }
            }
            FieldKind::Number { min, max } => {
                if let (Some(min), Some(max)) = (min, max)
                    && min > max
                {
                    return Err(Error::invalid_node_type(
                        &self.id,
                        format!("field '{}' has min greater than max", field.name),
                    ));
                }
            }
            FieldKind::Select { options } if options.is_empty() => {
                return Err(Error::invalid_node_type(
                    &self.id,
                    format!("select field '{}' has no options", field.name),
                ));
            }
            FieldKind::Select { .. } | FieldKind::Boolean => {}
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NodeTypeRegistry {
    types: HashMap<String, NodeTypeSpec>,
}

impl NodeTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a JSON array of node-type specs.
    pub fn from_json(json: &str) -> Result<Self> {
        let specs: Vec<NodeTypeSpec> =
            serde_json::from_str(json).map_err(|e| Error::parse("registry", e))?;
        Self::from_specs(specs)
    }

    pub fn from_specs(specs: impl IntoIterator<Item = NodeTypeSpec>) -> Result<Self> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, spec: NodeTypeSpec) -> Result<()> {
        spec.check()?;
        if self.types.contains_key(&spec.id) {
            return Err(Error::DuplicateNodeType(spec.id));
        }
        self.types.insert(spec.id.clone(), spec);
        Ok(())
    }

    pub fn get(&self, node_type: &str) -> Option<&NodeTypeSpec> {
        self.types.get(node_type)
    }

    pub fn lookup(&self, node_type: &str) -> Result<&NodeTypeSpec> {
        self.get(node_type)
            .ok_or_else(|| Error::UnknownNodeType(node_type.to_string()))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The registry spec behind a node, if its type is registered.
    pub fn spec_for(&self, node: &WorkflowNode) -> Option<&NodeTypeSpec> {
        let node_type = node.node_type.as_deref()?;
        let spec = self.get(node_type);
        if spec.is_none() {
            tracing::debug!(node_id = %node.id, node_type, "falling back to the node's own category and ports");
        }
        spec
    }

    /// Nodes naming a type this registry does not know, in snapshot order.
    pub fn unregistered_nodes<'w>(&self, workflow: &'w Workflow) -> Vec<&'w WorkflowNode> {
        workflow
            .nodes
            .iter()
            .filter(|n| n.node_type.as_deref().is_some_and(|t| self.get(t).is_none()))
            .collect()
    }

    /// Registered category of the node's type, else the node's own category.
    pub fn effective_category<'a>(&'a self, node: &'a WorkflowNode) -> &'a Category {
        self.spec_for(node)
            .map(|spec| &spec.category)
            .unwrap_or(&node.category)
    }

    /// The node's own ports when it declares any, else its type's ports.
    pub fn effective_ports<'a>(&'a self, node: &'a WorkflowNode) -> &'a [Port] {
        if !node.ports.is_empty() {
            return &node.ports;
        }
        self.spec_for(node)
            .map(|spec| spec.ports.as_slice())
            .unwrap_or(&[])
    }
}
