//! Port schema: typed, directional attachment points and their rules.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::is_empty_value;
use crate::parse::types::{Category, WorkflowNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    #[default]
    Any,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::String => "string",
            DataType::Number => "number",
            DataType::Boolean => "boolean",
            DataType::Object => "object",
            DataType::Array => "array",
            DataType::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Port {
    pub id: String,
    pub direction: PortDirection,
    #[serde(default)]
    pub data_type: DataType,
    /// Only meaningful on input ports.
    #[serde(default)]
    pub required: bool,
    /// Input ports: allowed source categories. Output ports: allowed target categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_categories: Option<Vec<Category>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<PortRule>,
}

impl Port {
    pub fn input(id: impl Into<String>, data_type: DataType) -> Self {
        Port::new(id, PortDirection::Input, data_type)
    }

    pub fn output(id: impl Into<String>, data_type: DataType) -> Self {
        Port::new(id, PortDirection::Output, data_type)
    }

    fn new(id: impl Into<String>, direction: PortDirection, data_type: DataType) -> Self {
        Port {
            id: id.into(),
            direction,
            data_type,
            required: false,
            allowed_categories: None,
            rules: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn allow(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.allowed_categories = Some(categories.into_iter().collect());
        self
    }

    pub fn with_rule(mut self, rule: PortRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// `None` when the port declares no allow-list.
    pub fn allows(&self, category: &Category) -> Option<bool> {
        self.allowed_categories
            .as_ref()
            .map(|allowed| allowed.contains(category))
    }
}

/// Resolve a port by handle. Without a handle the node's default port is
/// the first declared port of the requested direction.
pub fn find_port<'a>(
    ports: &'a [Port],
    direction: PortDirection,
    handle: Option<&str>,
) -> Option<&'a Port> {
    let mut candidates = ports.iter().filter(|p| p.direction == direction);
    match handle {
        Some(handle) => candidates.find(|p| p.id == handle),
        None => candidates.next(),
    }
}

// =============================================================================
// CUSTOM RULES
// =============================================================================

/// Declarative custom validator attached to a port. Evaluated in declaration
/// order after the built-in checks; the first failure wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PortRule {
    NoSelfConnection {
        #[serde(default)]
        message: Option<String>,
    },
    DenyCategories {
        categories: Vec<Category>,
        #[serde(default)]
        message: Option<String>,
    },
    SourcePorts {
        ports: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
    RequireSourceConfig {
        key: String,
        #[serde(default)]
        message: Option<String>,
    },
    MatchConfig {
        source_key: String,
        target_key: String,
        #[serde(default)]
        message: Option<String>,
    },
}

/// One side of a proposed connection as seen by a custom rule.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    pub node: &'a WorkflowNode,
    pub category: &'a Category,
    pub port: Option<&'a Port>,
}

impl PortRule {
    /// `Err` carries the failure message.
    pub fn check(&self, source: &Endpoint<'_>, target: &Endpoint<'_>) -> Result<(), String> {
        match self {
            PortRule::NoSelfConnection { message } => {
                if source.node.id == target.node.id {
                    return Err(or_default(message, || {
                        format!("Node '{}' cannot connect to itself", source.node.id)
                    }));
                }
            }
            PortRule::DenyCategories { categories, message } => {
                if categories.contains(source.category) {
                    return Err(or_default(message, || {
                        format!(
                            "Invalid connection: {} cannot connect to {}",
                            source.category, target.category
                        )
                    }));
                }
            }
            PortRule::SourcePorts { ports, message } => {
                let port_id = source.port.map(|p| p.id.as_str());
                if !port_id.is_some_and(|id| ports.iter().any(|p| p == id)) {
                    return Err(or_default(message, || {
                        format!("Input only accepts connections from: {}", ports.join(", "))
                    }));
                }
            }
            PortRule::RequireSourceConfig { key, message } => {
                if is_empty_value(source.node.config.get(key)) {
                    return Err(or_default(message, || {
                        format!("Source node '{}' must configure '{}'", source.node.id, key)
                    }));
                }
            }
            PortRule::MatchConfig {
                source_key,
                target_key,
                message,
            } => {
                let left = source.node.config.get(source_key);
                let right = target.node.config.get(target_key);
                if is_empty_value(left) || is_empty_value(right) || left != right {
                    return Err(or_default(message, || {
                        format!("'{}' must match '{}' on both nodes", source_key, target_key)
                    }));
                }
            }
        }
        Ok(())
    }
}

fn or_default(message: &Option<String>, default: impl FnOnce() -> String) -> String {
    message.clone().unwrap_or_else(default)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn endpoint<'a>(node: &'a WorkflowNode, port: Option<&'a Port>) -> Endpoint<'a> {
        Endpoint {
            node,
            category: &node.category,
            port,
        }
    }

    #[test]
    fn default_port_is_first_of_direction() {
        let ports = vec![
            Port::input("in", DataType::Any),
            Port::output("main", DataType::Object),
            Port::output("error", DataType::Object),
        ];
        assert_eq!(find_port(&ports, PortDirection::Output, None).unwrap().id, "main");
        assert_eq!(
            find_port(&ports, PortDirection::Output, Some("error")).unwrap().id,
            "error"
        );
        // Handles only resolve against ports of the requested direction.
        assert!(find_port(&ports, PortDirection::Output, Some("in")).is_none());
    }

    #[test]
    fn rules_deserialize_by_kind() {
        let rules: Vec<PortRule> = serde_json::from_value(json!([
            {"kind": "noSelfConnection"},
            {"kind": "matchConfig", "sourceKey": "chain", "targetKey": "chain", "message": "Chains differ"}
        ]))
        .unwrap();
        assert_eq!(rules[0], PortRule::NoSelfConnection { message: None });
        assert!(matches!(&rules[1], PortRule::MatchConfig { source_key, .. } if source_key == "chain"));
    }

    #[test]
    fn match_config_requires_equal_values() {
        let rule = PortRule::MatchConfig {
            source_key: "chain".into(),
            target_key: "network".into(),
            message: Some("Chains differ".into()),
        };
        let a = WorkflowNode::new("a", Category::Data).with_config("chain", json!("base"));
        let b = WorkflowNode::new("b", Category::Action).with_config("network", json!("base"));
        let c = WorkflowNode::new("c", Category::Action).with_config("network", json!("mainnet"));
        assert!(rule.check(&endpoint(&a, None), &endpoint(&b, None)).is_ok());
        assert_eq!(
            rule.check(&endpoint(&a, None), &endpoint(&c, None)),
            Err("Chains differ".to_string())
        );
    }

    #[test]
    fn source_ports_rule_needs_a_resolved_port() {
        let rule = PortRule::SourcePorts {
            ports: vec!["error".into()],
            message: None,
        };
        let node = WorkflowNode::new("a", Category::Action);
        let error_port = Port::output("error", DataType::Object);
        let main_port = Port::output("main", DataType::Object);
        let target = WorkflowNode::new("b", Category::Action);
        assert!(rule.check(&endpoint(&node, Some(&error_port)), &endpoint(&target, None)).is_ok());
        let err = rule
            .check(&endpoint(&node, Some(&main_port)), &endpoint(&target, None))
            .unwrap_err();
        assert!(err.contains("error"));
        assert!(rule.check(&endpoint(&node, None), &endpoint(&target, None)).is_err());
    }
}
