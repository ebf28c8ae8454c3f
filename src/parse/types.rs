//! Rust types mirroring the editor's graph snapshot.
//!
//! These types are the serde target for the canvas JSON (`{id, nodes,
//! edges}`). Field names follow the editor's camelCase shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::schema::ports::Port;

// =============================================================================
// CATEGORY
// =============================================================================

/// The role of a node, used as the key for compatibility rules.
///
/// Unknown names deserialize into `Other` so that newer editors can ship
/// categories before this crate knows about them; such categories resolve
/// through the rule table's wildcard and fallback rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Trigger,
    Action,
    Condition,
    Data,
    Integration,
    Agent,
    Transformer,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Trigger => "trigger",
            Category::Action => "action",
            Category::Condition => "condition",
            Category::Data => "data",
            Category::Integration => "integration",
            Category::Agent => "agent",
            Category::Transformer => "transformer",
            Category::Other(name) => name,
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "trigger" => Category::Trigger,
            "action" => Category::Action,
            "condition" => Category::Condition,
            "data" => Category::Data,
            "integration" => Category::Integration,
            "agent" => Category::Agent,
            "transformer" => Category::Transformer,
            _ => Category::Other(name.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        Category::from(name.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// WORKFLOW SNAPSHOT
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Keys suggestion dismissals. Without one, dismissals are not remembered.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

impl Workflow {
    pub fn new(id: impl Into<String>) -> Self {
        Workflow {
            id: id.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn has_trigger(&self) -> bool {
        self.nodes.iter().any(|n| n.is_trigger())
    }
}

// =============================================================================
// NODE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub id: String,
    /// Node-type registry id, e.g. `"sendEmail"`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<Port>,
    #[serde(default)]
    pub config: Map<String, Value>,
    /// Marks the node as producing the workflow's visible output.
    #[serde(default)]
    pub output: bool,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, category: Category) -> Self {
        WorkflowNode {
            id: id.into(),
            node_type: None,
            category,
            ports: Vec::new(),
            config: Map::new(),
            output: false,
        }
    }

    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    pub fn with_port(mut self, port: Port) -> Self {
        self.ports.push(port);
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }

    pub fn is_trigger(&self) -> bool {
        self.category == Category::Trigger
    }

    /// Nodes with an empty id are treated like missing nodes.
    pub fn is_malformed(&self) -> bool {
        self.id.trim().is_empty()
    }
}

// =============================================================================
// EDGE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Option<String>,
    pub target_handle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<EdgeData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeData {
    /// Branch discriminant for edges leaving a condition node.
    pub condition: Option<String>,
    #[serde(default)]
    pub error_handler: bool,
    pub label: Option<String>,
}

impl WorkflowEdge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        WorkflowEdge {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            source_handle: None,
            target_handle: None,
            data: None,
        }
    }

    pub fn with_handles(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source_handle = source.map(str::to_string);
        self.target_handle = target.map(str::to_string);
        self
    }

    pub fn with_condition(mut self, condition: impl Into<String>) -> Self {
        self.data.get_or_insert_with(EdgeData::default).condition = Some(condition.into());
        self
    }

    pub fn as_error_handler(mut self) -> Self {
        self.data.get_or_insert_with(EdgeData::default).error_handler = true;
        self
    }

    /// The branch discriminant, if present and non-blank.
    pub fn condition(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|d| d.condition.as_deref())
            .filter(|c| !c.trim().is_empty())
    }

    pub fn is_error_handler(&self) -> bool {
        self.data.as_ref().is_some_and(|d| d.error_handler)
    }
}
