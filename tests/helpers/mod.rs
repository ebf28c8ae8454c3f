use flowguard::parse::{Category, Workflow, WorkflowEdge, WorkflowNode};
use flowguard::{NodeTypeRegistry, Validator, ValidatorConfig};

// =============================================================================
// Workflow builders
// =============================================================================

/// Node without a registered type or ports.
pub fn node(id: &str, category: Category) -> WorkflowNode {
    WorkflowNode::new(id, category)
}

/// Node whose type resolves through the fixture registry.
pub fn typed(id: &str, category: Category, node_type: &str) -> WorkflowNode {
    WorkflowNode::new(id, category).with_type(node_type)
}

pub fn edge(source: &str, target: &str) -> WorkflowEdge {
    WorkflowEdge::new(format!("{source}->{target}"), source, target)
}

pub fn workflow(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Workflow {
    Workflow {
        nodes,
        edges,
        ..Workflow::new("test-wf")
    }
}

/// Trigger `t1` plus action `a1`, not connected.
pub fn trigger_and_action() -> Workflow {
    workflow(
        vec![node("t1", Category::Trigger), node("a1", Category::Action)],
        vec![],
    )
}

// =============================================================================
// Registry / validator
// =============================================================================

pub fn registry() -> NodeTypeRegistry {
    NodeTypeRegistry::from_json(include_str!("../fixtures/registry.json")).expect("fixture registry should load")
}

pub fn support_workflow() -> Workflow {
    flowguard::parse::parse(include_str!("../fixtures/support_workflow.json")).expect("fixture workflow should parse")
}

/// Owns everything a [`Validator`] borrows.
pub struct Fixture {
    pub registry: NodeTypeRegistry,
    pub config: ValidatorConfig,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture {
            registry: registry(),
            config: ValidatorConfig::default(),
        }
    }

    /// No registered node types: only inline ports count.
    pub fn bare() -> Self {
        Fixture {
            registry: NodeTypeRegistry::new(),
            config: ValidatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ValidatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn validator(&self) -> Validator<'_> {
        Validator::builtin(&self.registry, &self.config)
    }
}
