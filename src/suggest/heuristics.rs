//! Graph-level heuristics: what is the workflow obviously missing?

use super::{Priority, Suggestion};
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Category, Workflow};
use crate::validate::Validator;
use crate::validate::structural::{Finding, Severity, codes};

pub const CONNECT_NODES: &str = "connect-nodes";
pub const ADD_OUTPUT: &str = "add-output";
pub const ADD_ERROR_HANDLING: &str = "add-error-handling";
pub const ADD_TRIGGER: &str = "add-trigger";
pub const USE_TEMPLATES: &str = "use-templates";
pub const ISOLATED_NODE: &str = "isolated-node";
pub const REVIEW_CYCLE: &str = "review-cycle";

const TEMPLATE_NODE_THRESHOLD: usize = 5;

impl Validator<'_> {
    /// Every matching heuristic, high priority first. Ties keep rule order.
    pub fn analyze_graph(&self, workflow: &Workflow) -> Vec<Suggestion> {
        let graph = WorkflowGraph::build(workflow);
        let node_count = workflow.nodes.len();
        let edge_count = workflow.edges.len();
        let mut suggestions = Vec::new();

        if node_count > 1 && edge_count == 0 {
            suggestions.push(Suggestion::new(
                CONNECT_NODES,
                Priority::High,
                "Connect your nodes",
                "Drag from a node's output to another node's input to define the flow.",
            ));
        }

        let has_output = workflow.nodes.iter().any(|n| {
            n.output
                || matches!(
                    self.registry().effective_category(n),
                    Category::Action | Category::Integration
                )
        });
        if !has_output {
            suggestions.push(Suggestion::new(
                ADD_OUTPUT,
                Priority::Medium,
                "Add an output action",
                "Send an email, post a message or call an API so the workflow has a visible result.",
            ));
        }

        if node_count > 2 && !workflow.edges.iter().any(|e| e.is_error_handler()) {
            suggestions.push(Suggestion::new(
                ADD_ERROR_HANDLING,
                Priority::Medium,
                "Add error handling",
                "Route failures to a notification or fallback step.",
            ));
        }

        let has_trigger = workflow
            .nodes
            .iter()
            .any(|n| *self.registry().effective_category(n) == Category::Trigger);
        if !has_trigger {
            suggestions.push(Suggestion::new(
                ADD_TRIGGER,
                Priority::High,
                "Add a trigger",
                "Every workflow needs a trigger that decides when it runs.",
            ));
        }

        if node_count > TEMPLATE_NODE_THRESHOLD {
            suggestions.push(Suggestion::new(
                USE_TEMPLATES,
                Priority::Low,
                "Consider using templates",
                "Larger workflows are easier to start from a template.",
            ));
        }

        // Advisory structural findings. With no edges at all, "connect your
        // nodes" already covers every isolated node.
        for finding in self.graph_findings(workflow, &graph) {
            if let Some(suggestion) = from_finding(&finding, edge_count) {
                suggestions.push(suggestion);
            }
        }

        suggestions.sort_by_key(|s| s.priority);
        tracing::debug!(
            workflow = %workflow.id,
            nodes = node_count,
            edges = edge_count,
            suggestions = suggestions.len(),
            "graph analyzed"
        );
        suggestions
    }
}

fn from_finding(finding: &Finding, edge_count: usize) -> Option<Suggestion> {
    match finding.code {
        codes::ISOLATED_NODE if edge_count > 0 => {
            let node_id = finding.node_id.as_deref()?;
            Some(
                Suggestion::new(
                    format!("{ISOLATED_NODE}:{node_id}"),
                    Priority::Low,
                    "Connect or remove isolated node",
                    &finding.message,
                )
                .for_node(node_id),
            )
        }
        codes::CYCLE if finding.severity == Severity::Warning => Some(Suggestion::new(
            REVIEW_CYCLE,
            Priority::Low,
            "Review loop",
            "This workflow loops back on itself. Make sure the loop has an exit.",
        )),
        _ => None,
    }
}
