//! Candidate connections for a selected node, ranked by compatibility.

use serde::Serialize;

use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Category, Workflow, WorkflowNode};
use crate::validate::Validator;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionSuggestion {
    pub source_id: String,
    pub target_id: String,
    pub score: u8,
    pub rationale: String,
}

impl ConnectionSuggestion {
    /// The node on the other end from `node_id`.
    pub fn peer_of(&self, node_id: &str) -> &str {
        if self.source_id == node_id {
            &self.target_id
        } else {
            &self.source_id
        }
    }
}

impl Validator<'_> {
    /// Up to `max_connection_suggestions` new connections involving `node_id`,
    /// best score first. Unknown ids yield nothing.
    pub fn suggest_connections_for(&self, node_id: &str, workflow: &Workflow) -> Vec<ConnectionSuggestion> {
        let Some(selected) = workflow.node(node_id) else {
            return Vec::new();
        };
        let graph = WorkflowGraph::build(workflow);
        let mut suggestions = Vec::new();

        for candidate in &workflow.nodes {
            if candidate.id == selected.id || graph.are_connected(&selected.id, &candidate.id) {
                continue;
            }
            if let Some(s) = self.candidate(selected, candidate, &graph) {
                suggestions.push(s);
            }
            if let Some(s) = self.candidate(candidate, selected, &graph) {
                suggestions.push(s);
            }
        }

        // Stable: equal scores keep graph order, outgoing before incoming.
        suggestions.sort_by(|a, b| b.score.cmp(&a.score));
        suggestions.truncate(self.config().max_connection_suggestions);
        suggestions
    }

    fn candidate(
        &self,
        source: &WorkflowNode,
        target: &WorkflowNode,
        graph: &WorkflowGraph,
    ) -> Option<ConnectionSuggestion> {
        let source_category = self.registry().effective_category(source);
        if *source_category == Category::Trigger && graph.outgoing_count(&source.id) > 0 {
            return None;
        }

        let rule = self
            .rules()
            .lookup(source_category, self.registry().effective_category(target));
        if !self.config().is_suggestable_score(rule.score) {
            return None;
        }
        if !self
            .validate_connection(Some(source), Some(target), None, None)
            .is_valid
        {
            return None;
        }

        Some(ConnectionSuggestion {
            source_id: source.id.clone(),
            target_id: target.id.clone(),
            score: rule.score,
            rationale: rule.rationale.clone(),
        })
    }
}
