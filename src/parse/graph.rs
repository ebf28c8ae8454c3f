//! petgraph-based directed graph wrapper for the canvas snapshot.
//!
//! Building never fails: edges with unknown endpoints and repeated node ids
//! are recorded on the graph for the structural validator to report.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use super::types::Workflow;

pub struct WorkflowGraph {
    /// Node weights are node ids, edge weights are edge ids.
    pub graph: DiGraph<String, String>,
    pub node_indices: HashMap<String, NodeIndex>,
    /// Ids of edges whose source or target is not in the snapshot.
    pub dangling_edges: Vec<String>,
    /// Node ids that appear more than once; only the first occurrence is indexed.
    pub duplicate_nodes: Vec<String>,
}

impl WorkflowGraph {
    pub fn build(workflow: &Workflow) -> Self {
        let mut graph = DiGraph::new();
        let mut node_indices = HashMap::new();
        let mut dangling_edges = Vec::new();
        let mut duplicate_nodes = Vec::new();

        for node in &workflow.nodes {
            if node_indices.contains_key(&node.id) {
                duplicate_nodes.push(node.id.clone());
                continue;
            }
            let idx = graph.add_node(node.id.clone());
            node_indices.insert(node.id.clone(), idx);
        }

        for edge in &workflow.edges {
            match (node_indices.get(&edge.source), node_indices.get(&edge.target)) {
                (Some(&s), Some(&t)) => {
                    graph.add_edge(s, t, edge.id.clone());
                }
                _ => dangling_edges.push(edge.id.clone()),
            }
        }

        WorkflowGraph {
            graph,
            node_indices,
            dangling_edges,
            duplicate_nodes,
        }
    }

    fn neighbors(&self, node_id: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_indices.get(node_id) else {
            return vec![];
        };
        self.graph
            .edges_directed(idx, direction)
            .map(|e| {
                let other = match direction {
                    Direction::Outgoing => e.target(),
                    Direction::Incoming => e.source(),
                };
                self.graph[other].as_str()
            })
            .collect()
    }

    pub fn successors(&self, node_id: &str) -> Vec<&str> {
        self.neighbors(node_id, Direction::Outgoing)
    }

    pub fn predecessors(&self, node_id: &str) -> Vec<&str> {
        self.neighbors(node_id, Direction::Incoming)
    }

    pub fn incoming_count(&self, node_id: &str) -> usize {
        self.predecessors(node_id).len()
    }

    pub fn outgoing_count(&self, node_id: &str) -> usize {
        self.successors(node_id).len()
    }

    /// No incoming and no outgoing edges.
    pub fn is_isolated(&self, node_id: &str) -> bool {
        self.incoming_count(node_id) == 0 && self.outgoing_count(node_id) == 0
    }

    /// True when an edge exists between the two nodes in either direction.
    pub fn are_connected(&self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.node_indices.get(a), self.node_indices.get(b)) else {
            return false;
        };
        self.graph.find_edge(ia, ib).is_some() || self.graph.find_edge(ib, ia).is_some()
    }

    /// A loop through two or more nodes. Self-loops are reported on their
    /// own edge and do not count.
    pub fn has_cycle(&self) -> bool {
        tarjan_scc(&self.graph).iter().any(|component| component.len() > 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::types::{Category, WorkflowEdge, WorkflowNode};

    fn workflow() -> Workflow {
        let mut wf = Workflow::new("wf");
        wf.nodes = vec![
            WorkflowNode::new("t1", Category::Trigger),
            WorkflowNode::new("a1", Category::Action),
            WorkflowNode::new("a2", Category::Action),
            WorkflowNode::new("lonely", Category::Data),
        ];
        wf.edges = vec![
            WorkflowEdge::new("e1", "t1", "a1"),
            WorkflowEdge::new("e2", "a1", "a2"),
            WorkflowEdge::new("e3", "a2", "ghost"),
        ];
        wf
    }

    #[test]
    fn dangling_edges_are_recorded_not_fatal() {
        let graph = WorkflowGraph::build(&workflow());
        assert_eq!(graph.dangling_edges, vec!["e3".to_string()]);
        assert_eq!(graph.outgoing_count("a2"), 0);
    }

    #[test]
    fn degree_queries() {
        let graph = WorkflowGraph::build(&workflow());
        assert_eq!(graph.successors("t1"), vec!["a1"]);
        assert_eq!(graph.predecessors("a2"), vec!["a1"]);
        assert!(graph.is_isolated("lonely"));
        assert!(!graph.is_isolated("a1"));
        assert!(graph.are_connected("a2", "a1"));
        assert!(!graph.are_connected("t1", "a2"));
        assert!(!graph.has_cycle());
    }

    #[test]
    fn cycle_and_duplicates() {
        let mut wf = workflow();
        wf.edges.push(WorkflowEdge::new("back", "a2", "a1"));
        wf.nodes.push(WorkflowNode::new("a1", Category::Action));
        let graph = WorkflowGraph::build(&wf);
        assert!(graph.has_cycle());
        assert_eq!(graph.duplicate_nodes, vec!["a1".to_string()]);
    }

    #[test]
    fn self_loop_is_not_a_cycle() {
        let mut wf = workflow();
        wf.edges.push(WorkflowEdge::new("spin", "a1", "a1"));
        let graph = WorkflowGraph::build(&wf);
        assert!(!graph.has_cycle());
        assert_eq!(graph.outgoing_count("a1"), 2);
    }
}
