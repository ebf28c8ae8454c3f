//! Parse phase: editor JSON → Rust types + graph construction.

pub mod graph;
pub mod types;

pub use graph::WorkflowGraph;
pub use types::*;

use crate::error::{Error, Result};

/// Deserialize a workflow snapshot JSON string.
pub fn parse(json: &str) -> Result<Workflow> {
    serde_json::from_str::<Workflow>(json).map_err(|e| Error::parse("workflow", e))
}

/// Deserialize a single node JSON string.
pub fn parse_node(json: &str) -> Result<WorkflowNode> {
    serde_json::from_str::<WorkflowNode>(json).map_err(|e| Error::parse("node", e))
}

/// Parse JSON and build the graph in one step.
pub fn parse_and_build(json: &str) -> Result<(Workflow, WorkflowGraph)> {
    let workflow = parse(json)?;
    let graph = WorkflowGraph::build(&workflow);
    Ok((workflow, graph))
}
