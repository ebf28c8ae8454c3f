//! Whole-graph structural validation.
//!
//! Every edge gets exactly one verdict finding. Graph-level checks are
//! advisory warnings unless the cycle policy says otherwise, and they also
//! feed the suggestion engine.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::Validator;
use super::connection::NODE_MISSING;
use crate::config::CyclePolicy;
use crate::parse::graph::WorkflowGraph;
use crate::parse::types::{Category, Workflow, WorkflowEdge};

pub mod codes {
    pub const EDGE_OK: &str = "V000";
    pub const MISSING_ENDPOINT: &str = "V001";
    pub const SELF_LOOP: &str = "V002";
    pub const DUPLICATE_EDGE: &str = "V003";
    pub const INTO_TRIGGER: &str = "V004";
    pub const CONNECTION_REJECTED: &str = "V005";
    pub const TRIGGER_FAN_OUT: &str = "V006";
    pub const CONDITION_WITHOUT_VALUE: &str = "V007";
    pub const DUPLICATE_NODE: &str = "V008";
    pub const CYCLE: &str = "V009";
    pub const NEEDS_TRIGGER: &str = "W001";
    pub const ISOLATED_NODE: &str = "W002";
}

/// Graphs above this size without a trigger get a warning.
const TRIGGERLESS_NODE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Verdict for an edge that passed.
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub code: &'static str,
    pub severity: Severity,
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub edge_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Finding {
    fn edge(code: &'static str, edge: &WorkflowEdge, is_valid: bool, message: impl Into<String>) -> Self {
        Finding {
            code,
            severity: if is_valid { Severity::Info } else { Severity::Error },
            is_valid,
            message: message.into(),
            edge_id: Some(edge.id.clone()),
            node_id: None,
        }
    }

    fn node(code: &'static str, severity: Severity, node_id: &str, message: impl Into<String>) -> Self {
        Finding {
            code,
            severity,
            is_valid: severity != Severity::Error,
            message: message.into(),
            edge_id: None,
            node_id: Some(node_id.to_string()),
        }
    }

    fn graph(code: &'static str, severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            code,
            severity,
            is_valid: severity != Severity::Error,
            message: message.into(),
            edge_id: None,
            node_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphReport {
    pub findings: Vec<Finding>,
}

impl GraphReport {
    /// No error-level findings.
    pub fn is_valid(&self) -> bool {
        self.findings.iter().all(|f| f.severity != Severity::Error)
    }

    pub fn errors(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Error)
    }

    pub fn warnings(&self) -> Vec<&Finding> {
        self.by_severity(Severity::Warning)
    }

    fn by_severity(&self, severity: Severity) -> Vec<&Finding> {
        self.findings.iter().filter(|f| f.severity == severity).collect()
    }

    /// The verdict finding for an edge.
    pub fn edge(&self, edge_id: &str) -> Option<&Finding> {
        self.findings
            .iter()
            .find(|f| f.edge_id.as_deref() == Some(edge_id))
    }

    pub fn for_node(&self, node_id: &str) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| f.node_id.as_deref() == Some(node_id))
            .collect()
    }
}

impl Validator<'_> {
    pub fn validate_graph(&self, workflow: &Workflow) -> GraphReport {
        let graph = WorkflowGraph::build(workflow);
        self.validate_graph_with(workflow, &graph)
    }

    /// Same as [`Validator::validate_graph`] over an already built graph.
    pub fn validate_graph_with(&self, workflow: &Workflow, graph: &WorkflowGraph) -> GraphReport {
        for node in self.registry.unregistered_nodes(workflow) {
            tracing::warn!(
                node_id = %node.id,
                node_type = node.node_type.as_deref(),
                "node references an unregistered type"
            );
        }
        let mut findings = self.edge_findings(workflow);
        findings.extend(self.graph_findings(workflow, graph));

        let report = GraphReport { findings };
        tracing::debug!(
            workflow = %workflow.id,
            nodes = workflow.nodes.len(),
            edges = workflow.edges.len(),
            errors = report.errors().len(),
            warnings = report.warnings().len(),
            "graph validated"
        );
        report
    }

    fn edge_findings(&self, workflow: &Workflow) -> Vec<Finding> {
        let mut findings = Vec::with_capacity(workflow.edges.len());
        let mut seen = HashSet::new();
        let mut trigger_fan_out: HashMap<&str, usize> = HashMap::new();

        for edge in &workflow.edges {
            let source = workflow.node(&edge.source);
            let target = workflow.node(&edge.target);
            let (Some(source_node), Some(target_node)) = (source, target) else {
                findings.push(Finding::edge(codes::MISSING_ENDPOINT, edge, false, NODE_MISSING));
                continue;
            };

            let source_category = self.registry.effective_category(source_node);
            let target_category = self.registry.effective_category(target_node);

            if edge.source == edge.target {
                findings.push(Finding::edge(
                    codes::SELF_LOOP,
                    edge,
                    false,
                    format!("Self-loop detected on node '{}'", edge.source),
                ));
                continue;
            }

            let key = (
                edge.source.as_str(),
                edge.target.as_str(),
                edge.source_handle.as_deref(),
                edge.target_handle.as_deref(),
            );
            if !seen.insert(key) {
                findings.push(Finding::edge(
                    codes::DUPLICATE_EDGE,
                    edge,
                    false,
                    format!("Duplicate connection from '{}' to '{}'", edge.source, edge.target),
                ));
                continue;
            }

            if *target_category == Category::Trigger {
                findings.push(Finding::edge(
                    codes::INTO_TRIGGER,
                    edge,
                    false,
                    "Trigger nodes cannot have incoming connections",
                ));
                continue;
            }

            let verdict = self.validate_connection(
                source,
                target,
                edge.source_handle.as_deref(),
                edge.target_handle.as_deref(),
            );
            if !verdict.is_valid {
                findings.push(Finding::edge(codes::CONNECTION_REJECTED, edge, false, verdict.message));
                continue;
            }

            // Only accepted edges count toward a trigger's single outgoing slot.
            if *source_category == Category::Trigger {
                let count = trigger_fan_out.entry(edge.source.as_str()).or_insert(0);
                *count += 1;
                if *count > 1 {
                    findings.push(Finding::edge(
                        codes::TRIGGER_FAN_OUT,
                        edge,
                        false,
                        "Trigger nodes should have only one outgoing connection",
                    ));
                    continue;
                }
            }

            if *source_category == Category::Condition && edge.condition().is_none() {
                findings.push(Finding::edge(
                    codes::CONDITION_WITHOUT_VALUE,
                    edge,
                    false,
                    "Condition nodes require condition values on connections",
                ));
                continue;
            }

            findings.push(Finding::edge(codes::EDGE_OK, edge, true, verdict.message));
        }

        findings
    }

    /// Graph-level checks, independent of each other.
    pub(crate) fn graph_findings(&self, workflow: &Workflow, graph: &WorkflowGraph) -> Vec<Finding> {
        let mut findings = Vec::new();
        if workflow.nodes.is_empty() {
            return findings;
        }

        for id in &graph.duplicate_nodes {
            findings.push(Finding::node(
                codes::DUPLICATE_NODE,
                Severity::Error,
                id,
                format!("Duplicate node id '{}'", id),
            ));
        }

        let has_trigger = workflow
            .nodes
            .iter()
            .any(|n| *self.registry.effective_category(n) == Category::Trigger);
        if workflow.nodes.len() > TRIGGERLESS_NODE_LIMIT && !has_trigger {
            findings.push(Finding::graph(
                codes::NEEDS_TRIGGER,
                Severity::Warning,
                "Workflow needs a starting trigger",
            ));
        }

        if workflow.nodes.len() > 1 {
            let mut reported = HashSet::new();
            for node in &workflow.nodes {
                if graph.is_isolated(&node.id) && reported.insert(node.id.as_str()) {
                    findings.push(Finding::node(
                        codes::ISOLATED_NODE,
                        Severity::Warning,
                        &node.id,
                        format!("Isolated node: '{}' has no connections", node.id),
                    ));
                }
            }
        }

        let cycle_severity = match self.config.cycle_policy {
            CyclePolicy::Allow => None,
            CyclePolicy::Warn => Some(Severity::Warning),
            CyclePolicy::Error => Some(Severity::Error),
        };
        if let Some(severity) = cycle_severity
            && graph.has_cycle()
        {
            findings.push(Finding::graph(
                codes::CYCLE,
                severity,
                "Workflow graph contains a cycle",
            ));
        }

        findings
    }
}
