//! Connection validation: may an output port of one node feed an input port
//! of another?
//!
//! Checks run in a fixed order and the first failure wins:
//! existence → port resolution → data type → required → category → custom rules.

use serde::Serialize;

use super::Validator;
use crate::parse::types::{Workflow, WorkflowEdge, WorkflowNode};
use crate::schema::ports::{DataType, Endpoint, PortDirection, find_port};

pub const NODE_MISSING: &str = "Connected node does not exist";
pub const CONNECTION_VALID: &str = "Connection is valid";
pub const NUMBER_TO_STRING_ADVISORY: &str = "Implicit conversion: number will be converted to string";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionVerdict {
    pub is_valid: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Compatibility score of the category pairing, once both nodes exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    /// True when the connection is valid but the message warns about it.
    pub advisory: bool,
}

impl ConnectionVerdict {
    pub fn valid(message: impl Into<String>) -> Self {
        ConnectionVerdict {
            is_valid: true,
            message: message.into(),
            source: None,
            target: None,
            score: None,
            advisory: false,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        ConnectionVerdict {
            is_valid: false,
            ..ConnectionVerdict::valid(message)
        }
    }

    fn between(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source = source.map(str::to_string);
        self.target = target.map(str::to_string);
        self
    }

    fn scored(mut self, score: u8) -> Self {
        self.score = Some(score);
        self
    }
}

/// Outcome of comparing two port data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCheck {
    Compatible,
    /// Accepted with an implicit conversion the user should know about.
    Coerced(&'static str),
    Mismatch,
}

pub fn check_data_types(source: DataType, target: DataType) -> TypeCheck {
    match (source, target) {
        (s, t) if s == t => TypeCheck::Compatible,
        (DataType::Any, _) | (_, DataType::Any) => TypeCheck::Compatible,
        (DataType::Number, DataType::String) => TypeCheck::Coerced(NUMBER_TO_STRING_ADVISORY),
        _ => TypeCheck::Mismatch,
    }
}

impl Validator<'_> {
    /// Validate a proposed connection. Handles select specific ports; `None`
    /// means the node's default port.
    pub fn validate_connection(
        &self,
        source: Option<&WorkflowNode>,
        target: Option<&WorkflowNode>,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> ConnectionVerdict {
        let verdict = self
            .check_connection(source, target, source_handle, target_handle)
            .between(source.map(|n| n.id.as_str()), target.map(|n| n.id.as_str()));
        tracing::trace!(
            source = verdict.source.as_deref(),
            target = verdict.target.as_deref(),
            is_valid = verdict.is_valid,
            message = %verdict.message,
            "connection checked"
        );
        verdict
    }

    /// Validate an existing edge of a workflow, resolving its endpoints by id.
    pub fn validate_edge(&self, workflow: &Workflow, edge: &WorkflowEdge) -> ConnectionVerdict {
        self.validate_connection(
            workflow.node(&edge.source),
            workflow.node(&edge.target),
            edge.source_handle.as_deref(),
            edge.target_handle.as_deref(),
        )
    }

    fn check_connection(
        &self,
        source: Option<&WorkflowNode>,
        target: Option<&WorkflowNode>,
        source_handle: Option<&str>,
        target_handle: Option<&str>,
    ) -> ConnectionVerdict {
        // 1. Both endpoints exist
        let (Some(source), Some(target)) = (
            source.filter(|n| !n.is_malformed()),
            target.filter(|n| !n.is_malformed()),
        ) else {
            return ConnectionVerdict::invalid(NODE_MISSING);
        };

        let source_category = self.registry.effective_category(source);
        let target_category = self.registry.effective_category(target);
        let rule = self.rules.lookup(source_category, target_category);
        let fail = |message: String| ConnectionVerdict::invalid(message).scored(rule.score);

        // 2. Ports are opt-in metadata
        let source_ports = self.registry.effective_ports(source);
        let target_ports = self.registry.effective_ports(target);
        if source_ports.is_empty() || target_ports.is_empty() {
            return ConnectionVerdict::valid(CONNECTION_VALID).scored(rule.score);
        }

        let Some(target_port) = find_port(target_ports, PortDirection::Input, target_handle) else {
            return fail(match target_handle {
                Some(handle) => format!("Node '{}' has no input port '{}'", target.id, handle),
                None => format!("Node '{}' does not accept incoming connections", target.id),
            });
        };
        let source_port = find_port(source_ports, PortDirection::Output, source_handle);

        // 3. Data types
        let mut advisory = None;
        if let Some(source_port) = source_port {
            match check_data_types(source_port.data_type, target_port.data_type) {
                TypeCheck::Compatible => {}
                TypeCheck::Coerced(message) => advisory = Some(message),
                TypeCheck::Mismatch => {
                    return fail(format!(
                        "Type mismatch: cannot connect {} to {}",
                        source_port.data_type, target_port.data_type
                    ));
                }
            }
        }

        // 4. Required input needs something to read from
        if target_port.required && source_port.is_none() {
            return fail(format!(
                "Input '{}' is required but the source provides no output",
                target_port.id
            ));
        }

        // 5. Categories: an explicit allow-list decides, else the rule table
        let allowed_by_target = target_port.allows(source_category);
        let allowed_by_source = source_port.and_then(|p| p.allows(target_category));
        let category_ok = match (allowed_by_target, allowed_by_source) {
            (None, None) => self.config.is_valid_score(rule.score),
            (by_target, by_source) => by_target.unwrap_or(true) && by_source.unwrap_or(true),
        };
        if !category_ok {
            return fail(format!(
                "Invalid connection: {} cannot connect to {}",
                source_category, target_category
            ));
        }

        // 6. Custom rules, in declaration order
        let source_end = Endpoint {
            node: source,
            category: source_category,
            port: source_port,
        };
        let target_end = Endpoint {
            node: target,
            category: target_category,
            port: Some(target_port),
        };
        for custom in &target_port.rules {
            if let Err(message) = custom.check(&source_end, &target_end) {
                return fail(message);
            }
        }

        // 7. Valid
        match advisory {
            Some(message) => {
                let mut verdict = ConnectionVerdict::valid(message).scored(rule.score);
                verdict.advisory = true;
                verdict
            }
            None => ConnectionVerdict::valid(CONNECTION_VALID).scored(rule.score),
        }
    }
}
