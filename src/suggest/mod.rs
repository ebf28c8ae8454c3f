//! Read-only graph analysis producing ranked, dismissible suggestions.

pub mod connections;
pub mod dismiss;
pub mod heuristics;

use serde::{Deserialize, Serialize};

pub use connections::ConnectionSuggestion;
pub use dismiss::Dismissals;

/// Ordered so that sorting ascending puts `High` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Stable id used for dismissals, e.g. `connect-nodes` or `isolated-node:n3`.
    pub id: String,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
}

impl Suggestion {
    fn new(id: impl Into<String>, priority: Priority, title: &str, message: &str) -> Self {
        Suggestion {
            id: id.into(),
            priority,
            title: title.to_string(),
            message: message.to_string(),
            node_id: None,
        }
    }

    fn for_node(mut self, node_id: &str) -> Self {
        self.node_id = Some(node_id.to_string());
        self
    }
}
