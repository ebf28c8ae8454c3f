//! Unified error type for loading inputs and registry lookups.
//!
//! Validation outcomes are never reported through this type: verdicts,
//! findings and field errors are plain data. `Error` covers the cases where
//! the caller handed us something we cannot work with at all.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse {what} JSON: {source}")]
    Parse {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown node type '{0}'")]
    UnknownNodeType(String),

    #[error("node type '{node_type}' has no wizard step '{step}'")]
    UnknownStep { node_type: String, step: String },

    #[error("duplicate node type '{0}' in registry")]
    DuplicateNodeType(String),

    #[error("node type '{node_type}': {message}")]
    InvalidNodeType { node_type: String, message: String },

    #[error("node type '{node_type}': field '{field}' has an invalid pattern: {source}")]
    InvalidPattern {
        node_type: String,
        field: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid validator config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn parse(what: &'static str, source: serde_json::Error) -> Self {
        Error::Parse { what, source }
    }

    pub fn invalid_node_type(node_type: &str, message: impl Into<String>) -> Self {
        Error::InvalidNodeType {
            node_type: node_type.to_string(),
            message: message.into(),
        }
    }

    /// Stable short code for the error, mirrored in the JS-facing DTOs.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Parse { .. } => "P001",
            Error::UnknownNodeType(_) => "R001",
            Error::UnknownStep { .. } => "R002",
            Error::DuplicateNodeType(_) => "R003",
            Error::InvalidNodeType { .. } => "R004",
            Error::InvalidPattern { .. } => "R005",
            Error::InvalidConfig(_) => "K001",
        }
    }
}
