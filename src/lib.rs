//! Validation and compatibility engine for a visual workflow builder.
//!
//! - [`rules`]: category compatibility table
//! - [`schema`]: ports, field schema, node-type registry
//! - [`validate`]: connection, graph and node-configuration validators
//! - [`suggest`]: graph heuristics and connection suggestions
//! - [`session`]: minimum-display / last-request-wins delivery for the UI

pub mod config;
pub mod error;
pub mod parse;
pub mod rules;
pub mod schema;
pub mod session;
pub mod suggest;
pub mod validate;
pub mod wasm;

pub use config::{CyclePolicy, ValidatorConfig};
pub use error::{Error, Result};
pub use rules::{CompatibilityRule, RuleTable};
pub use schema::NodeTypeRegistry;
pub use validate::Validator;
