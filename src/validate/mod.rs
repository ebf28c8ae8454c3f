//! Validation phase: connections, whole-graph structure, node configuration.
//!
//! All entry points hang off [`Validator`], which only borrows immutable
//! inputs. It is `Send + Sync`, holds no state between calls and never
//! mutates the snapshot it is given.

pub mod connection;
pub mod node_config;
pub mod structural;

pub use connection::{ConnectionVerdict, TypeCheck, check_data_types};
pub use node_config::{FieldError, NodeConfigErrors, is_config_complete, validate_config, validate_step};
pub use structural::{Finding, GraphReport, Severity};

use crate::config::ValidatorConfig;
use crate::rules::RuleTable;
use crate::schema::NodeTypeRegistry;

#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    rules: &'a RuleTable,
    registry: &'a NodeTypeRegistry,
    config: &'a ValidatorConfig,
}

impl<'a> Validator<'a> {
    pub fn new(rules: &'a RuleTable, registry: &'a NodeTypeRegistry, config: &'a ValidatorConfig) -> Self {
        Validator {
            rules,
            registry,
            config,
        }
    }

    /// Validator over the built-in rule table.
    pub fn builtin(registry: &'a NodeTypeRegistry, config: &'a ValidatorConfig) -> Self {
        Validator::new(RuleTable::builtin(), registry, config)
    }

    pub fn rules(&self) -> &'a RuleTable {
        self.rules
    }

    pub fn registry(&self) -> &'a NodeTypeRegistry {
        self.registry
    }

    pub fn config(&self) -> &'a ValidatorConfig {
        self.config
    }
}
