//! Built-in compatibility table.
//!
//! Bump `RULE_TABLE_VERSION` whenever a score or rationale changes so that
//! editors caching suggestions can invalidate them.

use std::sync::LazyLock;

use super::{CompatibilityRule, RuleTable};

pub const RULE_TABLE_VERSION: u32 = 1;

/// (source, target, score, rationale)
const RULES: &[(&str, &str, u8, &str)] = &[
    // Triggers start the flow.
    ("trigger", "action", 95, "Triggers typically start actions"),
    ("trigger", "condition", 90, "Branch right away on the trigger payload"),
    ("trigger", "integration", 85, "Send trigger data to a connected service"),
    ("trigger", "data", 85, "Load or store data when the workflow starts"),
    ("trigger", "transformer", 80, "Reshape the trigger payload before using it"),
    ("trigger", "agent", 80, "Hand the trigger payload to an agent"),
    ("trigger", "trigger", 0, "A workflow has a single starting point"),
    ("trigger", "*", 70, "Triggers can start most nodes"),
    // Actions
    ("action", "action", 80, "Chain actions in sequence"),
    ("action", "condition", 85, "Check the result of an action"),
    ("action", "integration", 80, "Forward action results to a service"),
    ("action", "data", 75, "Persist action results"),
    ("action", "transformer", 75, "Reshape action output"),
    ("action", "agent", 70, "Let an agent reason over action output"),
    // Conditions route to whatever follows a branch.
    ("condition", "action", 90, "Run an action on a branch"),
    ("condition", "condition", 75, "Nest another check"),
    ("condition", "trigger", 0, "Triggers cannot receive connections"),
    ("condition", "*", 70, "Continue the flow on a branch"),
    // Data
    ("data", "transformer", 90, "Transform loaded data"),
    ("data", "condition", 80, "Branch on data values"),
    ("data", "action", 80, "Act on loaded data"),
    ("data", "trigger", 0, "Triggers cannot receive connections"),
    ("data", "*", 65, "Pass data along"),
    // Transformers
    ("transformer", "action", 85, "Use the transformed payload"),
    ("transformer", "trigger", 0, "Triggers cannot receive connections"),
    ("transformer", "*", 75, "Pass the transformed payload along"),
    // Integrations
    ("integration", "transformer", 80, "Normalise the service response"),
    ("integration", "trigger", 0, "Triggers cannot receive connections"),
    ("integration", "*", 70, "Continue with the service response"),
    // Agents
    ("agent", "action", 85, "Execute what the agent decided"),
    ("agent", "trigger", 0, "Triggers cannot receive connections"),
    ("agent", "*", 70, "Continue with the agent result"),
    // Anything into a trigger
    ("*", "trigger", 0, "Triggers cannot receive connections"),
    ("*", "*", 50, "Generic connection"),
];

pub(super) static BUILTIN: LazyLock<RuleTable> = LazyLock::new(|| {
    let rules = RULES
        .iter()
        .map(|&(source, target, score, rationale)| {
            CompatibilityRule::new(source, target, score, rationale)
        })
        .collect();
    RuleTable::new(RULE_TABLE_VERSION, rules)
});
