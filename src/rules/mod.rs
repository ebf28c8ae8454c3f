//! Category compatibility rules.
//!
//! A rule scores how sensible it is to connect a node of one category to a
//! node of another. Lookup is total: every (source, target) pair resolves to
//! exactly one rule, in the order exact → (source, `*`) → (`*`, target) →
//! global fallback.

mod builtin;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parse::types::Category;

pub use builtin::RULE_TABLE_VERSION;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryPattern {
    /// The `*` wildcard.
    Any,
    Is(Category),
}

impl CategoryPattern {
    fn is_exact(&self, category: &Category) -> bool {
        matches!(self, CategoryPattern::Is(c) if c == category)
    }

    fn is_any(&self) -> bool {
        matches!(self, CategoryPattern::Any)
    }
}

impl From<&str> for CategoryPattern {
    fn from(s: &str) -> Self {
        if s == "*" {
            CategoryPattern::Any
        } else {
            CategoryPattern::Is(Category::from(s))
        }
    }
}

impl From<String> for CategoryPattern {
    fn from(s: String) -> Self {
        CategoryPattern::from(s.as_str())
    }
}

impl From<CategoryPattern> for String {
    fn from(p: CategoryPattern) -> Self {
        p.to_string()
    }
}

impl fmt::Display for CategoryPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryPattern::Any => f.write_str("*"),
            CategoryPattern::Is(c) => write!(f, "{c}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompatibilityRule {
    pub source: CategoryPattern,
    pub target: CategoryPattern,
    /// 0–100.
    pub score: u8,
    pub rationale: String,
}

impl CompatibilityRule {
    pub fn new(
        source: impl Into<CategoryPattern>,
        target: impl Into<CategoryPattern>,
        score: u8,
        rationale: impl Into<String>,
    ) -> Self {
        CompatibilityRule {
            source: source.into(),
            target: target.into(),
            score: score.min(100),
            rationale: rationale.into(),
        }
    }

    fn fallback() -> Self {
        CompatibilityRule::new("*", "*", 50, "Generic connection")
    }
}

/// Immutable, versioned rule table.
#[derive(Debug, Clone)]
pub struct RuleTable {
    version: u32,
    rules: Vec<CompatibilityRule>,
    fallback: CompatibilityRule,
}

impl RuleTable {
    /// Build a table from a rule list. The first `(*, *)` rule becomes the
    /// global fallback; without one, `(*, *, 50, "Generic connection")` is used.
    pub fn new(version: u32, rules: Vec<CompatibilityRule>) -> Self {
        let mut fallback = None;
        let mut kept = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.source.is_any() && rule.target.is_any() {
                if fallback.is_none() {
                    fallback = Some(rule);
                }
            } else {
                kept.push(rule);
            }
        }
        RuleTable {
            version,
            rules: kept,
            fallback: fallback.unwrap_or_else(CompatibilityRule::fallback),
        }
    }

    /// The process-wide built-in table, initialised on first use.
    pub fn builtin() -> &'static RuleTable {
        &builtin::BUILTIN
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// All non-fallback rules in declaration order.
    pub fn rules(&self) -> &[CompatibilityRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &CompatibilityRule {
        &self.fallback
    }

    /// Resolve the single rule for a category pair. When two rules share the
    /// same key the one declared first wins.
    pub fn lookup(&self, source: &Category, target: &Category) -> &CompatibilityRule {
        self.rules
            .iter()
            .find(|r| r.source.is_exact(source) && r.target.is_exact(target))
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.source.is_exact(source) && r.target.is_any())
            })
            .or_else(|| {
                self.rules
                    .iter()
                    .find(|r| r.source.is_any() && r.target.is_exact(target))
            })
            .unwrap_or(&self.fallback)
    }

    pub fn score(&self, source: &Category, target: &Category) -> u8 {
        self.lookup(source, target).score
    }
}
