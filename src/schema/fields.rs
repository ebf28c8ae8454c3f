//! Field schema: the configurable settings of a node type.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FieldKind {
    String {
        #[serde(default)]
        min_length: Option<usize>,
        #[serde(default)]
        max_length: Option<usize>,
        #[serde(default)]
        pattern: Option<Pattern>,
        #[serde(default)]
        pattern_message: Option<String>,
    },
    Number {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    Boolean,
    Select {
        options: Vec<String>,
    },
}

impl FieldDescriptor {
    fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        FieldDescriptor {
            name: name.into(),
            label: None,
            required: false,
            kind,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        FieldDescriptor::new(
            name,
            FieldKind::String {
                min_length: None,
                max_length: None,
                pattern: None,
                pattern_message: None,
            },
        )
    }

    pub fn number(name: impl Into<String>) -> Self {
        FieldDescriptor::new(name, FieldKind::Number { min: None, max: None })
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        FieldDescriptor::new(name, FieldKind::Boolean)
    }

    pub fn select<S: Into<String>>(name: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        FieldDescriptor::new(
            name,
            FieldKind::Select {
                options: options.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// No-op on non-string fields.
    pub fn length(mut self, min: Option<usize>, max: Option<usize>) -> Self {
        if let FieldKind::String {
            min_length,
            max_length,
            ..
        } = &mut self.kind
        {
            *min_length = min;
            *max_length = max;
        }
        self
    }

    /// No-op on non-string fields.
    pub fn pattern(mut self, regex: impl Into<String>, message: Option<&str>) -> Self {
        if let FieldKind::String {
            pattern,
            pattern_message,
            ..
        } = &mut self.kind
        {
            *pattern = Some(Pattern::new(regex));
            *pattern_message = message.map(str::to_string);
        }
        self
    }

    /// No-op on non-number fields.
    pub fn range(mut self, lower: Option<f64>, upper: Option<f64>) -> Self {
        if let FieldKind::Number { min, max } = &mut self.kind {
            *min = lower;
            *max = upper;
        }
        self
    }

    /// Name shown in error messages.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A string field's regex. Compiled on first use and kept with the
/// descriptor, so registry load pays for compilation once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Pattern {
    source: String,
    compiled: OnceLock<Result<Regex, regex::Error>>,
}

impl Pattern {
    pub fn new(source: impl Into<String>) -> Self {
        Pattern {
            source: source.into(),
            compiled: OnceLock::new(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> Result<&Regex, &regex::Error> {
        self.compiled
            .get_or_init(|| Regex::new(&self.source))
            .as_ref()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl From<&str> for Pattern {
    fn from(source: &str) -> Self {
        Pattern::new(source)
    }
}

impl From<String> for Pattern {
    fn from(source: String) -> Self {
        Pattern::new(source)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        pattern.source
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Absent, null, blank string, or empty array.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}
