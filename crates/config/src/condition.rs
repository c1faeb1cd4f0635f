//! Condition expression trees
//!
//! A condition is either a leaf naming a registered condition with its
//! arguments, or an `AND`/`OR` node over nested conditions. The document form
//! is the same for both:
//!
//! ```json
//! { "exec": "OR", "args": [
//!     { "exec": "branch.on", "args": { "name": "main" } },
//!     { "exec": "AND", "args": [ ... ] }
//! ] }
//! ```
//!
//! `AND`/`OR` are matched case-insensitively.

use serde::{Deserialize, Serialize};
use serde_json::Value;

const AND: &str = "AND";
const OR: &str = "OR";

/// Document shape of a condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionSpec {
    /// Condition identifier or `AND`/`OR`
    pub exec: String,

    /// Condition arguments, or nested specs for `AND`/`OR`
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub args: Value,
}

/// A parsed condition tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConditionSpec", into = "ConditionSpec")]
pub enum Condition {
    /// A registered condition
    Leaf {
        /// Condition identifier
        exec: String,
        /// Arguments passed to the condition
        args: Value,
    },
    /// True when every child holds
    And(Vec<Condition>),
    /// True when any child holds
    Or(Vec<Condition>),
}

impl Condition {
    /// Create a leaf condition
    pub fn leaf(exec: impl Into<String>, args: Value) -> Self {
        Self::Leaf {
            exec: exec.into(),
            args,
        }
    }

    /// Identifier shown in reports (`AND`, `OR` or the leaf identifier)
    #[must_use]
    pub fn exec(&self) -> &str {
        match self {
            Self::Leaf { exec, .. } => exec,
            Self::And(_) => AND,
            Self::Or(_) => OR,
        }
    }

    /// Nested conditions of a composite node
    #[must_use]
    pub fn children(&self) -> &[Condition] {
        match self {
            Self::Leaf { .. } => &[],
            Self::And(children) | Self::Or(children) => children,
        }
    }

    /// Whether this is an `AND`/`OR` node
    #[must_use]
    pub fn is_composite(&self) -> bool {
        !matches!(self, Self::Leaf { .. })
    }
}

impl TryFrom<ConditionSpec> for Condition {
    type Error = String;

    fn try_from(spec: ConditionSpec) -> Result<Self, Self::Error> {
        let ConditionSpec { exec, args } = spec;
        if exec.trim().is_empty() {
            return Err("condition 'exec' must not be empty".into());
        }

        let composite = if exec.eq_ignore_ascii_case(AND) {
            Some(true)
        } else if exec.eq_ignore_ascii_case(OR) {
            Some(false)
        } else {
            None
        };
        let Some(is_and) = composite else {
            return Ok(Self::Leaf { exec, args });
        };

        let children = match args {
            Value::Null => Vec::new(),
            Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value::<ConditionSpec>(item)
                        .map_err(|e| format!("invalid nested condition in {exec}: {e}"))
                        .and_then(Condition::try_from)
                })
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(format!(
                    "{exec} condition expects a list of conditions, got {other}"
                ));
            }
        };

        Ok(if is_and {
            Self::And(children)
        } else {
            Self::Or(children)
        })
    }
}

impl From<Condition> for ConditionSpec {
    fn from(condition: Condition) -> Self {
        match condition {
            Condition::Leaf { exec, args } => Self { exec, args },
            Condition::And(children) => Self {
                exec: AND.into(),
                args: nested_args(children),
            },
            Condition::Or(children) => Self {
                exec: OR.into(),
                args: nested_args(children),
            },
        }
    }
}

fn nested_args(children: Vec<Condition>) -> Value {
    Value::Array(
        children
            .into_iter()
            .map(|child| {
                let spec = ConditionSpec::from(child);
                let mut object = serde_json::Map::new();
                object.insert("exec".into(), Value::String(spec.exec));
                if !spec.args.is_null() {
                    object.insert("args".into(), spec.args);
                }
                Value::Object(object)
            })
            .collect(),
    )
}
