//! Actions
//!
//! An action is a shell command template or a `::`-prefixed built-in
//! identifier, together with its options, conditions and per-action settings.

use crate::condition::Condition;
use crate::document::{ActionSettings, ActionSpec};
use crate::settings::Options;
use serde_json::Value;

/// Prefix marking an action handled inside the process instead of a shell
pub const INTERNAL_PREFIX: &str = "::";

/// Where an action was declared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionOrigin {
    /// Declared in the root document
    #[default]
    Local,
    /// Declared in an included document
    Included,
}

/// A configured action
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    action: String,
    label: Option<String>,
    options: Options,
    conditions: Vec<Condition>,
    allow_failure: bool,
    origin: ActionOrigin,
}

impl Action {
    /// Create a local action without options or conditions
    ///
    /// Multi-line identifiers are flattened: every line is trimmed and the
    /// lines are joined with single spaces.
    pub fn new(action: impl AsRef<str>) -> Self {
        Self {
            action: normalize_action(action.as_ref()),
            label: None,
            options: Options::new(),
            conditions: Vec::new(),
            allow_failure: false,
            origin: ActionOrigin::Local,
        }
    }

    /// Build an action from its document shape
    #[must_use]
    pub fn from_spec(spec: ActionSpec, origin: ActionOrigin) -> Self {
        let ActionSpec {
            action,
            options,
            conditions,
            config,
        } = spec;
        Self {
            action: normalize_action(&action),
            label: config.label.filter(|label| !label.is_empty()),
            options,
            conditions,
            allow_failure: config.allow_failure.unwrap_or(false),
            origin,
        }
    }

    /// Set the display label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Add an option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Add a condition
    #[must_use]
    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Tolerate failures of this action
    #[must_use]
    pub fn allowing_failure(mut self, allow: bool) -> Self {
        self.allow_failure = allow;
        self
    }

    /// Set the origin
    #[must_use]
    pub fn with_origin(mut self, origin: ActionOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Command template or built-in identifier
    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    /// Display label, the identifier when no label is configured
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.action)
    }

    /// Options map
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Look up a single option
    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Conditions, all of which must hold
    #[must_use]
    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Whether a failure of this action is tolerated on its own
    #[must_use]
    pub fn is_failure_allowed(&self) -> bool {
        self.allow_failure
    }

    /// Where the action was declared
    #[must_use]
    pub fn origin(&self) -> ActionOrigin {
        self.origin
    }

    /// Whether the action was declared in an included document
    #[must_use]
    pub fn is_included(&self) -> bool {
        self.origin == ActionOrigin::Included
    }

    /// Whether the action is handled in-process
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.action.starts_with(INTERNAL_PREFIX)
    }

    /// Document shape of this action
    #[must_use]
    pub fn to_spec(&self) -> ActionSpec {
        ActionSpec {
            action: self.action.clone(),
            options: self.options.clone(),
            conditions: self.conditions.clone(),
            config: ActionSettings {
                label: self.label.clone(),
                allow_failure: self.allow_failure.then_some(true),
            },
        }
    }
}

fn normalize_action(action: &str) -> String {
    action
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multi_line_action_is_flattened() {
        let action = Action::new("foo\n   bar\n\tbaz\n");
        assert_eq!(action.action(), "foo bar baz");
    }

    #[test]
    fn test_label_defaults_to_action() {
        let action = Action::new("cargo test");
        assert_eq!(action.label(), "cargo test");

        let action = action.with_label("Tests");
        assert_eq!(action.label(), "Tests");
    }

    #[test]
    fn test_from_spec() {
        let spec: ActionSpec = serde_json::from_value(json!({
            "action": "cargo clippy",
            "options": {"deny": "warnings"},
            "conditions": [{"exec": "branch.on", "args": {"name": "main"}}],
            "config": {"label": "Lint", "allow-failure": true}
        }))
        .unwrap();

        let action = Action::from_spec(spec, ActionOrigin::Included);

        assert_eq!(action.label(), "Lint");
        assert_eq!(action.option("deny"), Some(&json!("warnings")));
        assert_eq!(action.conditions().len(), 1);
        assert!(action.is_failure_allowed());
        assert!(action.is_included());
    }

    #[test]
    fn test_to_spec_omits_defaults() {
        let spec = Action::new("make").to_spec();
        assert_eq!(serde_json::to_value(spec).unwrap(), json!({"action": "make"}));
    }

    #[test]
    fn test_internal_actions() {
        assert!(Action::new("::debug.success").is_internal());
        assert!(!Action::new("echo ::").is_internal());
    }
}
