//! Per-hook configuration

use crate::action::Action;
use crate::document::HookSpec;
use bosun_core::Hook;

/// Enabled flag and ordered actions of one hook
#[derive(Debug, Clone, PartialEq)]
pub struct HookConfig {
    hook: Hook,
    enabled: bool,
    actions: Vec<Action>,
    execution_view: bool,
}

impl HookConfig {
    /// A disabled hook without actions
    #[must_use]
    pub fn new(hook: Hook) -> Self {
        Self {
            hook,
            enabled: false,
            actions: Vec::new(),
            execution_view: false,
        }
    }

    /// An execution view assembled for a trigger
    pub(crate) fn execution_view(hook: Hook, enabled: bool, actions: Vec<Action>) -> Self {
        Self {
            hook,
            enabled,
            actions,
            execution_view: true,
        }
    }

    /// The hook this configuration belongs to
    #[must_use]
    pub fn hook(&self) -> Hook {
        self.hook
    }

    /// Hook name
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.hook.as_str()
    }

    /// Whether the hook itself is enabled
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the hook
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Actions in execution order
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Append an action
    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// Whether any action is configured
    #[must_use]
    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Whether any action was declared in the root document
    #[must_use]
    pub fn has_local_actions(&self) -> bool {
        self.actions.iter().any(|action| !action.is_included())
    }

    /// Whether this is a combined view built for execution rather than the
    /// stored configuration
    #[must_use]
    pub fn is_execution_view(&self) -> bool {
        self.execution_view
    }

    /// Document shape of this hook
    #[must_use]
    pub fn to_spec(&self) -> HookSpec {
        HookSpec {
            enabled: Some(self.enabled),
            actions: self.actions.iter().map(Action::to_spec).collect(),
        }
    }
}
