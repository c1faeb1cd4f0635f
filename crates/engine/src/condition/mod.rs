//! Condition evaluation
//!
//! Leaf conditions are looked up by identifier in a [`ConditionRegistry`];
//! `AND`/`OR` nodes are evaluated in order with short-circuiting.

pub mod builtin;

use crate::context::HookContext;
use bosun_config::Condition;
use bosun_core::{Error, Result};
use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

/// A named condition implementation
pub trait ConditionHandler {
    /// Evaluate the condition for the given arguments
    fn is_true(&self, args: &Value, ctx: &HookContext<'_>) -> Result<bool>;
}

impl<F> ConditionHandler for F
where
    F: Fn(&Value, &HookContext<'_>) -> Result<bool>,
{
    fn is_true(&self, args: &Value, ctx: &HookContext<'_>) -> Result<bool> {
        self(args, ctx)
    }
}

/// Identifier → condition implementation
#[derive(Default)]
pub struct ConditionRegistry {
    handlers: IndexMap<String, Box<dyn ConditionHandler>>,
}

impl ConditionRegistry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in conditions
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Register or replace a condition
    pub fn register(&mut self, exec: impl Into<String>, handler: impl ConditionHandler + 'static) {
        self.handlers.insert(exec.into(), Box::new(handler));
    }

    /// Look up a condition
    #[must_use]
    pub fn get(&self, exec: &str) -> Option<&dyn ConditionHandler> {
        self.handlers.get(exec).map(|handler| &**handler)
    }

    /// Registered identifiers
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

/// Evaluates condition trees against a registry
#[derive(Clone, Copy)]
pub struct ConditionEvaluator<'r> {
    registry: &'r ConditionRegistry,
}

impl<'r> ConditionEvaluator<'r> {
    /// Evaluator backed by `registry`
    #[must_use]
    pub fn new(registry: &'r ConditionRegistry) -> Self {
        Self { registry }
    }

    /// Evaluate a single condition tree
    ///
    /// `AND` stops at the first false child and is true when empty; `OR`
    /// stops at the first true child and is false when empty.
    pub fn evaluate(&self, condition: &Condition, ctx: &HookContext<'_>) -> Result<bool> {
        let result = match condition {
            Condition::Leaf { exec, args } => {
                let handler = self
                    .registry
                    .get(exec)
                    .ok_or_else(|| Error::UnresolvedCondition { exec: exec.clone() })?;
                handler.is_true(args, ctx)?
            }
            Condition::And(children) => self.all_hold(children, ctx)?,
            Condition::Or(children) => self.any_holds(children, ctx)?,
        };
        trace!(condition = condition.exec(), result, "condition evaluated");
        Ok(result)
    }

    /// Whether every condition holds, the implicit `AND` of an action's conditions
    pub fn all_hold(&self, conditions: &[Condition], ctx: &HookContext<'_>) -> Result<bool> {
        for condition in conditions {
            if !self.evaluate(condition, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn any_holds(&self, conditions: &[Condition], ctx: &HookContext<'_>) -> Result<bool> {
        for condition in conditions {
            if self.evaluate(condition, ctx)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use bosun_config::Configuration;
    use bosun_core::{DetachedRepository, Hook};
    use serde_json::json;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counting(result: bool, calls: &Rc<Cell<usize>>) -> impl ConditionHandler + 'static {
        let calls = Rc::clone(calls);
        move |_: &Value, _: &HookContext<'_>| -> Result<bool> {
            calls.set(calls.get() + 1);
            Ok(result)
        }
    }

    struct Fixture {
        registry: ConditionRegistry,
        true_calls: Rc<Cell<usize>>,
        false_calls: Rc<Cell<usize>>,
    }

    fn fixture() -> Fixture {
        let true_calls = Rc::new(Cell::new(0));
        let false_calls = Rc::new(Cell::new(0));
        let mut registry = ConditionRegistry::new();
        registry.register("yes", counting(true, &true_calls));
        registry.register("no", counting(false, &false_calls));
        Fixture {
            registry,
            true_calls,
            false_calls,
        }
    }

    fn parse(value: serde_json::Value) -> Condition {
        serde_json::from_value(value).unwrap()
    }

    fn with_ctx<T>(f: impl FnOnce(&HookContext<'_>) -> T) -> T {
        let config = Configuration::new("/repo/bosun.json");
        let ctx = HookContext::new(Hook::PreCommit, &config, &DetachedRepository, &[]);
        f(&ctx)
    }

    #[test]
    fn test_and_short_circuits_on_first_false() {
        let fx = fixture();
        let condition = parse(json!({"exec": "AND", "args": [
            {"exec": "yes"}, {"exec": "no"}, {"exec": "yes"}
        ]}));

        let result = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx));

        assert!(!result.unwrap());
        assert_eq!(fx.true_calls.get(), 1);
        assert_eq!(fx.false_calls.get(), 1);
    }

    #[test]
    fn test_or_short_circuits_on_first_true() {
        let fx = fixture();
        let condition = parse(json!({"exec": "or", "args": [
            {"exec": "no"}, {"exec": "yes"}, {"exec": "no"}
        ]}));

        let result = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx));

        assert!(result.unwrap());
        assert_eq!(fx.false_calls.get(), 1);
        assert_eq!(fx.true_calls.get(), 1);
    }

    #[test]
    fn test_empty_composites() {
        let fx = fixture();
        let evaluator = ConditionEvaluator::new(&fx.registry);

        with_ctx(|ctx| {
            assert!(evaluator.evaluate(&Condition::And(vec![]), ctx).unwrap());
            assert!(!evaluator.evaluate(&Condition::Or(vec![]), ctx).unwrap());
            assert!(evaluator.all_hold(&[], ctx).unwrap());
        });
    }

    #[test]
    fn test_nested_tree() {
        let fx = fixture();
        let condition = parse(json!({"exec": "OR", "args": [
            {"exec": "AND", "args": [{"exec": "yes"}, {"exec": "no"}]},
            {"exec": "AND", "args": [{"exec": "yes"}, {"exec": "yes"}]}
        ]}));

        let result = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx));

        assert!(result.unwrap());
        assert_eq!(fx.true_calls.get(), 3);
        assert_eq!(fx.false_calls.get(), 1);
    }

    #[test]
    fn test_deep_nesting() {
        let fx = fixture();
        let mut condition = Condition::leaf("yes", Value::Null);
        for depth in 0..64 {
            condition = if depth % 2 == 0 {
                Condition::And(vec![condition])
            } else {
                Condition::Or(vec![condition])
            };
        }

        let result = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx));

        assert!(result.unwrap());
        assert_eq!(fx.true_calls.get(), 1);
    }

    #[test]
    fn test_unknown_condition() {
        let fx = fixture();
        let condition = Condition::leaf("does.not-exist", Value::Null);

        let err = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx))
            .unwrap_err();

        assert!(matches!(err, Error::UnresolvedCondition { ref exec } if exec == "does.not-exist"));
    }

    #[test]
    fn test_unknown_condition_after_short_circuit_is_not_reached() {
        let fx = fixture();
        let condition = parse(json!({"exec": "AND", "args": [
            {"exec": "no"}, {"exec": "does.not-exist"}
        ]}));

        let result = with_ctx(|ctx| ConditionEvaluator::new(&fx.registry).evaluate(&condition, ctx));

        assert!(!result.unwrap());
    }
}
