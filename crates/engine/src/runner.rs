//! Hook execution
//!
//! [`HookRunner`] resolves the actions of a trigger, evaluates each action's
//! conditions right before it would run, expands placeholders and hands the
//! command to an [`ActionExecutor`]. Actions run strictly in order.

use crate::command;
use crate::condition::{ConditionEvaluator, ConditionRegistry};
use crate::context::HookContext;
use crate::executor::{ActionExecutor, ActionOutcome, ShellExecutor};
use bosun_config::{Action, Configuration};
use bosun_core::{Error, Hook, RepositoryInspector, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// What happened to an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    /// Conditions did not hold
    Skipped,
    /// Ran and succeeded
    Succeeded,
    /// Ran and failed
    Failed {
        /// Whether the failure is tolerated by `allow-failure`
        tolerated: bool,
    },
}

/// Result of one action of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    /// Display label
    pub label: String,
    /// Command after placeholder expansion, empty when skipped
    pub command: String,
    /// Outcome
    pub status: ActionStatus,
    /// Captured output
    pub output: String,
}

/// Result of a hook run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// The triggered hook
    pub hook: Hook,
    /// Whether the hook was enabled, directly or through its virtual hook
    pub enabled: bool,
    /// One entry per action that was considered
    pub results: Vec<ActionResult>,
    /// Number of actions in the execution list
    pub total: usize,
    /// Whether remaining actions were skipped after a failure
    pub aborted: bool,
}

impl RunReport {
    fn disabled(hook: Hook) -> Self {
        Self {
            hook,
            enabled: false,
            results: Vec::new(),
            total: 0,
            aborted: false,
        }
    }

    /// Number of failures that are not tolerated
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.status == ActionStatus::Failed { tolerated: false })
            .count()
    }

    /// Whether the run succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed_count() == 0
    }

    /// `HookFailed` when any failure was not tolerated
    pub fn ensure_success(&self) -> Result<()> {
        match self.failed_count() {
            0 => Ok(()),
            failed => Err(Error::HookFailed {
                hook: self.hook.to_string(),
                failed,
                total: self.total,
            }),
        }
    }
}

/// Receives progress while a hook runs
pub trait Reporter {
    /// The execution list was assembled
    fn hook_started(&self, _hook: Hook, _actions: usize) {}

    /// An action was skipped or finished
    fn action_finished(&self, _result: &ActionResult) {}
}

/// Hook execution runner
pub struct HookRunner<'a, E = ShellExecutor>
where
    E: ActionExecutor,
{
    config: &'a Configuration,
    repository: &'a dyn RepositoryInspector,
    conditions: ConditionRegistry,
    executor: E,
    reporter: Option<&'a dyn Reporter>,
    working_dir: Option<PathBuf>,
}

impl<'a> HookRunner<'a, ShellExecutor> {
    /// Create a runner with the built-in conditions and the shell executor
    ///
    /// For custom configuration, use [`HookRunner::builder`].
    pub fn new(config: &'a Configuration, repository: &'a dyn RepositoryInspector) -> Self {
        Self::builder(config, repository).build()
    }

    /// Create a builder for configuring a `HookRunner`
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let runner = HookRunner::builder(&config, &inspector)
    ///     .working_dir(repo_root)
    ///     .reporter(&terminal)
    ///     .build();
    /// let report = runner.run("pre-commit", &args)?;
    /// ```
    pub fn builder(
        config: &'a Configuration,
        repository: &'a dyn RepositoryInspector,
    ) -> HookRunnerBuilder<'a, ShellExecutor> {
        HookRunnerBuilder {
            config,
            repository,
            conditions: None,
            executor: ShellExecutor,
            reporter: None,
            working_dir: None,
        }
    }
}

impl<E> HookRunner<'_, E>
where
    E: ActionExecutor,
{
    /// Run the actions configured for a hook
    ///
    /// A disabled hook yields an empty report. Failing actions are recorded
    /// in the report; use [`RunReport::ensure_success`] to turn them into an
    /// error. Unknown hook names and unknown conditions are errors.
    #[tracing::instrument(skip(self, args), fields(hook = %name))]
    pub fn run(&self, name: &str, args: &[String]) -> Result<RunReport> {
        let hook: Hook = name.parse()?;
        if !self.config.is_hook_enabled(name, true)? {
            debug!("hook is disabled");
            return Ok(RunReport::disabled(hook));
        }

        let view = self.config.executable_hook_config(name)?;
        let mut ctx = HookContext::new(hook, self.config, self.repository, args);
        if let Some(dir) = &self.working_dir {
            ctx = ctx.with_working_dir(dir);
        }
        let evaluator = ConditionEvaluator::new(&self.conditions);

        let mut report = RunReport {
            hook,
            enabled: true,
            results: Vec::with_capacity(view.actions().len()),
            total: view.actions().len(),
            aborted: false,
        };
        if let Some(reporter) = self.reporter {
            reporter.hook_started(hook, report.total);
        }

        for action in view.actions() {
            let result = if evaluator.all_hold(action.conditions(), &ctx)? {
                self.run_action(action, &ctx)
            } else {
                debug!(action = %action.label(), "conditions not met, skipping");
                ActionResult {
                    label: action.label().to_string(),
                    command: String::new(),
                    status: ActionStatus::Skipped,
                    output: String::new(),
                }
            };

            if let Some(reporter) = self.reporter {
                reporter.action_finished(&result);
            }
            let stop = result.status == ActionStatus::Failed { tolerated: false }
                && self.config.fail_on_first_error();
            report.results.push(result);
            if stop {
                warn!(action = %action.label(), "action failed, skipping remaining actions");
                report.aborted = true;
                break;
            }
        }

        Ok(report)
    }

    fn run_action(&self, action: &Action, ctx: &HookContext<'_>) -> ActionResult {
        let command = command::expand(action.action(), ctx);
        debug!(action = %action.label(), %command, "running action");

        let outcome = self
            .executor
            .execute(action, &command, ctx)
            .unwrap_or_else(|e| ActionOutcome::failure(e.to_string()));

        let status = if outcome.success {
            ActionStatus::Succeeded
        } else {
            let tolerated = self.config.allow_failure() || action.is_failure_allowed();
            if tolerated {
                warn!(action = %action.label(), "action failed, failure is allowed");
            }
            ActionStatus::Failed { tolerated }
        };

        ActionResult {
            label: action.label().to_string(),
            command,
            status,
            output: outcome.output,
        }
    }
}

/// Builder for [`HookRunner`]
pub struct HookRunnerBuilder<'a, E> {
    config: &'a Configuration,
    repository: &'a dyn RepositoryInspector,
    conditions: Option<ConditionRegistry>,
    executor: E,
    reporter: Option<&'a dyn Reporter>,
    working_dir: Option<PathBuf>,
}

impl<'a, E> HookRunnerBuilder<'a, E>
where
    E: ActionExecutor,
{
    /// Use a custom action executor
    #[must_use]
    pub fn executor<E2: ActionExecutor>(self, executor: E2) -> HookRunnerBuilder<'a, E2> {
        HookRunnerBuilder {
            config: self.config,
            repository: self.repository,
            conditions: self.conditions,
            executor,
            reporter: self.reporter,
            working_dir: self.working_dir,
        }
    }

    /// Use a custom condition registry instead of the built-ins
    #[must_use]
    pub fn conditions(mut self, registry: ConditionRegistry) -> Self {
        self.conditions = Some(registry);
        self
    }

    /// Receive progress while actions run
    #[must_use]
    pub fn reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Run commands in `dir` instead of the configuration's directory
    #[must_use]
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Build the runner
    pub fn build(self) -> HookRunner<'a, E> {
        HookRunner {
            config: self.config,
            repository: self.repository,
            conditions: self
                .conditions
                .unwrap_or_else(ConditionRegistry::with_builtins),
            executor: self.executor,
            reporter: self.reporter,
            working_dir: self.working_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use bosun_config::ConfigLoader;
    use bosun_core::DetachedRepository;
    use serde_json::{Value, json};
    use std::cell::RefCell;
    use std::path::Path;

    fn load(document: &Value) -> Configuration {
        ConfigLoader::new()
            .load_str(
                Path::new("/repo/bosun.json"),
                &serde_json::to_string(document).unwrap(),
            )
            .unwrap()
    }

    /// Executor that records commands and fails those containing "fail"
    fn recording(log: &RefCell<Vec<String>>) -> impl ActionExecutor + '_ {
        move |_: &Action, command: &str, _: &HookContext<'_>| -> Result<ActionOutcome> {
            log.borrow_mut().push(command.to_string());
            if command.contains("fail") {
                Ok(ActionOutcome::failure("boom"))
            } else {
                Ok(ActionOutcome::success("ok"))
            }
        }
    }

    #[test]
    fn test_disabled_hook_runs_nothing() {
        let config = load(&json!({"pre-commit": {"enabled": false, "actions": [{"action": "a"}]}}));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("pre-commit", &[]).unwrap();

        assert!(!report.enabled);
        assert!(log.borrow().is_empty());
        assert!(report.ensure_success().is_ok());
    }

    #[test]
    fn test_actions_run_in_order_with_placeholders() {
        let config = load(&json!({
            "config": {"custom": {"target": "release"}},
            "commit-msg": {"enabled": true, "actions": [
                {"action": "lint {$ARG|value-of:file}"},
                {"action": "build {$CONFIG|value-of:custom>>target}"}
            ]}
        }));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner
            .run("commit-msg", &[".git/COMMIT_EDITMSG".to_string()])
            .unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["lint .git/COMMIT_EDITMSG", "build release"]
        );
        assert!(report.is_success());
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_fail_on_first_error_stops_run() {
        let config = load(&json!({"pre-push": {"enabled": true, "actions": [
            {"action": "one"}, {"action": "fail two"}, {"action": "three"}
        ]}}));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("pre-push", &[]).unwrap();

        assert_eq!(*log.borrow(), vec!["one", "fail two"]);
        assert!(report.aborted);
        let err = report.ensure_success().unwrap_err();
        assert!(matches!(err, Error::HookFailed { failed: 1, total: 3, .. }));
    }

    #[test]
    fn test_without_fail_on_first_error_all_actions_run() {
        let config = load(&json!({
            "config": {"fail-on-first-error": false},
            "pre-push": {"enabled": true, "actions": [
                {"action": "fail one"}, {"action": "two"}, {"action": "fail three"}
            ]}
        }));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("pre-push", &[]).unwrap();

        assert_eq!(log.borrow().len(), 3);
        assert!(!report.aborted);
        assert_eq!(report.failed_count(), 2);
    }

    #[test]
    fn test_allowed_failures_are_tolerated() {
        let config = load(&json!({"pre-commit": {"enabled": true, "actions": [
            {"action": "fail lint", "config": {"allow-failure": true}},
            {"action": "test"}
        ]}}));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("pre-commit", &[]).unwrap();

        assert_eq!(log.borrow().len(), 2);
        assert_eq!(
            report.results[0].status,
            ActionStatus::Failed { tolerated: true }
        );
        assert!(report.ensure_success().is_ok());
    }

    #[test]
    fn test_global_allow_failure() {
        let config = load(&json!({
            "config": {"allow-failure": true},
            "pre-commit": {"enabled": true, "actions": [{"action": "fail"}, {"action": "next"}]}
        }));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("pre-commit", &[]).unwrap();

        assert_eq!(log.borrow().len(), 2);
        assert!(report.is_success());
    }

    #[test]
    fn test_conditions_skip_actions() {
        let config = load(&json!({
            "config": {"custom": {"deploy": false}},
            "post-commit": {"enabled": true, "actions": [
                {"action": "deploy", "conditions": [
                    {"exec": "config.custom-value-is-truthy", "args": {"value": "deploy"}}
                ]},
                {"action": "notify"}
            ]}
        }));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("post-commit", &[]).unwrap();

        assert_eq!(*log.borrow(), vec!["notify"]);
        assert_eq!(report.results[0].status, ActionStatus::Skipped);
    }

    #[test]
    fn test_unknown_condition_is_fatal() {
        let config = load(&json!({"pre-commit": {"enabled": true, "actions": [
            {"action": "a", "conditions": [{"exec": "nope.never"}]}
        ]}}));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let err = runner.run("pre-commit", &[]).unwrap_err();

        assert!(matches!(err, Error::UnresolvedCondition { .. }));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_virtual_hook_actions_are_appended() {
        let config = load(&json!({
            "post-checkout": {"enabled": false, "actions": [{"action": "checkout"}]},
            "post-change": {"enabled": true, "actions": [{"action": "change"}]}
        }));
        let log = RefCell::new(Vec::new());
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .build();

        let report = runner.run("post-checkout", &[]).unwrap();

        assert!(report.enabled);
        assert_eq!(*log.borrow(), vec!["checkout", "change"]);
    }

    #[test]
    fn test_invalid_hook_name() {
        let config = load(&json!({}));
        let runner = HookRunner::new(&config, &DetachedRepository);

        let err = runner.run("pre-kaboom", &[]).unwrap_err();

        assert!(matches!(err, Error::InvalidHookName { .. }));
    }

    #[test]
    fn test_reporter_receives_results() {
        struct Collect(RefCell<Vec<String>>);
        impl Reporter for Collect {
            fn action_finished(&self, result: &ActionResult) {
                self.0.borrow_mut().push(result.label.clone());
            }
        }

        let config = load(&json!({"pre-commit": {"enabled": true, "actions": [
            {"action": "a", "config": {"label": "First"}}, {"action": "b"}
        ]}}));
        let log = RefCell::new(Vec::new());
        let collect = Collect(RefCell::new(Vec::new()));
        let runner = HookRunner::builder(&config, &DetachedRepository)
            .executor(recording(&log))
            .reporter(&collect)
            .build();

        runner.run("pre-commit", &[]).unwrap();

        assert_eq!(*collect.0.borrow(), vec!["First", "b"]);
    }
}
