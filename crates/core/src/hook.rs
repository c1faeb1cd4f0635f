//! Recognized hook names
//!
//! bosun knows a fixed set of git hooks plus "virtual" hooks. A virtual hook
//! is never triggered by git directly; several real hooks trigger it so that
//! shared actions can be configured once.
//!
//! | Real hook       | Virtual hook  |
//! |-----------------|---------------|
//! | `post-checkout` | `post-change` |
//! | `post-merge`    | `post-change` |
//! | `post-rewrite`  | `post-change` |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recognized hook name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hook {
    /// `commit-msg`
    CommitMsg,
    /// `pre-push`
    PrePush,
    /// `pre-commit`
    PreCommit,
    /// `prepare-commit-msg`
    PrepareCommitMsg,
    /// `post-commit`
    PostCommit,
    /// `post-merge`
    PostMerge,
    /// `post-checkout`
    PostCheckout,
    /// `post-rewrite`
    PostRewrite,
    /// `post-change` (virtual)
    PostChange,
}

/// Real hook → virtual hook it triggers
const VIRTUAL_TRIGGERS: &[(Hook, Hook)] = &[
    (Hook::PostCheckout, Hook::PostChange),
    (Hook::PostMerge, Hook::PostChange),
    (Hook::PostRewrite, Hook::PostChange),
];

impl Hook {
    /// Number of recognized hooks
    pub const COUNT: usize = 9;

    /// Every recognized hook, real hooks first, in document order
    pub const ALL: [Hook; Self::COUNT] = [
        Hook::CommitMsg,
        Hook::PrePush,
        Hook::PreCommit,
        Hook::PrepareCommitMsg,
        Hook::PostCommit,
        Hook::PostMerge,
        Hook::PostCheckout,
        Hook::PostRewrite,
        Hook::PostChange,
    ];

    /// The name git (and the configuration document) uses for this hook
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Hook::CommitMsg => "commit-msg",
            Hook::PrePush => "pre-push",
            Hook::PreCommit => "pre-commit",
            Hook::PrepareCommitMsg => "prepare-commit-msg",
            Hook::PostCommit => "post-commit",
            Hook::PostMerge => "post-merge",
            Hook::PostCheckout => "post-checkout",
            Hook::PostRewrite => "post-rewrite",
            Hook::PostChange => "post-change",
        }
    }

    /// Whether this is a virtual hook that git never calls directly
    #[must_use]
    pub fn is_virtual(self) -> bool {
        VIRTUAL_TRIGGERS.iter().any(|(_, virt)| *virt == self)
    }

    /// The virtual hook triggered by this hook, if any
    #[must_use]
    pub fn virtual_hook(self) -> Option<Hook> {
        VIRTUAL_TRIGGERS
            .iter()
            .find(|(real, _)| *real == self)
            .map(|(_, virt)| *virt)
    }

    /// Whether this hook triggers a virtual hook
    #[must_use]
    pub fn triggers_virtual_hook(self) -> bool {
        self.virtual_hook().is_some()
    }

    /// Real hooks that trigger this virtual hook (empty for real hooks)
    pub fn triggered_by(self) -> impl Iterator<Item = Hook> {
        VIRTUAL_TRIGGERS
            .iter()
            .filter(move |(_, virt)| *virt == self)
            .map(|(real, _)| *real)
    }

    /// Hooks git can call, i.e. everything except virtual hooks
    pub fn native() -> impl Iterator<Item = Hook> {
        Self::ALL.into_iter().filter(|hook| !hook.is_virtual())
    }

    /// Names of the positional arguments git passes to this hook
    #[must_use]
    pub const fn arg_names(self) -> &'static [&'static str] {
        match self {
            Hook::CommitMsg => &["file"],
            Hook::PrepareCommitMsg => &["file", "mode", "hash"],
            Hook::PrePush => &["target", "url"],
            Hook::PostCheckout => &["previous-head", "new-head", "mode"],
            Hook::PostMerge => &["squash"],
            Hook::PostRewrite => &["git-command"],
            Hook::PreCommit | Hook::PostCommit | Hook::PostChange => &[],
        }
    }

    /// Check whether a name is a recognized hook
    #[must_use]
    pub fn is_valid(name: &str) -> bool {
        name.parse::<Hook>().is_ok()
    }
}

impl FromStr for Hook {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.as_str() == name)
            .ok_or_else(|| Error::invalid_hook_name(name))
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
