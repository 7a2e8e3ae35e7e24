//! Path resolution policy.
//!
//! A policy decides, for one raw module specifier found in one emitted file,
//! what the specifier should become. Resolution is a fixed-precedence chain
//! of stages — alias rules, then the custom callback, then project-relative
//! rewriting — composed first-match-wins: the first stage that produces a
//! path ends the chain, later stages never run.
//!
//! `resolve` is total and pure: it never fails, performs no I/O, and returns
//! the same outcome for the same `(raw_path, origin_file)` within one run.
//! The only fallible step is policy construction, where alias patterns are
//! compiled once.

mod paths;

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Custom rewrite callback: `(raw_path, origin_file) -> Option<new_path>`.
///
/// Must be deterministic for a given input pair; `None` or an empty string
/// falls through to the next stage.
pub type RewriteFn = dyn Fn(&str, &str) -> Option<String> + Send + Sync;

/// A pattern/replacement pair rewriting matching path substrings.
///
/// `pattern` is a regex, matched case-insensitively; `replacement` may use
/// `$n` capture references. Rules apply in configuration order and the first
/// matching rule wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRule {
    pub pattern: String,
    pub replacement: String,
}

impl AliasRule {
    pub fn new(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        AliasRule {
            pattern: pattern.into(),
            replacement: replacement.into(),
        }
    }
}

/// Rewrite policy configuration, as supplied by the external build layer.
///
/// Plain data; compile it into a [`RewritePolicy`] once per run with
/// [`RewriteConfig::compile`]. The custom callback is installed on the
/// compiled policy (`RewritePolicy::with_rewrite_fn`), not carried here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Absolute directory prefix stripped by the project-relative rule.
    pub project_base_dir: Option<String>,
    /// Namespace prepended by the project-relative rule.
    pub project_namespace: Option<String>,
    /// Ordered alias rules; first match wins.
    pub alias_rules: Vec<AliasRule>,
}

impl RewriteConfig {
    /// Compile alias patterns and freeze the configuration into a policy.
    ///
    /// Matchers are built here, once per run, so `resolve` never constructs
    /// a regex per call.
    pub fn compile(self) -> Result<RewritePolicy, PolicyError> {
        let mut aliases = Vec::with_capacity(self.alias_rules.len());
        for rule in self.alias_rules {
            let regex = RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .build()
                .map_err(|source| PolicyError::InvalidAliasPattern {
                    pattern: rule.pattern.clone(),
                    source,
                })?;
            aliases.push(CompiledAlias {
                regex,
                replacement: rule.replacement,
            });
        }
        Ok(RewritePolicy {
            base_dir: self.project_base_dir,
            namespace: self.project_namespace,
            aliases,
            rewrite_fn: None,
        })
    }
}

/// Error from policy compilation.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("invalid alias pattern `{pattern}`: {source}")]
    InvalidAliasPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Result of resolving one raw path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The path stays as written; the node is not touched.
    Unchanged,
    /// The path is replaced by the contained text.
    Rewritten(String),
}

impl RewriteOutcome {
    /// The new path text, if any.
    pub fn rewritten(&self) -> Option<&str> {
        match self {
            RewriteOutcome::Unchanged => None,
            RewriteOutcome::Rewritten(path) => Some(path),
        }
    }
}

/// One stage of the resolution chain.
///
/// A closed enum rather than a chain of conditionals: the precedence order
/// is the literal [`STAGES`] array, and reordering it is a one-line change
/// covered by the policy tests.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
enum Stage {
    /// Configured pattern → replacement rules, first match wins.
    Alias,
    /// Custom rewrite callback.
    Callback,
    /// Dot-relative path → namespaced project path.
    ProjectRelative,
}

/// Fixed stage precedence. Later stages never run once one matches.
const STAGES: [Stage; 3] = [Stage::Alias, Stage::Callback, Stage::ProjectRelative];

struct CompiledAlias {
    regex: Regex,
    replacement: String,
}

/// Compiled, immutable rewrite policy. Built once per run; read-only
/// thereafter. `Send + Sync`, so the surrounding system may process files
/// in parallel against one policy.
pub struct RewritePolicy {
    base_dir: Option<String>,
    namespace: Option<String>,
    aliases: Vec<CompiledAlias>,
    rewrite_fn: Option<Box<RewriteFn>>,
}

impl RewritePolicy {
    /// Install the custom rewrite callback (resolution stage 2).
    pub fn with_rewrite_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.rewrite_fn = Some(Box::new(f));
        self
    }

    /// Resolve one raw module specifier against this policy.
    ///
    /// Total: never fails. A stage that does not apply (empty alias set,
    /// absent callback, missing base directory or namespace, base directory
    /// not a prefix of the resolved path) simply falls through; if no stage
    /// produces a different path the outcome is `Unchanged`.
    pub fn resolve(&self, raw_path: &str, origin_file: &str) -> RewriteOutcome {
        for stage in STAGES {
            if let Some(new_path) = self.run_stage(stage, raw_path, origin_file) {
                trace!(?stage, raw_path, new_path = %new_path, "resolver stage matched");
                if new_path == raw_path {
                    return RewriteOutcome::Unchanged;
                }
                return RewriteOutcome::Rewritten(new_path);
            }
        }
        RewriteOutcome::Unchanged
    }

    fn run_stage(&self, stage: Stage, raw_path: &str, origin_file: &str) -> Option<String> {
        match stage {
            Stage::Alias => self.apply_alias(raw_path),
            Stage::Callback => self.apply_callback(raw_path, origin_file),
            Stage::ProjectRelative => self.apply_project_relative(raw_path, origin_file),
        }
    }

    /// Stage 1: first alias rule whose pattern matches substitutes every
    /// occurrence (case-insensitive) and ends the chain.
    fn apply_alias(&self, raw_path: &str) -> Option<String> {
        self.aliases
            .iter()
            .find(|alias| alias.regex.is_match(raw_path))
            .map(|alias| {
                alias
                    .regex
                    .replace_all(raw_path, alias.replacement.as_str())
                    .into_owned()
            })
    }

    /// Stage 2: custom callback; `None` or empty output falls through.
    fn apply_callback(&self, raw_path: &str, origin_file: &str) -> Option<String> {
        let rewrite = self.rewrite_fn.as_deref()?;
        rewrite(raw_path, origin_file).filter(|path| !path.is_empty())
    }

    /// Stage 3: dot-relative paths under the configured base directory are
    /// resolved lexically against the origin file's directory, the base
    /// prefix is stripped, and the namespace prepended. Requires BOTH the
    /// base directory and the namespace; absolute and bare specifiers are
    /// never touched.
    fn apply_project_relative(&self, raw_path: &str, origin_file: &str) -> Option<String> {
        if !raw_path.starts_with('.') {
            return None;
        }
        let base_dir = self.base_dir.as_deref()?;
        let namespace = self.namespace.as_deref()?;

        let absolute = paths::resolve_against(paths::parent_dir(origin_file), raw_path);
        let stripped = absolute.strip_prefix(base_dir)?;
        // The strip must land on a path boundary; `/proj` is not a prefix
        // of `/project2/x`.
        if !stripped.is_empty() && !stripped.starts_with('/') {
            return None;
        }
        Some(format!("{namespace}{stripped}"))
    }
}

impl fmt::Debug for RewritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewritePolicy")
            .field("base_dir", &self.base_dir)
            .field("namespace", &self.namespace)
            .field("aliases", &self.aliases.len())
            .field("rewrite_fn", &self.rewrite_fn.is_some())
            .finish()
    }
}
