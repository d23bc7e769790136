//! Layered command classification: absolute deny, confirm-required, and
//! conditional filters, evaluated in strict precedence order.

mod predicate;
mod table;

pub use predicate::{ExecutionContext, Predicate};

use crate::config::PolicyConfig;
use std::collections::HashSet;

/// One conditional filter: a base command, an optional required
/// subcommand, a predicate over the argument tail, and the rationale
/// shown when it fires.
#[derive(Debug, Clone)]
pub struct ConditionalFilter {
    pub command: String,
    pub subcommand: Option<String>,
    pub predicate: Predicate,
    pub rationale: String,
}

/// The classifier's pure output for one tokenized command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The base command is strictly prohibited.
    Denied { command: String },
    /// One or more rationales require a single approval before execution.
    NeedsConfirmation { rationales: Vec<String> },
    /// No rule matched; unknown commands run without a prompt.
    Allowed,
}

/// The immutable rule set. Built once at startup from the built-in lists
/// plus config extensions, then shared by reference; never mutated.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    deny: HashSet<String>,
    confirm: HashSet<String>,
    filters: Vec<ConditionalFilter>,
}

impl PolicyTable {
    /// The built-in table with no config extensions.
    pub fn builtin() -> Self {
        Self::from_config(&PolicyConfig::default())
    }

    /// Build the table: built-in lists merged with config additions.
    pub fn from_config(policy: &PolicyConfig) -> Self {
        let deny = table::DENY_COMMANDS
            .iter()
            .map(|s| (*s).to_string())
            .chain(policy.deny_commands.iter().cloned())
            .collect();
        let confirm = table::CONFIRM_COMMANDS
            .iter()
            .map(|s| (*s).to_string())
            .chain(policy.confirm_commands.iter().cloned())
            .collect();

        Self {
            deny,
            confirm,
            filters: table::builtin_filters(),
        }
    }

    /// Exact-equality membership test against the deny list.
    pub fn is_denied(&self, command: &str) -> bool {
        self.deny.contains(command)
    }

    /// Exact-equality membership test against the confirm list.
    pub fn requires_confirmation(&self, command: &str) -> bool {
        self.confirm.contains(command)
    }

    /// Classify a tokenized command.
    ///
    /// Precedence: deny short-circuits everything; otherwise the
    /// confirm-tier rationale and every satisfied conditional filter's
    /// rationale are collected, and an empty collection means `Allowed`.
    pub fn classify(&self, tokens: &[String], ctx: &ExecutionContext) -> Verdict {
        let Some(base) = tokens.first() else {
            return Verdict::Allowed;
        };

        if self.is_denied(base) {
            return Verdict::Denied {
                command: base.clone(),
            };
        }

        let args = &tokens[1..];
        let mut rationales = Vec::new();

        if self.requires_confirmation(base) {
            rationales.push(format!("The command '{base}' may pose risks."));
        }

        for filter in &self.filters {
            if filter.command != *base {
                continue;
            }
            if let (Some(required), Some(first)) = (&filter.subcommand, args.first()) {
                if first != required {
                    continue;
                }
            }
            if filter.predicate.eval(args, ctx) {
                rationales.push(filter.rationale.clone());
            }
        }

        if rationales.is_empty() {
            Verdict::Allowed
        } else {
            Verdict::NeedsConfirmation { rationales }
        }
    }

    /// Deny-list entries, sorted for display.
    pub fn deny_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.deny.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Confirm-list entries, sorted for display.
    pub fn confirm_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.confirm.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// The conditional filter set, in evaluation order.
    pub fn filters(&self) -> &[ConditionalFilter] {
        &self.filters
    }
}
