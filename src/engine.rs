//! The submission pipeline: tokenize → classify → gate → execute.
//!
//! One `Engine` serves every surface. It is stateless across calls;
//! concurrent submissions share only the immutable policy table, so no
//! coordination is needed and no request can observe another's in-flight
//! confirmation.

use crate::approval::{gate, ApprovalChannel, ConfirmationDecision, GateOutcome};
use crate::config::{Config, PolicyConfig};
use crate::exec::{ExecutionOutcome, Executor};
use crate::policy::{ExecutionContext, PolicyTable};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// A submission that never reached classification.
#[derive(Debug, Error)]
pub enum CommandParseError {
    #[error("no command provided")]
    Empty,
    #[error("unparseable command: {0}")]
    Tokenize(#[from] shell_words::ParseError),
}

/// Split a raw command line into shell words.
///
/// Quote-aware splitting only — operators, expansions, and redirections
/// are not interpreted, they stay literal tokens.
pub fn tokenize(raw: &str) -> Result<Vec<String>, CommandParseError> {
    let tokens = shell_words::split(raw)?;
    if tokens.is_empty() {
        return Err(CommandParseError::Empty);
    }
    Ok(tokens)
}

/// Policy evaluation plus execution for one command submission at a time.
#[derive(Debug, Clone)]
pub struct Engine {
    table: Arc<PolicyTable>,
    executor: Executor,
    policy: PolicyConfig,
}

impl Engine {
    pub fn from_config(config: &Config) -> Self {
        Self {
            table: Arc::new(PolicyTable::from_config(&config.policy)),
            executor: Executor::new(config.policy.env_passthrough.clone()),
            policy: config.policy.clone(),
        }
    }

    pub fn table(&self) -> &PolicyTable {
        &self.table
    }

    /// Submit one raw command line through the full pipeline.
    ///
    /// The supplied decision is consumed by this submission only; the
    /// channel is consulted solely when the decision is unset and the
    /// verdict requires confirmation.
    pub async fn submit(
        &self,
        raw: &str,
        decision: ConfirmationDecision,
        channel: &dyn ApprovalChannel,
    ) -> ExecutionOutcome {
        let tokens = match tokenize(raw) {
            Ok(tokens) => tokens,
            Err(e) => {
                return ExecutionOutcome::InternalError {
                    detail: e.to_string(),
                }
            }
        };

        let ctx = ExecutionContext::capture(&self.policy);
        let verdict = self.table.classify(&tokens, &ctx);
        debug!(command = %tokens[0], ?verdict, "classified submission");

        match gate(&verdict, decision, channel) {
            GateOutcome::Proceed => self.executor.run(&tokens).await,
            GateOutcome::Blocked { command } => {
                warn!(%command, "submission blocked by deny list");
                ExecutionOutcome::Blocked { command }
            }
            GateOutcome::Cancelled => ExecutionOutcome::Cancelled,
            GateOutcome::ConfirmationRequired { rationale } => {
                ExecutionOutcome::ConfirmationRequired { rationale }
            }
        }
    }
}
