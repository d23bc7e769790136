//! Confirmation gating: turn a `Verdict` plus a caller-supplied decision
//! into a terminal outcome, consulting an approval channel when needed.
//!
//! Verdict computation is pure; everything that may block on a human
//! lives behind the [`ApprovalChannel`] capability so the policy stays
//! testable without any I/O.

use crate::policy::Verdict;
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// Caller-supplied confirmation state, fixed once per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationDecision {
    /// No decision attached; the gate must ask the approval channel.
    Unset,
    Approved,
    Rejected,
}

impl ConfirmationDecision {
    /// Map the wire-level optional boolean onto the tri-state.
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            None => ConfirmationDecision::Unset,
            Some(true) => ConfirmationDecision::Approved,
            Some(false) => ConfirmationDecision::Rejected,
        }
    }
}

/// Terminal result of gating one verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Execution may proceed.
    Proceed,
    /// The deny tier matched; no confirmation path exists.
    Blocked { command: String },
    /// The caller (or the human behind the channel) declined.
    Cancelled,
    /// The channel cannot block and no decision was supplied; the caller
    /// must resubmit with one attached.
    ConfirmationRequired { rationale: String },
}

/// The capability that turns a confirmation requirement into a decision.
///
/// Implementations either block until a human answers or, for surfaces
/// that cannot block, return [`ConfirmationDecision::Unset`] so the gate
/// reports a confirmation-required error instead.
pub trait ApprovalChannel: Send + Sync {
    fn solicit(&self, rationale: &str) -> ConfirmationDecision;
}

/// Resolve a verdict against the supplied decision and channel.
///
/// Pure in its inputs: the same verdict with the same supplied decision
/// always produces the same outcome, and the channel is only consulted
/// when the decision is `Unset`.
pub fn gate(
    verdict: &Verdict,
    decision: ConfirmationDecision,
    channel: &dyn ApprovalChannel,
) -> GateOutcome {
    match verdict {
        Verdict::Denied { command } => GateOutcome::Blocked {
            command: command.clone(),
        },
        Verdict::Allowed => GateOutcome::Proceed,
        Verdict::NeedsConfirmation { rationales } => {
            let rationale = rationales.join(" ");
            let resolved = match decision {
                ConfirmationDecision::Unset => channel.solicit(&rationale),
                supplied => supplied,
            };
            match resolved {
                ConfirmationDecision::Approved => GateOutcome::Proceed,
                ConfirmationDecision::Rejected => GateOutcome::Cancelled,
                ConfirmationDecision::Unset => GateOutcome::ConfirmationRequired { rationale },
            }
        }
    }
}

// ── Channels ─────────────────────────────────────────────────────

/// Blocking terminal prompt: prints the rationale on stderr and loops
/// until a recognized yes/no response. No timeout; the human is the
/// bound. EOF counts as a rejection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalApproval;

impl ApprovalChannel for TerminalApproval {
    fn solicit(&self, rationale: &str) -> ConfirmationDecision {
        let stdin = io::stdin();
        eprintln!();
        eprintln!("⚠️  {rationale}");
        loop {
            eprint!("   Proceed? (y/n): ");
            let _ = io::stderr().flush();

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => return ConfirmationDecision::Rejected,
                Ok(_) => {}
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" | "yes" => return ConfirmationDecision::Approved,
                "n" | "no" => return ConfirmationDecision::Rejected,
                _ => eprintln!("   Please respond with 'y' or 'n'."),
            }
        }
    }
}

/// Channel for surfaces that cannot block on a human. Always leaves the
/// decision unset, which the gate surfaces as `ConfirmationRequired`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl ApprovalChannel for NonInteractive {
    fn solicit(&self, _rationale: &str) -> ConfirmationDecision {
        ConfirmationDecision::Unset
    }
}
