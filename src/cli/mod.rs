//! Interactive terminal surface.
//!
//! Reads command lines until an exit sentinel, submits each one through
//! the engine with the blocking terminal approval channel, and prints
//! the outcome.

use crate::approval::{ConfirmationDecision, TerminalApproval};
use crate::config::Config;
use crate::engine::Engine;
use crate::exec::ExecutionOutcome;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive shell until `exit`/`quit` or EOF.
pub async fn run_shell(config: Config) -> Result<()> {
    let engine = Engine::from_config(&config);
    let channel = TerminalApproval;

    println!("=== warden — command authorization shell ===");
    println!("Type 'exit' to quit.");

    let stdin = io::stdin();
    loop {
        print!("warden> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            break;
        }

        let outcome = engine
            .submit(input, ConfirmationDecision::Unset, &channel)
            .await;
        print_outcome(&outcome);
    }

    println!("Exiting.");
    Ok(())
}

/// Submit a single command line and print the outcome. Returns `true`
/// when the command ran and succeeded.
pub async fn run_once(config: Config, command: &str, decision: ConfirmationDecision) -> bool {
    let engine = Engine::from_config(&config);
    let outcome = engine.submit(command, decision, &TerminalApproval).await;
    print_outcome(&outcome);
    matches!(outcome, ExecutionOutcome::Success { .. })
}

/// Print the active policy table.
pub fn print_policy(config: &Config) {
    let table = crate::policy::PolicyTable::from_config(&config.policy);

    println!("{}", style("Denied commands").red().bold());
    for name in table.deny_commands() {
        println!("  {name}");
    }

    println!();
    println!("{}", style("Confirm-required commands").yellow().bold());
    for name in table.confirm_commands() {
        println!("  {name}");
    }

    println!();
    println!("{}", style("Conditional filters").cyan().bold());
    for filter in table.filters() {
        let scope = match &filter.subcommand {
            Some(sub) => format!("{} {sub}", filter.command),
            None => filter.command.clone(),
        };
        println!("  {scope}: {}", filter.rationale);
    }
}

fn print_outcome(outcome: &ExecutionOutcome) {
    let glyph = match outcome {
        ExecutionOutcome::Success { .. } => style("✅").green(),
        ExecutionOutcome::Cancelled => style("⏸️").yellow(),
        _ => style("❌").red(),
    };
    println!("{glyph} {}", outcome.message());
}
