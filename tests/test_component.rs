//! Component tests: classifier and gate behavior across module
//! boundaries, without spawning any processes.

use warden::approval::{gate, ApprovalChannel, ConfirmationDecision, GateOutcome};
use warden::config::{Config, PolicyConfig};
use warden::policy::{ExecutionContext, PolicyTable, Verdict};

fn tokens(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Context with nothing satisfied: no isolation, empty directory.
fn bare_ctx() -> ExecutionContext {
    let policy = PolicyConfig::default();
    ExecutionContext {
        isolated_runtime: false,
        cwd_entries: Vec::new(),
        project_markers: policy.project_markers,
        trusted_hosts: policy.trusted_hosts,
        allowed_remotes: policy.allowed_remotes,
    }
}

struct AlwaysAnswer(ConfirmationDecision);

impl ApprovalChannel for AlwaysAnswer {
    fn solicit(&self, _rationale: &str) -> ConfirmationDecision {
        self.0
    }
}

// ── Deny tier dominates everything ──────────────────────────────

#[test]
fn deny_set_members_are_denied_for_any_arguments() {
    let table = PolicyTable::builtin();
    for command in ["rm", "sudo", "dd", "iptables", "history"] {
        for extra in [&[][..], &["-rf", "/tmp/x"][..], &["--help"][..]] {
            let mut line = vec![command.to_string()];
            line.extend(extra.iter().map(|s| (*s).to_string()));
            assert_eq!(
                table.classify(&line, &bare_ctx()),
                Verdict::Denied {
                    command: command.into()
                },
                "deny must not depend on arguments: {command} {extra:?}"
            );
        }
    }
}

#[test]
fn denied_verdict_cannot_be_approved_through_the_gate() {
    let table = PolicyTable::builtin();
    let verdict = table.classify(&tokens(&["rm", "-rf", "/tmp/x"]), &bare_ctx());

    for decision in [
        ConfirmationDecision::Unset,
        ConfirmationDecision::Approved,
        ConfirmationDecision::Rejected,
    ] {
        assert_eq!(
            gate(&verdict, decision, &AlwaysAnswer(ConfirmationDecision::Approved)),
            GateOutcome::Blocked {
                command: "rm".into()
            }
        );
    }
}

#[test]
fn name_in_both_deny_and_confirm_sets_is_denied() {
    let mut policy = PolicyConfig::default();
    // `curl` is already confirm-tier; adding it to deny makes the
    // contradiction explicit, and deny must win.
    policy.deny_commands.push("curl".into());
    let table = PolicyTable::from_config(&policy);

    assert_eq!(
        table.classify(&tokens(&["curl", "https://example.com"]), &bare_ctx()),
        Verdict::Denied {
            command: "curl".into()
        }
    );
}

// ── Fail-open default for unknown commands ──────────────────────

#[test]
fn commands_outside_every_list_are_allowed() {
    let table = PolicyTable::builtin();
    for line in [
        vec!["echo", "hello"],
        vec!["cargo", "build", "--release"],
        vec!["python3", "script.py"],
        vec!["whoami"],
    ] {
        assert_eq!(
            table.classify(&tokens(&line), &bare_ctx()),
            Verdict::Allowed,
            "unmatched command should be allowed: {line:?}"
        );
    }
}

// ── Conditional filter scoping ──────────────────────────────────

#[test]
fn filters_never_fire_on_unrelated_base_commands() {
    let table = PolicyTable::builtin();
    // The tail would satisfy the container predicate, but no filter
    // targets `make`.
    assert_eq!(
        table.classify(&tokens(&["make", "run"]), &bare_ctx()),
        Verdict::Allowed
    );
}

#[test]
fn subcommand_mismatch_skips_the_filter() {
    let table = PolicyTable::builtin();
    // pip download: confirm tier applies, the install filter does not.
    let verdict = table.classify(&tokens(&["pip", "download", "requests"]), &bare_ctx());
    match verdict {
        Verdict::NeedsConfirmation { rationales } => {
            assert_eq!(rationales.len(), 1);
            assert!(rationales[0].contains("pip"));
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }
}

#[test]
fn satisfied_filter_rationale_joins_the_confirm_tier() {
    let table = PolicyTable::builtin();
    let verdict = table.classify(
        &tokens(&["pip", "install", "--trusted-host", "pypi.org", "requests"]),
        &bare_ctx(),
    );
    match verdict {
        Verdict::NeedsConfirmation { rationales } => {
            assert_eq!(rationales.len(), 2);
            assert!(rationales.iter().any(|r| r.contains("trusted sources")));
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }
}

#[test]
fn unsatisfied_filter_still_leaves_confirm_tier_in_force() {
    // Untrusted ssh host: the filter adds nothing, but the confirm tier
    // alone still demands approval.
    let table = PolicyTable::builtin();
    let verdict = table.classify(&tokens(&["ssh", "deploy@unknown-host.example"]), &bare_ctx());
    match verdict {
        Verdict::NeedsConfirmation { rationales } => {
            assert_eq!(rationales.len(), 1);
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }
}

#[test]
fn isolated_runtime_flips_the_pip_filter() {
    let table = PolicyTable::builtin();
    let mut ctx = bare_ctx();
    ctx.isolated_runtime = true;

    let verdict = table.classify(&tokens(&["pip", "install", "requests"]), &ctx);
    match verdict {
        Verdict::NeedsConfirmation { rationales } => {
            assert_eq!(rationales.len(), 2, "isolation satisfies the install filter");
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }
}

// ── Gate behavior over classified verdicts ──────────────────────

#[test]
fn blocking_channel_rejection_cancels_a_confirm_tier_command() {
    let table = PolicyTable::builtin();
    let verdict = table.classify(&tokens(&["curl", "https://example.com"]), &bare_ctx());

    let outcome = gate(
        &verdict,
        ConfirmationDecision::Unset,
        &AlwaysAnswer(ConfirmationDecision::Rejected),
    );
    assert_eq!(outcome, GateOutcome::Cancelled);
}

#[test]
fn approval_covers_every_rationale_of_one_submission() {
    let table = PolicyTable::builtin();
    let verdict = table.classify(
        &tokens(&["pip", "install", "--trusted-host", "pypi.org", "requests"]),
        &bare_ctx(),
    );

    let outcome = gate(&verdict, ConfirmationDecision::Approved, &AlwaysAnswer(ConfirmationDecision::Rejected));
    assert_eq!(outcome, GateOutcome::Proceed);
}

#[test]
fn gate_outcomes_are_stable_across_repeated_evaluation() {
    let table = PolicyTable::builtin();
    let verdict = table.classify(&tokens(&["docker", "run", "nginx"]), &bare_ctx());

    let first = gate(&verdict, ConfirmationDecision::Approved, &AlwaysAnswer(ConfirmationDecision::Rejected));
    for _ in 0..5 {
        assert_eq!(
            gate(&verdict, ConfirmationDecision::Approved, &AlwaysAnswer(ConfirmationDecision::Rejected)),
            first
        );
    }
}

// ── Config-extended tables ──────────────────────────────────────

#[test]
fn config_extensions_participate_in_classification() {
    let mut config = Config::default();
    config.policy.confirm_commands.push("terraform".into());
    let table = PolicyTable::from_config(&config.policy);

    match table.classify(&tokens(&["terraform", "apply"]), &bare_ctx()) {
        Verdict::NeedsConfirmation { rationales } => {
            assert!(rationales[0].contains("terraform"));
        }
        other => panic!("expected NeedsConfirmation, got {other:?}"),
    }
}
