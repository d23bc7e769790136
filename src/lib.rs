#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

pub mod approval;
pub mod cli;
pub mod config;
pub mod engine;
pub mod exec;
pub mod gateway;
pub mod policy;

pub use approval::{ApprovalChannel, ConfirmationDecision, GateOutcome};
pub use config::Config;
pub use engine::Engine;
pub use exec::ExecutionOutcome;
pub use policy::{PolicyTable, Verdict};
