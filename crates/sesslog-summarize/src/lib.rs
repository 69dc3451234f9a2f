//! Summary generation with graceful degradation.
//!
//! Tiers are tried in order: remote API, external CLI tool, then a
//! deterministic local summary. The chain always yields text.

mod chain;
mod command;
mod local;
mod prompt;
mod provider;
mod remote;

pub use chain::{GeneratedSummary, SummaryGenerator, Tier};
pub use command::CommandProvider;
pub use provider::{GenerateError, SummaryProvider};
pub use remote::RemoteProvider;
