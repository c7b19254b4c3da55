//! Subcommand implementations.

pub mod canonicalize;
pub mod fingerprint;
pub mod summarize;
