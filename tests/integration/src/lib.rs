//! Integration tests across the kinship crates
//!
//! This test suite validates:
//! - Per-sender time proofs and their sequences
//! - Co-signed births through the full admission path
//! - Rejection taxonomy for forged, malformed and misordered input
//! - Append-only behavior of the message graph

pub mod test_utils;

#[cfg(test)]
mod birth_scenarios;

#[cfg(test)]
mod message_scenarios;

#[cfg(test)]
mod time_proof_scenarios;
