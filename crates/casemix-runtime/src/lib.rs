//! Runtime layer for the Casemix verifier.
//!
//! Owns the per-user [`session::Session`]: the loaded claim table, the rule
//! set and the cached verification result.

pub mod session;

pub use casemix_core as core;
pub use casemix_data as data;
