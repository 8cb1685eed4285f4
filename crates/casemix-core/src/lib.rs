//! Core types for the Casemix verifier.
//!
//! Holds the claim table model, the rule set, the numeric coercion helper,
//! error types, CLI settings and display formatting shared by the data,
//! runtime and UI crates.

pub mod coercion;
pub mod error;
pub mod formatting;
pub mod models;
pub mod rules;
pub mod settings;

pub use error::{CasemixError, Result};
