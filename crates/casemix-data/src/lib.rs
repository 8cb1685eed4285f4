//! Claim data pipeline for the Casemix verifier.
//!
//! Loads tab-delimited E-Klaim exports, derives the INA-CBG code parts and
//! tariff delta, applies verification rules, aggregates dashboard metrics
//! and writes annotated results back out.

pub mod aggregator;
pub mod deriver;
pub mod reader;
pub mod verifier;
pub mod writer;

pub use casemix_core as core;
