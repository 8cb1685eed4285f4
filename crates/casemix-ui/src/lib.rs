//! Terminal UI layer for the Casemix verifier.
//!
//! Provides themes, the header and frequency-chart components, the dashboard,
//! verification-table and rules views, and the [`app::App`] event loop built
//! on [`ratatui`].

pub mod app;
pub mod components;
pub mod rules_view;
pub mod summary_view;
pub mod table_view;
pub mod themes;

pub use casemix_core as core;
