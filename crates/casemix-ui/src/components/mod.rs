//! Reusable line-level building blocks shared by the views.

pub mod frequency_bar;
pub mod header;
