//! Utility functions shared across the crate.

pub mod labels;

pub use crate::core::init_tracing;
pub use labels::LabelTable;
