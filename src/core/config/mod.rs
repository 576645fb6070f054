//! Configuration management for the classifier.
//!
//! This module provides configuration types, validation traits, and utilities
//! for loading classifier and ONNX Runtime settings.

pub mod classifier;
pub mod errors;
pub mod onnx;

pub use classifier::ClassifierConfig;
pub use errors::{ConfigError, ConfigValidator};
pub use onnx::*;
