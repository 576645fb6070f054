//! The core module of the classifier.
//!
//! This module contains the fundamental components, including:
//! - Configuration management
//! - Constants shared by preprocessing and post-processing
//! - Error handling
//! - The inference runtime seam and its ONNX Runtime adapter
//!
//! It also provides re-exports of commonly used types for convenience.

pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;

pub use config::{ClassifierConfig, ConfigError, ConfigValidator, OrtSessionConfig};
pub use constants::*;
pub use errors::{ClassifierError, ClassifierResult, LoadStage, ProcessingStage};
pub use inference::{ForwardOptions, InferenceRuntime, OrtRuntime};

/// A one-dimensional tensor of `f32` values (raw class scores).
pub type Tensor1D = ndarray::Array1<f32>;

/// A four-dimensional `f32` tensor in `[batch, channels, height, width]` layout.
pub type Tensor4D = ndarray::Array4<f32>;

/// Initializes the tracing subscriber for logging.
///
/// This function sets up the tracing subscriber with environment filter and formatting layer.
/// It's typically called at the start of an application to enable logging.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();
}
