//! The inference runtime seam and its ONNX Runtime adapter.
//!
//! [`InferenceRuntime`] is the only place engine-specific behavior lives; the
//! classifier talks to it through `load_topology`, `load_weights` and
//! `run_forward`. [`OrtRuntime`] implements it on top of `ort`.

pub mod ort_runtime;
pub mod runtime;

pub use ort_runtime::OrtRuntime;
pub use runtime::{ForwardOptions, InferenceRuntime};
