//! Image classification models.
//!
//! This module contains the MobileNet classifier context and the store that
//! owns its model buffers.

pub mod mobilenet;
pub mod model_store;

pub use mobilenet::MobileNetClassifier;
pub use model_store::ModelStore;
