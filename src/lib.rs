//! # OAR Classify
//!
//! Top-1 image classification over ONNX Runtime for MobileNet-style models.
//!
//! ## Features
//!
//! - Model loading from in-memory topology, weight and label buffers
//! - BGR mean-subtracted preprocessing of 224x224 RGBA bitmaps
//! - Argmax decoding into `"<label> = <score>"` strings
//! - Pluggable inference runtime behind the [`InferenceRuntime`](core::InferenceRuntime) trait
//!
//! ## Modules
//!
//! * [`core`] - Configuration, errors, constants and the runtime seam
//! * [`domain`] - Result types
//! * [`models`] - The classifier context and its model store
//! * [`processors`] - Pixel access, preprocessing and postprocessing
//! * [`utils`] - Label tables and logging setup
//! * [`bridge`] - Boolean/optional call surface for host bindings
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oar_classify::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClassifierConfig::default();
//! let topology = std::fs::read("models/mobilenet.onnx")?;
//! let weights = std::fs::read("models/mobilenet.onnx.data")?;
//! let labels = std::fs::read("models/synset_words.txt")?;
//!
//! let mut classifier = MobileNetClassifier::initialize(
//!     OrtRuntime::new(&config),
//!     &topology,
//!     &weights,
//!     &labels,
//!     config,
//! )?;
//!
//! let image = image::open("cat.jpg")?
//!     .resize_exact(224, 224, image::imageops::FilterType::Triangle)
//!     .to_rgba8();
//! let result = classifier.classify(&RgbaImageSource::new(&image))?;
//! println!("{result}");
//! # Ok(())
//! # }
//! ```

pub mod bridge;
pub mod core;
pub mod domain;
pub mod models;
pub mod processors;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use oar_classify::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bridge::MobileNetBridge;
    pub use crate::core::{
        ClassifierConfig, ClassifierError, ClassifierResult, InferenceRuntime, OrtRuntime,
    };
    pub use crate::domain::Classification;
    pub use crate::models::{MobileNetClassifier, ModelStore};
    pub use crate::processors::{PixelFormat, PixelInfo, PixelSource, RawPixels, RgbaImageSource};
    pub use crate::utils::{LabelTable, init_tracing};
}
