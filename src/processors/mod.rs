//! Pre- and post-processing around the forward pass.
//!
//! # Modules
//!
//! * `types` - Pixel formats and buffer layouts
//! * `pixel` - Caller-owned pixel sources and the scoped lock guard
//! * `normalization` - RGBA to mean-subtracted BGR tensor conversion
//! * `postprocess` - Argmax and label decoding

mod normalization;
pub mod pixel;
pub mod postprocess;
pub mod types;

pub use normalization::Preprocessor;
pub use pixel::{PixelLock, PixelSource, RawPixels, RgbaImageSource};
pub use postprocess::{Postprocessor, argmax, strip_label_prefix};
pub use types::{PixelFormat, PixelInfo};
