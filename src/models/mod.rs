//! Model wrappers that tie a runtime to its pre- and post-processing.

pub mod classification;

pub use classification::*;
