//! Domain types returned to callers.

pub mod classification;

pub use classification::Classification;
