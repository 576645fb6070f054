//! Host-facing call surface.
//!
//! Hosts that talk to the classifier across a foreign-function boundary
//! usually want a flat pair of calls: one that loads the model and reports
//! success as a boolean, and one that classifies a bitmap and yields a
//! string or nothing. [`MobileNetBridge`] provides that shape on top of
//! [`MobileNetClassifier`].

use crate::core::config::ClassifierConfig;
use crate::core::errors::{ClassifierError, ClassifierResult};
use crate::core::inference::{InferenceRuntime, OrtRuntime};
use crate::models::MobileNetClassifier;
use crate::processors::PixelSource;
use std::time::Instant;

type RuntimeFactory<R> = Box<dyn Fn(&ClassifierConfig) -> R + Send + Sync>;

/// Boolean `init` / optional-string `inference` wrapper around a classifier.
pub struct MobileNetBridge<R: InferenceRuntime> {
    config: ClassifierConfig,
    factory: RuntimeFactory<R>,
    classifier: Option<MobileNetClassifier<R>>,
}

impl MobileNetBridge<OrtRuntime> {
    /// Bridge backed by ONNX Runtime.
    pub fn with_ort(config: ClassifierConfig) -> Self {
        Self::new(config, OrtRuntime::new)
    }
}

impl<R: InferenceRuntime> MobileNetBridge<R> {
    /// Creates an uninitialized bridge; `factory` builds a fresh runtime on every `init`.
    pub fn new<F>(config: ClassifierConfig, factory: F) -> Self
    where
        F: Fn(&ClassifierConfig) -> R + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Box::new(factory),
            classifier: None,
        }
    }

    /// Loads the model. Returns `false` and logs the cause on failure.
    ///
    /// A successful call replaces any previously loaded model; a failed one
    /// leaves the bridge uninitialized.
    pub fn init(&mut self, topology: &[u8], weights: &[u8], labels: &[u8]) -> bool {
        self.classifier = None;
        let runtime = (self.factory)(&self.config);
        match MobileNetClassifier::initialize(
            runtime,
            topology,
            weights,
            labels,
            self.config.clone(),
        ) {
            Ok(classifier) => {
                tracing::info!(
                    "Initialized classifier with {} labels",
                    classifier.labels().len()
                );
                self.classifier = Some(classifier);
                true
            }
            Err(e) => {
                tracing::error!("Classifier initialization failed: {}", e);
                false
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.classifier.is_some()
    }

    /// Classifies `source` and renders `"<label> = <score>"`.
    ///
    /// Returns `Ok(None)` when the bitmap is not a square RGBA8 image of the
    /// configured size.
    ///
    /// # Errors
    ///
    /// `NotInitialized` before a successful [`init`](Self::init),
    /// `PixelAccess` if the bitmap cannot be locked, otherwise any runtime or
    /// label-mapping error.
    pub fn inference<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> ClassifierResult<Option<String>> {
        let classifier = self
            .classifier
            .as_mut()
            .ok_or(ClassifierError::NotInitialized)?;

        let start = Instant::now();
        let result = classifier.classify(source);
        tracing::debug!("{:.2}ms   Detect", start.elapsed().as_secs_f64() * 1000.0);

        match result {
            Ok(classification) => Ok(Some(classification.to_string())),
            Err(e) if e.is_input_format() => {
                tracing::error!("Rejected input bitmap: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn classifier(&self) -> Option<&MobileNetClassifier<R>> {
        self.classifier.as_ref()
    }
}
