//! MobileNet classifier context.
//!
//! [`MobileNetClassifier`] owns everything one loaded model needs: the model
//! store, the runtime, and the pre/post-processing settings. It is created by
//! [`MobileNetClassifier::initialize`] and passed explicitly to each call, so
//! several independent models can live in one process.

use super::model_store::ModelStore;
use crate::core::config::{ClassifierConfig, ConfigValidator};
use crate::core::errors::ClassifierResult;
use crate::core::inference::{ForwardOptions, InferenceRuntime};
use crate::core::Tensor4D;
use crate::domain::Classification;
use crate::processors::{PixelSource, Postprocessor, Preprocessor};
use crate::utils::LabelTable;

#[cfg(test)]
#[path = "mobilenet_tests.rs"]
mod mobilenet_tests;

/// A loaded model ready to classify 224x224 RGBA images.
#[derive(Debug)]
pub struct MobileNetClassifier<R: InferenceRuntime> {
    runtime: R,
    store: ModelStore,
    config: ClassifierConfig,
    preprocessor: Preprocessor,
    postprocessor: Postprocessor,
    model_loaded: bool,
}

impl<R: InferenceRuntime> MobileNetClassifier<R> {
    /// Copies the three buffers, loads the model into `runtime` and parses the labels.
    ///
    /// # Arguments
    ///
    /// * `runtime` - Engine adapter the model is loaded into.
    /// * `topology` - Serialized network graph.
    /// * `weights` - Serialized parameters (may be empty for self-contained graphs).
    /// * `labels` - Newline-delimited label text.
    /// * `config` - Classifier settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an invalid configuration and, when
    /// `config.strict_model_load` is set, `ModelLoad` if the runtime rejects
    /// the topology or the weights.
    pub fn initialize(
        runtime: R,
        topology: &[u8],
        weights: &[u8],
        labels: &[u8],
        config: ClassifierConfig,
    ) -> ClassifierResult<Self> {
        let store = ModelStore::from_bytes(topology, weights, labels);
        Self::from_store(runtime, store, config)
    }

    /// Loads an already populated store into `runtime`.
    pub fn from_store(
        mut runtime: R,
        store: ModelStore,
        config: ClassifierConfig,
    ) -> ClassifierResult<Self> {
        config.validate()?;

        let topology_loaded = Self::apply_load_policy(
            runtime.load_topology(store.topology()),
            config.strict_model_load,
        )?;
        tracing::debug!(
            "load params {} {}",
            if topology_loaded { 0 } else { -1 },
            store.topology().len()
        );

        let weights_loaded = Self::apply_load_policy(
            runtime.load_weights(store.weights()),
            config.strict_model_load,
        )?;
        tracing::debug!(
            "load binary {} {}",
            if weights_loaded { 0 } else { -1 },
            store.weights().len()
        );

        Self::check_labels(store.labels(), config.label_prefix_len);

        Ok(Self {
            preprocessor: Preprocessor::from_config(&config),
            postprocessor: Postprocessor::from_config(&config),
            model_loaded: topology_loaded && weights_loaded,
            runtime,
            store,
            config,
        })
    }

    /// Strict mode propagates load errors; lenient mode logs them and reports `false`.
    fn apply_load_policy(result: ClassifierResult<()>, strict: bool) -> ClassifierResult<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if strict => Err(e),
            Err(e) => {
                tracing::warn!("Continuing after model load failure: {}", e);
                Ok(false)
            }
        }
    }

    fn check_labels(labels: &LabelTable, prefix_len: usize) {
        let mut short = labels.short_entries(prefix_len);
        // A trailing newline leaves an empty final entry that no channel maps to.
        if let Some(last) = labels.len().checked_sub(1) {
            if short.last() == Some(&last) && labels.get(last) == Some("") {
                short.pop();
            }
        }
        if !short.is_empty() {
            tracing::warn!(
                "{} of {} labels are shorter than the {}-byte identifier prefix (first at {})",
                short.len(),
                labels.len(),
                prefix_len,
                short[0]
            );
        }
        tracing::debug!("Parsed {} labels", labels.len());
    }

    /// Classifies a caller-owned pixel buffer.
    ///
    /// # Errors
    ///
    /// * `InputFormat` if the buffer is not exactly `input_size` square RGBA8.
    /// * `RuntimeExecution` if the forward pass fails.
    /// * `IndexOutOfRange` / `InvalidLabel` if the output cannot be mapped to a label.
    pub fn classify<S: PixelSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> ClassifierResult<Classification> {
        let input = self.preprocessor.preprocess(source)?;
        self.classify_tensor(&input)
    }

    /// Runs the forward pass and post-processing on a prepared input tensor.
    pub fn classify_tensor(&mut self, input: &Tensor4D) -> ClassifierResult<Classification> {
        if !self.model_loaded {
            tracing::warn!(
                "Running model '{}' whose load reported an error",
                self.runtime.model_name()
            );
        }
        // Rebuilt every call: the runtime keeps no memory of these hints.
        let options = ForwardOptions::from(&self.config);
        let scores = self.runtime.run_forward(input, &options)?;
        tracing::debug!(
            "Output width, ScoreList size {} {}",
            scores.len(),
            self.store.labels().len()
        );
        self.postprocessor.classify(&scores, self.store.labels())
    }

    /// Whether both topology and weights were accepted by the runtime.
    pub fn is_model_loaded(&self) -> bool {
        self.model_loaded
    }

    pub fn labels(&self) -> &LabelTable {
        self.store.labels()
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn store(&self) -> &ModelStore {
        &self.store
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Strict prefix check over the whole label table.
    ///
    /// Initialization only warns about short labels; callers that want a hard
    /// guarantee can call this once after loading.
    pub fn validate_labels(&self) -> ClassifierResult<()> {
        self.store
            .labels()
            .validate_prefix(self.config.label_prefix_len)
    }
}
