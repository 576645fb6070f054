//! Classifier configuration.

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for preprocessing, the forward pass, and label decoding.
///
/// Every field has a default matching the MobileNet v1 model, so a JSON
/// document only needs to list the fields it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Required width and height of the input pixel buffer.
    pub input_size: u32,
    /// Means subtracted from the B, G and R planes.
    pub mean_values: [f32; 3],
    /// Thread-count hint passed to the runtime on each call.
    pub num_threads: usize,
    /// Ask the runtime not to retain intermediate activations.
    pub light_mode: bool,
    /// Bytes stripped from the front of each label before display.
    pub label_prefix_len: usize,
    /// Decimals used when formatting the score.
    pub score_precision: usize,
    /// Fail initialization when the runtime rejects topology or weights.
    ///
    /// When `false`, load failures are logged and initialization continues.
    pub strict_model_load: bool,
    /// Name of the model's input tensor.
    pub input_name: String,
    /// Name of the model's output tensor.
    pub output_name: String,
    /// File name the weights blob is registered under as external data.
    pub external_data_name: String,
    /// ONNX Runtime session options.
    pub ort_session: OrtSessionConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            mean_values: DEFAULT_MEAN_VALUES,
            num_threads: DEFAULT_NUM_THREADS,
            light_mode: true,
            label_prefix_len: DEFAULT_LABEL_PREFIX_LEN,
            score_precision: DEFAULT_SCORE_PRECISION,
            strict_model_load: true,
            input_name: DEFAULT_INPUT_NAME.to_string(),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            external_data_name: DEFAULT_EXTERNAL_DATA_NAME.to_string(),
            ort_session: OrtSessionConfig::default(),
        }
    }
}

impl ClassifierConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Sets the thread-count hint.
    pub fn with_num_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }

    /// Enables or disables light mode.
    pub fn with_light_mode(mut self, enabled: bool) -> Self {
        self.light_mode = enabled;
        self
    }

    /// Sets the model load failure policy.
    pub fn with_strict_model_load(mut self, strict: bool) -> Self {
        self.strict_model_load = strict;
        self
    }

    /// Sets the label prefix width.
    pub fn with_label_prefix_len(mut self, len: usize) -> Self {
        self.label_prefix_len = len;
        self
    }

    /// Sets the input and output tensor names.
    pub fn with_tensor_names(mut self, input: impl Into<String>, output: impl Into<String>) -> Self {
        self.input_name = input.into();
        self.output_name = output.into();
        self
    }

    /// Sets the ONNX Runtime session options.
    pub fn with_ort_session(mut self, ort_session: OrtSessionConfig) -> Self {
        self.ort_session = ort_session;
        self
    }
}

impl ConfigValidator for ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_image_dimensions(self.input_size, self.input_size)?;
        self.validate_thread_count(self.num_threads)?;
        self.validate_finite(&self.mean_values, "mean_values")?;
        self.validate_tensor_name(&self.input_name, "input_name")?;
        self.validate_tensor_name(&self.output_name, "output_name")?;
        if self.score_precision > 9 {
            return Err(ConfigError::InvalidConfig {
                message: format!(
                    "score_precision must be at most 9, got {}",
                    self.score_precision
                ),
            });
        }
        Ok(())
    }

    fn get_defaults() -> Self {
        Self::default()
    }
}
