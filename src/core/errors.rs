//! Error types for the classification bridge.
//!
//! This module defines the errors that can occur while loading a model,
//! converting caller-owned pixel buffers into input tensors, running the
//! forward pass, and decoding the output into a label. It also provides
//! constructor helpers so call sites can attach context without spelling out
//! every variant field.

use thiserror::Error;

/// Stage of processing an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProcessingStage {
    /// Building the input tensor from pixels.
    Preprocessing,
    /// Reducing the output tensor to a classification.
    PostProcessing,
}

impl std::fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcessingStage::Preprocessing => write!(f, "preprocessing"),
            ProcessingStage::PostProcessing => write!(f, "post-processing"),
        }
    }
}

/// Which half of the serialized model a load error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStage {
    /// The network graph description.
    Topology,
    /// The parameter blob paired with the topology.
    Weights,
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStage::Topology => write!(f, "topology"),
            LoadStage::Weights => write!(f, "weights"),
        }
    }
}

/// Errors produced by the classifier.
#[derive(Error, Debug)]
pub enum ClassifierError {
    /// The pixel buffer does not have the size or format the model expects.
    #[error("unsupported input: {message}")]
    InputFormat {
        /// What did not match.
        message: String,
    },

    /// The pixel memory could not be locked for reading.
    #[error("cannot access pixels: {message}")]
    PixelAccess {
        /// Reason reported by the pixel source.
        message: String,
    },

    /// The runtime rejected the topology or the weights.
    #[error("failed to load model {stage}: {message}")]
    ModelLoad {
        /// Which buffer was being loaded.
        stage: LoadStage,
        /// Description of the failure.
        message: String,
        /// Underlying runtime error, when there is one.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A label lookup or channel count fell outside the label table.
    #[error("index {index} out of range for {len} {context}")]
    IndexOutOfRange {
        /// Requested index (or channel count).
        index: usize,
        /// Number of available entries.
        len: usize,
        /// What was being indexed.
        context: String,
    },

    /// The inference engine failed while running the forward pass.
    #[error("inference failed for model '{model_name}': {context}")]
    RuntimeExecution {
        /// Model the call was made against.
        model_name: String,
        /// What the runtime was doing.
        context: String,
        /// Underlying engine error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A label entry is too short to carry the fixed-width identifier prefix.
    #[error("label {index} ({label:?}) is shorter than the {prefix_len}-byte identifier prefix")]
    InvalidLabel {
        /// Position of the label in the table.
        index: usize,
        /// The offending label text.
        label: String,
        /// Configured prefix width.
        prefix_len: usize,
    },

    /// Inference was requested before a model was loaded.
    #[error("classifier is not initialized")]
    NotInitialized,

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error occurred during processing.
    #[error("{kind} failed: {context}")]
    Processing {
        /// The stage of processing where the error occurred.
        kind: ProcessingStage,
        /// Additional context about the error.
        context: String,
        /// The underlying error that caused this error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Convenience result alias.
pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Plain message error used as a `source` where no richer error exists.
#[derive(Debug)]
pub struct SimpleError(String);

impl SimpleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SimpleError {}

impl ClassifierError {
    /// Creates an input format error.
    pub fn input_format(message: impl Into<String>) -> Self {
        Self::InputFormat {
            message: message.into(),
        }
    }

    /// Creates a pixel access error.
    pub fn pixel_access(message: impl Into<String>) -> Self {
        Self::PixelAccess {
            message: message.into(),
        }
    }

    /// Creates a model load error without an underlying source.
    pub fn model_load(stage: LoadStage, message: impl Into<String>) -> Self {
        Self::ModelLoad {
            stage,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a model load error wrapping the runtime's error.
    pub fn model_load_with_source(
        stage: LoadStage,
        message: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ModelLoad {
            stage,
            message: message.into(),
            source: Some(Box::new(error)),
        }
    }

    /// Creates an index error.
    ///
    /// # Arguments
    ///
    /// * `index` - The index (or count) that did not fit.
    /// * `len` - The number of entries available.
    /// * `context` - What was being indexed, e.g. `"labels"`.
    pub fn index_out_of_range(index: usize, len: usize, context: impl Into<String>) -> Self {
        Self::IndexOutOfRange {
            index,
            len,
            context: context.into(),
        }
    }

    /// Creates a runtime execution error.
    pub fn runtime_execution(
        model_name: &str,
        context: impl Into<String>,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::RuntimeExecution {
            model_name: model_name.to_string(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a processing error for the given stage.
    pub fn processing_error(
        kind: ProcessingStage,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Processing {
            kind,
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Returns true for errors caused by an unsupported pixel buffer.
    ///
    /// The bridge surface reports these as an absent result instead of a failure.
    pub fn is_input_format(&self) -> bool {
        matches!(self, Self::InputFormat { .. })
    }
}

impl From<crate::core::config::ConfigError> for ClassifierError {
    fn from(error: crate::core::config::ConfigError) -> Self {
        Self::ConfigError {
            message: error.to_string(),
        }
    }
}
