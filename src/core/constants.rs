//! Constants used throughout the classifier.
//!
//! Defaults match the MobileNet v1 Caffe export: a square 224x224 input,
//! BGR channel means, a `data` input blob and a `prob` output blob.

/// The side length, in pixels, of the square model input.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Per-channel means subtracted from the input, in B, G, R order.
pub const DEFAULT_MEAN_VALUES: [f32; 3] = [103.94, 116.78, 123.68];

/// Thread-count hint passed to the runtime on every forward pass.
pub const DEFAULT_NUM_THREADS: usize = 4;

/// Width of the identifier prefix (e.g. `n01440764 `) removed from each label.
pub const DEFAULT_LABEL_PREFIX_LEN: usize = 10;

/// Number of decimals used when formatting the score.
pub const DEFAULT_SCORE_PRECISION: usize = 3;

/// Default name of the model's input tensor.
pub const DEFAULT_INPUT_NAME: &str = "data";

/// Default name of the model's output tensor.
pub const DEFAULT_OUTPUT_NAME: &str = "prob";

/// Name the external weights blob is registered under when the topology
/// references its initializers as external data.
pub const DEFAULT_EXTERNAL_DATA_NAME: &str = "mobilenet.onnx.data";

/// Number of colour channels in the input tensor.
pub const INPUT_CHANNELS: usize = 3;
