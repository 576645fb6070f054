//! Runtime trait and per-call options.

use crate::core::config::ClassifierConfig;
use crate::core::constants::DEFAULT_NUM_THREADS;
use crate::core::errors::ClassifierResult;
use crate::core::{Tensor1D, Tensor4D};
use std::sync::Arc;

/// Hints passed to the runtime with every forward pass.
///
/// The runtime does not remember these between calls, so the classifier
/// rebuilds them from its configuration each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForwardOptions {
    /// Upper bound on worker threads the engine may use for this call.
    pub num_threads: usize,
    /// Discard intermediate activations instead of keeping them for reuse.
    pub light_mode: bool,
}

impl Default for ForwardOptions {
    fn default() -> Self {
        Self {
            num_threads: DEFAULT_NUM_THREADS,
            light_mode: true,
        }
    }
}

impl From<&ClassifierConfig> for ForwardOptions {
    fn from(config: &ClassifierConfig) -> Self {
        Self {
            num_threads: config.num_threads,
            light_mode: config.light_mode,
        }
    }
}

/// An inference engine capable of loading a serialized network and running it.
///
/// Buffers are handed over as shared handles because an engine may keep
/// referring to them after the load call returns. Methods take `&mut self`:
/// engines are not assumed to tolerate concurrent calls, so sharing one
/// across threads requires external locking.
pub trait InferenceRuntime: Send {
    /// Loads the network graph description.
    fn load_topology(&mut self, topology: Arc<[u8]>) -> ClassifierResult<()>;

    /// Loads the parameters paired with the previously loaded topology.
    fn load_weights(&mut self, weights: Arc<[u8]>) -> ClassifierResult<()>;

    /// Runs one forward pass and returns the flattened output scores.
    fn run_forward(
        &mut self,
        input: &Tensor4D,
        options: &ForwardOptions,
    ) -> ClassifierResult<Tensor1D>;

    /// Name used to identify the model in logs and errors.
    fn model_name(&self) -> &str;
}
