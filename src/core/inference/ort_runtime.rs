//! ONNX Runtime adapter for [`InferenceRuntime`].
//!
//! The topology buffer holds the ONNX graph. The weights buffer, when not
//! empty, is the graph's external-data file and is registered in memory under
//! the configured file name before the session is committed. An empty weights
//! buffer means the graph carries its own initializers.

use super::runtime::{ForwardOptions, InferenceRuntime};
use crate::core::config::{
    ClassifierConfig, OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig,
};
use crate::core::errors::{ClassifierError, ClassifierResult, LoadStage, SimpleError};
use crate::core::{Tensor1D, Tensor4D};
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::session::{RunOptions, Session};
use ort::value::TensorRef;
use std::borrow::Cow;
use std::sync::Arc;

#[cfg(test)]
#[path = "ort_runtime_tests.rs"]
mod ort_runtime_tests;

/// Session config key that lets the CPU arena release memory after a run.
const ARENA_SHRINKAGE_KEY: &str = "memory.enable_memory_arena_shrinkage";

pub struct OrtRuntime {
    session_config: OrtSessionConfig,
    input_name: String,
    output_name: String,
    external_data_name: String,
    model_name: String,
    topology: Option<Arc<[u8]>>,
    weights: Option<Arc<[u8]>>,
    session: Option<Session>,
    session_threads: usize,
}

impl std::fmt::Debug for OrtRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtRuntime")
            .field("model_name", &self.model_name)
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("topology_len", &self.topology.as_ref().map(|b| b.len()))
            .field("weights_len", &self.weights.as_ref().map(|b| b.len()))
            .field("committed", &self.session.is_some())
            .field("session_threads", &self.session_threads)
            .finish()
    }
}

impl OrtRuntime {
    /// Creates an empty runtime; nothing is loaded until `load_topology` and
    /// `load_weights` are called.
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            session_config: config.ort_session.clone(),
            input_name: config.input_name.clone(),
            output_name: config.output_name.clone(),
            external_data_name: config.external_data_name.clone(),
            model_name: "mobilenet".to_string(),
            topology: None,
            weights: None,
            session: None,
            session_threads: config.num_threads,
        }
    }

    /// Overrides the name used in logs and errors.
    pub fn with_model_name(mut self, name: impl Into<String>) -> Self {
        self.model_name = name.into();
        self
    }

    /// Returns true once a session has been committed.
    pub fn is_loaded(&self) -> bool {
        self.session.is_some()
    }

    /// Input tensor name in use (after any fallback to the session's first input).
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Output tensor name in use (after any fallback to the session's first output).
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
        intra_threads: usize,
    ) -> Result<SessionBuilder, ort::Error> {
        builder = builder
            .with_log_level(LogLevel::Error)?
            .with_intra_threads(intra_threads)?;
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(enabled) = cfg.enable_mem_pattern {
            builder = builder.with_memory_pattern(enabled)?;
        }
        let mapped = match cfg.get_optimization_level() {
            OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
            OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
            OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
            OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
        };
        builder = builder.with_optimization_level(mapped)?;

        let providers = Self::build_execution_providers(cfg)?;
        if !providers.is_empty() {
            builder = builder.with_execution_providers(providers)?;
        }
        Ok(builder)
    }

    /// Builds execution providers from configuration
    fn build_execution_providers(
        cfg: &OrtSessionConfig,
    ) -> Result<Vec<ExecutionProviderDispatch>, ort::Error> {
        let mut providers = Vec::new();

        for ep in cfg.get_execution_providers() {
            match ep {
                OrtExecutionProvider::CPU => {
                    let mut cpu = ort::execution_providers::CPUExecutionProvider::default();
                    if let Some(arena) = cfg.enable_cpu_mem_arena {
                        cpu = cpu.with_arena_allocator(arena);
                    }
                    providers.push(cpu.build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda = ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda = cuda.with_device_id(id);
                    }
                    providers.push(cuda.build());
                }
                #[cfg(feature = "coreml")]
                OrtExecutionProvider::CoreML { subgraphs } => {
                    let mut coreml = ort::execution_providers::CoreMLExecutionProvider::default();
                    if let Some(sub) = subgraphs {
                        coreml = coreml.with_subgraphs(sub);
                    }
                    providers.push(coreml.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    return Err(ort::Error::new(
                        "CUDA execution provider requested but cuda feature is not enabled",
                    ));
                }
                #[cfg(not(feature = "coreml"))]
                OrtExecutionProvider::CoreML { .. } => {
                    return Err(ort::Error::new(
                        "CoreML execution provider requested but coreml feature is not enabled",
                    ));
                }
            }
        }

        Ok(providers)
    }

    /// Commits a session from the retained buffers with the given thread count.
    fn commit_session(&mut self, intra_threads: usize) -> ClassifierResult<()> {
        let topology = self.topology.clone().ok_or_else(|| {
            ClassifierError::model_load(
                LoadStage::Topology,
                "topology must be loaded before weights",
            )
        })?;

        let builder = Session::builder()
            .and_then(|b| Self::apply_ort_config(b, &self.session_config, intra_threads))
            .map_err(|e| {
                ClassifierError::model_load_with_source(
                    LoadStage::Weights,
                    "failed to configure ONNX session",
                    e,
                )
            })?;

        // ort takes external data as `Cow<'static, [u8]>`, so every commit
        // (including a rebuild for a new thread hint) copies the weights.
        let builder = match self.weights.as_ref().filter(|w| !w.is_empty()) {
            Some(weights) => builder
                .with_external_initializer_file_in_memory(
                    &self.external_data_name,
                    Cow::Owned(weights.to_vec()),
                )
                .map_err(|e| {
                    ClassifierError::model_load_with_source(
                        LoadStage::Weights,
                        format!(
                            "failed to register {} bytes of external data as '{}'",
                            weights.len(),
                            self.external_data_name
                        ),
                        e,
                    )
                })?,
            None => builder,
        };

        let session = builder.commit_from_memory(&topology).map_err(|e| {
            ClassifierError::model_load_with_source(
                LoadStage::Weights,
                format!(
                    "failed to create ONNX session from {} topology bytes",
                    topology.len()
                ),
                e,
            )
        })?;

        self.resolve_tensor_names(&session);
        self.session = Some(session);
        self.session_threads = intra_threads;
        Ok(())
    }

    /// Per-call options; light mode lets the CPU arena shrink after the run.
    fn run_options(options: &ForwardOptions) -> Result<RunOptions, ort::Error> {
        let mut run_options = RunOptions::new()?;
        if options.light_mode {
            run_options.add_config_entry(ARENA_SHRINKAGE_KEY, "cpu:0")?;
        }
        Ok(run_options)
    }

    /// Falls back to the session's first input/output when a configured name is absent.
    fn resolve_tensor_names(&mut self, session: &Session) {
        if !session.inputs.iter().any(|i| i.name == self.input_name) {
            if let Some(first) = session.inputs.first() {
                tracing::warn!(
                    "Input '{}' not found in model '{}', using '{}'",
                    self.input_name,
                    self.model_name,
                    first.name
                );
                self.input_name = first.name.clone();
            }
        }
        if !session.outputs.iter().any(|o| o.name == self.output_name) {
            if let Some(first) = session.outputs.first() {
                tracing::warn!(
                    "Output '{}' not found in model '{}', using '{}'",
                    self.output_name,
                    self.model_name,
                    first.name
                );
                self.output_name = first.name.clone();
            }
        }
    }
}

impl InferenceRuntime for OrtRuntime {
    fn load_topology(&mut self, topology: Arc<[u8]>) -> ClassifierResult<()> {
        if topology.is_empty() {
            return Err(ClassifierError::model_load(
                LoadStage::Topology,
                "topology buffer is empty",
            ));
        }
        tracing::debug!("load topology {} bytes", topology.len());
        self.topology = Some(topology);
        // A new graph invalidates any session built from the previous one.
        self.session = None;
        Ok(())
    }

    fn load_weights(&mut self, weights: Arc<[u8]>) -> ClassifierResult<()> {
        tracing::debug!("load weights {} bytes", weights.len());
        self.weights = Some(weights);
        let threads = self.session_threads;
        self.commit_session(threads)
    }

    fn run_forward(
        &mut self,
        input: &Tensor4D,
        options: &ForwardOptions,
    ) -> ClassifierResult<Tensor1D> {
        if self.session.is_some() && options.num_threads != self.session_threads {
            tracing::debug!(
                "Rebuilding session for thread hint {} (was {})",
                options.num_threads,
                self.session_threads
            );
            self.commit_session(options.num_threads)?;
        }

        let Self {
            session,
            input_name,
            output_name,
            model_name,
            ..
        } = self;
        let (input_name, output_name, model_name) =
            (input_name.as_str(), output_name.as_str(), model_name.as_str());
        let session = session.as_mut().ok_or_else(|| {
            ClassifierError::runtime_execution(
                model_name,
                "no session has been committed",
                SimpleError::new("model not loaded"),
            )
        })?;

        let input_shape = input.shape().to_vec();
        let input_tensor = TensorRef::from_array_view(input.view()).map_err(|e| {
            ClassifierError::runtime_execution(
                model_name,
                format!("failed to convert input tensor with shape {:?}", input_shape),
                e,
            )
        })?;
        let inputs = ort::inputs![input_name => input_tensor];

        let run_options = Self::run_options(options).map_err(|e| {
            ClassifierError::runtime_execution(model_name, "failed to create run options", e)
        })?;

        let outputs = session.run_with_options(inputs, &run_options).map_err(|e| {
            ClassifierError::runtime_execution(
                model_name,
                format!(
                    "forward pass failed with input '{}' -> output '{}'",
                    input_name, output_name
                ),
                e,
            )
        })?;

        let output = outputs.get(output_name).ok_or_else(|| {
            ClassifierError::runtime_execution(
                model_name,
                format!("output '{}' missing from results", output_name),
                SimpleError::new("missing output"),
            )
        })?;
        let (output_shape, output_data) = output.try_extract_tensor::<f32>().map_err(|e| {
            ClassifierError::runtime_execution(
                model_name,
                format!("failed to extract output tensor '{}' as f32", output_name),
                e,
            )
        })?;
        tracing::debug!(
            "Output shape {:?}, score count {}",
            output_shape,
            output_data.len()
        );

        if output_data.is_empty() {
            return Err(ClassifierError::runtime_execution(
                model_name,
                format!("output '{}' is empty", output_name),
                SimpleError::new("empty output tensor"),
            ));
        }

        Ok(Tensor1D::from(output_data.to_vec()))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
