//! ONNX Runtime configuration types and utilities.

use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    #[default]
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
}

/// Execution providers for ONNX Runtime.
///
/// Accelerated providers are only available when the matching cargo feature
/// is enabled; requesting one without it fails at session creation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtExecutionProvider {
    /// CPU execution provider (always available)
    #[default]
    CPU,
    /// NVIDIA CUDA execution provider
    CUDA {
        /// CUDA device ID (default: 0)
        device_id: Option<i32>,
    },
    /// CoreML execution provider (macOS/iOS only)
    CoreML {
        /// Enable subgraphs
        subgraphs: Option<bool>,
    },
}

/// Configuration for ONNX Runtime sessions.
///
/// The intra-op thread count is not part of this struct: it comes from the
/// per-call thread hint carried by [`ForwardOptions`](crate::core::ForwardOptions).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution across nodes
    pub inter_threads: Option<usize>,
    /// Graph optimization level
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
    /// Execution providers in order of preference
    pub execution_providers: Option<Vec<OrtExecutionProvider>>,
    /// Enable memory pattern optimization
    pub enable_mem_pattern: Option<bool>,
    /// Enable CPU memory arena
    pub enable_cpu_mem_arena: Option<bool>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of inter-op threads.
    ///
    /// # Arguments
    ///
    /// * `threads` - Number of threads for inter-op parallelism.
    ///
    /// # Returns
    ///
    /// Self for method chaining.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Adds a single execution provider.
    ///
    /// # Arguments
    ///
    /// * `provider` - The execution provider to add.
    ///
    /// # Returns
    ///
    /// Self for method chaining.
    pub fn add_execution_provider(mut self, provider: OrtExecutionProvider) -> Self {
        if let Some(ref mut providers) = self.execution_providers {
            providers.push(provider);
        } else {
            self.execution_providers = Some(vec![provider]);
        }
        self
    }

    /// Enables or disables memory pattern optimization.
    pub fn with_memory_pattern(mut self, enable: bool) -> Self {
        self.enable_mem_pattern = Some(enable);
        self
    }

    /// Enables or disables CPU memory arena.
    pub fn with_cpu_memory_arena(mut self, enable: bool) -> Self {
        self.enable_cpu_mem_arena = Some(enable);
        self
    }

    /// Gets the effective graph optimization level.
    pub fn get_optimization_level(&self) -> OrtGraphOptimizationLevel {
        self.optimization_level.unwrap_or_default()
    }

    /// Gets the execution providers, or a lone CPU provider if not set.
    pub fn get_execution_providers(&self) -> Vec<OrtExecutionProvider> {
        self.execution_providers
            .clone()
            .unwrap_or_else(|| vec![OrtExecutionProvider::CPU])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ort_session_config_new() {
        let config = OrtSessionConfig::new();
        assert!(config.inter_threads.is_none());
        assert!(config.optimization_level.is_none());
        assert!(config.execution_providers.is_none());
    }

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_inter_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level2)
            .with_memory_pattern(true)
            .add_execution_provider(OrtExecutionProvider::CPU)
            .add_execution_provider(OrtExecutionProvider::CUDA { device_id: Some(1) });

        assert_eq!(config.inter_threads, Some(2));
        assert_eq!(
            config.get_optimization_level(),
            OrtGraphOptimizationLevel::Level2
        );
        assert_eq!(config.enable_mem_pattern, Some(true));
        assert_eq!(config.get_execution_providers().len(), 2);
    }

    #[test]
    fn test_execution_provider_defaults() {
        let config = OrtSessionConfig::new();
        assert_eq!(
            config.get_execution_providers(),
            vec![OrtExecutionProvider::CPU]
        );
        assert_eq!(
            config.get_optimization_level(),
            OrtGraphOptimizationLevel::Level1
        );
    }
}
