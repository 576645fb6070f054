//! Configuration error types and validation traits.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that a resource limit has been exceeded.
    #[error("resource limit exceeded: {message}")]
    ResourceLimitExceeded { message: String },

    /// Error raised while parsing a configuration document.
    #[error("failed to parse configuration")]
    Parse(#[from] serde_json::Error),

    /// Error raised while reading a configuration file.
    #[error("failed to read configuration")]
    Io(#[from] std::io::Error),
}

/// A trait for validating configuration parameters.
///
/// Implementors provide `validate` and `get_defaults`; the remaining methods
/// are reusable checks for the common field kinds.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Returns the default configuration.
    fn get_defaults() -> Self
    where
        Self: Sized;

    /// Validates image dimensions.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Image dimensions must be positive".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates thread count.
    ///
    /// # Arguments
    ///
    /// * `thread_count` - The thread count to validate.
    ///
    /// # Returns
    ///
    /// A Result indicating success or a ConfigError if validation fails.
    fn validate_thread_count(&self, thread_count: usize) -> Result<(), ConfigError> {
        const MAX_REASONABLE_THREADS: usize = 256;

        if thread_count == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Thread count must be greater than 0".to_string(),
            })
        } else if thread_count > MAX_REASONABLE_THREADS {
            Err(ConfigError::ResourceLimitExceeded {
                message: format!(
                    "Thread count {} exceeds reasonable maximum of {}",
                    thread_count, MAX_REASONABLE_THREADS
                ),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that every value in a slice is finite.
    fn validate_finite(&self, values: &[f32], field_name: &str) -> Result<(), ConfigError> {
        for (i, v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(ConfigError::InvalidConfig {
                    message: format!("{field_name} value at index {i} is not finite: {v}"),
                });
            }
        }
        Ok(())
    }

    /// Validates that a tensor name is not empty.
    fn validate_tensor_name(&self, name: &str, field_name: &str) -> Result<(), ConfigError> {
        if name.trim().is_empty() {
            Err(ConfigError::InvalidConfig {
                message: format!("{field_name} must not be empty"),
            })
        } else {
            Ok(())
        }
    }
}
