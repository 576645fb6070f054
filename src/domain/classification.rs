//! Top-1 classification result.

use crate::core::constants::DEFAULT_SCORE_PRECISION;
use serde::{Deserialize, Serialize};

/// The best class for one input.
///
/// `score` is the raw output value; no softmax is applied, so it is not
/// necessarily a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Output channel index.
    pub index: usize,
    /// Label text with its identifier prefix removed.
    pub label: String,
    /// Raw score of the chosen channel.
    pub score: f32,
    /// Decimals used by the `Display` impl.
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    DEFAULT_SCORE_PRECISION
}

impl Classification {
    pub fn new(index: usize, label: impl Into<String>, score: f32) -> Self {
        Self {
            index,
            label: label.into(),
            score,
            precision: DEFAULT_SCORE_PRECISION,
        }
    }

    /// Sets the number of decimals the score is rendered with.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

/// Renders `"<label> = <score>"`.
impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {:.*}", self.label, self.precision, self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_default_precision() {
        let c = Classification::new(0, "tench, Tinca tinca", 0.87654);
        assert_eq!(c.to_string(), "tench, Tinca tinca = 0.877");
    }

    #[test]
    fn test_display_custom_precision() {
        let c = Classification::new(3, "goldfish", 12.5).with_precision(1);
        assert_eq!(c.to_string(), "goldfish = 12.5");
    }

    #[test]
    fn test_zero_score_renders_three_decimals() {
        assert_eq!(Classification::new(0, "x", 0.0).to_string(), "x = 0.000");
    }
}
