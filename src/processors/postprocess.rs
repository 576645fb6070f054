//! Reduction of raw output scores to a labelled top-1 classification.

use crate::core::config::ClassifierConfig;
use crate::core::errors::{ClassifierError, ClassifierResult, ProcessingStage, SimpleError};
use crate::core::Tensor1D;
use crate::domain::Classification;
use crate::utils::LabelTable;

/// Returns the index and value of the largest score.
///
/// The scan starts from a baseline of index 0 with score 0.0 and only moves
/// on a strictly greater value, so ties keep the earliest index and an
/// input with no positive score reports `(0, 0.0)`.
pub fn argmax<'a>(scores: impl IntoIterator<Item = &'a f32>) -> (usize, f32) {
    let mut top_class = 0;
    let mut max_score = 0.0f32;
    for (i, &s) in scores.into_iter().enumerate() {
        tracing::trace!("score {} {}", i, s);
        if s > max_score {
            top_class = i;
            max_score = s;
            tracing::trace!("top_class {} max_score {}", top_class, max_score);
        }
    }
    (top_class, max_score)
}

/// Removes the fixed-width identifier prefix (e.g. `n01440764 `) from a label.
///
/// Returns `None` if the label is shorter than `prefix_len` bytes or the cut
/// would split a UTF-8 character.
pub fn strip_label_prefix(label: &str, prefix_len: usize) -> Option<&str> {
    label.get(prefix_len..)
}

/// Turns output scores into a [`Classification`].
#[derive(Debug, Clone)]
pub struct Postprocessor {
    label_prefix_len: usize,
    score_precision: usize,
}

impl Postprocessor {
    pub fn new(label_prefix_len: usize, score_precision: usize) -> Self {
        Self {
            label_prefix_len,
            score_precision,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(config.label_prefix_len, config.score_precision)
    }

    /// Picks the best class and resolves its label.
    ///
    /// # Errors
    ///
    /// * `IndexOutOfRange` if the output has more channels than `labels` has entries.
    /// * `InvalidLabel` if the chosen label is shorter than the prefix width.
    /// * `Processing` if `scores` is empty.
    pub fn classify(
        &self,
        scores: &Tensor1D,
        labels: &LabelTable,
    ) -> ClassifierResult<Classification> {
        if scores.is_empty() {
            return Err(ClassifierError::processing_error(
                ProcessingStage::PostProcessing,
                "cannot classify an empty score vector",
                SimpleError::new("no output channels"),
            ));
        }
        if scores.len() > labels.len() {
            return Err(ClassifierError::index_out_of_range(
                scores.len(),
                labels.len(),
                "labels (output channel count exceeds label table)",
            ));
        }
        if scores.len() < labels.len() {
            tracing::trace!(
                "label table has {} entries for {} output channels",
                labels.len(),
                scores.len()
            );
        }

        let (index, score) = argmax(scores.iter());
        let raw = labels
            .get(index)
            .ok_or_else(|| ClassifierError::index_out_of_range(index, labels.len(), "labels"))?;
        let label = strip_label_prefix(raw, self.label_prefix_len).ok_or_else(|| {
            ClassifierError::InvalidLabel {
                index,
                label: raw.to_string(),
                prefix_len: self.label_prefix_len,
            }
        })?;

        tracing::debug!("top_class {} max_score {}", index, score);
        Ok(Classification::new(index, label, score).with_precision(self.score_precision))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelTable {
        LabelTable::parse("n0000000001 cat\n n0000000002 dog\n n0000000003 fish")
    }

    #[test]
    fn test_argmax_unique_maximum() {
        assert_eq!(argmax(&[0.1, 0.9, 0.05]), (1, 0.9));
        assert_eq!(argmax(&[0.3, 0.2, 0.7]), (2, 0.7));
        assert_eq!(argmax(&[0.8, 0.2, 0.1]), (0, 0.8));
    }

    #[test]
    fn test_argmax_first_occurrence_wins_ties() {
        assert_eq!(argmax(&[0.1, 0.5, 0.2, 0.5]), (1, 0.5));
    }

    #[test]
    fn test_argmax_all_non_positive_defaults_to_zero() {
        let (index, score) = argmax(&[-3.0, -0.5, -1.0]);
        assert_eq!(index, 0);
        assert_eq!(score, 0.0);
        assert_eq!(argmax(&[0.0, 0.0]), (0, 0.0));
    }

    #[test]
    fn test_argmax_independent_of_scan_direction_for_unique_max() {
        let scores = [0.2f32, 0.1, 0.95, 0.4, 0.3];
        let reversed: Vec<f32> = scores.iter().rev().copied().collect();
        let (forward, _) = argmax(&scores);
        let (backward, _) = argmax(&reversed);
        assert_eq!(forward, scores.len() - 1 - backward);
    }

    #[test]
    fn test_classify_end_to_end_string() {
        let post = Postprocessor::new(10, 3);
        let scores = Tensor1D::from(vec![0.1, 0.9, 0.05]);
        let result = post.classify(&scores, &labels()).unwrap();
        assert_eq!(result.index, 1);
        // The second entry keeps the leading space left by the newline split,
        // so removing ten bytes leaves the last two digits of its identifier.
        assert_eq!(result.to_string(), "02 dog = 0.900");
    }

    #[test]
    fn test_classify_fewer_labels_than_channels() {
        let post = Postprocessor::new(10, 3);
        let scores = Tensor1D::from(vec![0.9, 0.1, 0.0, 0.0]);
        let err = post.classify(&scores, &labels()).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::IndexOutOfRange { index: 4, len: 3, .. }
        ));
    }

    #[test]
    fn test_classify_short_label_is_invalid() {
        let post = Postprocessor::new(10, 3);
        let table = LabelTable::parse("short\nn0000000002 dog");
        let err = post
            .classify(&Tensor1D::from(vec![0.7, 0.2]), &table)
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidLabel { index: 0, .. }));
    }

    #[test]
    fn test_classify_never_out_of_range_with_long_labels() {
        let post = Postprocessor::new(10, 3);
        let table = LabelTable::parse(
            &(0..50)
                .map(|i| format!("n{:08} class{}", i, i))
                .collect::<Vec<_>>()
                .join("\n"),
        );
        for k in 0..50 {
            let mut scores = vec![0.01f32; 50];
            scores[k] = 0.5;
            let result = post.classify(&Tensor1D::from(scores), &table).unwrap();
            assert_eq!(result.label, format!("class{}", k));
        }
        let negative = Tensor1D::from(vec![-1.0f32; 50]);
        assert_eq!(post.classify(&negative, &table).unwrap().index, 0);
    }

    #[test]
    fn test_classify_empty_scores() {
        let post = Postprocessor::new(10, 3);
        assert!(post.classify(&Tensor1D::from(vec![]), &labels()).is_err());
    }

    #[test]
    fn test_strip_label_prefix_bounds() {
        assert_eq!(strip_label_prefix("n01440764 tench", 10), Some("tench"));
        assert_eq!(strip_label_prefix("n01440764 ", 10), Some(""));
        assert_eq!(strip_label_prefix("n0144", 10), None);
        assert_eq!(strip_label_prefix("ééééé", 3), None);
    }
}
