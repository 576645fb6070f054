//! Label table loading.
//!
//! Labels come from a newline-delimited blob such as ImageNet's
//! `synset_words.txt`, one entry per output channel in channel order.

use crate::core::errors::{ClassifierError, ClassifierResult};
use std::path::Path;

/// Ordered class labels, index-aligned with the model's output channels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelTable {
    labels: Vec<String>,
}

impl LabelTable {
    /// Splits `text` on `'\n'`.
    ///
    /// Entries are kept verbatim (no trimming) and the segment after the last
    /// newline is always included, so a trailing newline yields a final empty
    /// entry and an empty blob yields a single empty entry.
    pub fn parse(text: &str) -> Self {
        Self {
            labels: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Parses a raw byte blob, replacing invalid UTF-8 sequences.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::parse(&String::from_utf8_lossy(bytes))
    }

    /// Reads and parses a label file.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Io` if the file cannot be read.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use oar_classify::utils::LabelTable;
    ///
    /// let labels = LabelTable::from_file("models/synset_words.txt")?;
    /// # Ok::<(), oar_classify::core::ClassifierError>(())
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> ClassifierResult<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        Ok(Self::from_bytes(&bytes))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    /// Indexes of entries shorter than `min_len` bytes.
    pub fn short_entries(&self, min_len: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, l)| l.len() < min_len)
            .map(|(i, _)| i)
            .collect()
    }

    /// Checks that every entry can lose a `prefix_len`-byte prefix.
    ///
    /// # Errors
    ///
    /// Returns `InvalidLabel` for the first entry that is too short.
    pub fn validate_prefix(&self, prefix_len: usize) -> ClassifierResult<()> {
        match self.short_entries(prefix_len).first() {
            Some(&index) => Err(ClassifierError::InvalidLabel {
                index,
                label: self.labels[index].clone(),
                prefix_len,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<String>> for LabelTable {
    fn from(labels: Vec<String>) -> Self {
        Self { labels }
    }
}
