//! Owned model buffers and labels.

use crate::core::errors::ClassifierResult;
use crate::utils::LabelTable;
use std::path::Path;
use std::sync::Arc;

/// Topology and weight bytes plus the parsed label table.
///
/// Buffers are copied in once and handed to the runtime as reference-counted
/// handles, so the runtime may keep them after loading. A runtime may still
/// copy a buffer into engine-owned memory; `OrtRuntime` does so for the
/// weights each time it commits a session.
#[derive(Debug, Clone)]
pub struct ModelStore {
    topology: Arc<[u8]>,
    weights: Arc<[u8]>,
    labels: LabelTable,
}

impl ModelStore {
    /// Copies the three caller buffers into owned storage.
    pub fn from_bytes(topology: &[u8], weights: &[u8], labels: &[u8]) -> Self {
        Self {
            topology: Arc::from(topology),
            weights: Arc::from(weights),
            labels: LabelTable::from_bytes(labels),
        }
    }

    /// Reads topology, weights and labels from files.
    pub fn from_paths(
        topology: impl AsRef<Path>,
        weights: Option<&Path>,
        labels: impl AsRef<Path>,
    ) -> ClassifierResult<Self> {
        let topology = std::fs::read(topology.as_ref())?;
        let weights = match weights {
            Some(path) => std::fs::read(path)?,
            None => Vec::new(),
        };
        let labels = std::fs::read(labels.as_ref())?;
        tracing::debug!(
            "Read model files: topology {} bytes, weights {} bytes, labels {} bytes",
            topology.len(),
            weights.len(),
            labels.len()
        );
        Ok(Self {
            topology: Arc::from(topology),
            weights: Arc::from(weights),
            labels: LabelTable::from_bytes(&labels),
        })
    }

    /// Shared handle to the topology bytes.
    pub fn topology(&self) -> Arc<[u8]> {
        Arc::clone(&self.topology)
    }

    /// Shared handle to the weight bytes.
    pub fn weights(&self) -> Arc<[u8]> {
        Arc::clone(&self.weights)
    }

    pub fn labels(&self) -> &LabelTable {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_bytes_copies_buffers() {
        let mut topology = vec![1u8, 2, 3];
        let store = ModelStore::from_bytes(&topology, &[4, 5], b"a\nb");
        topology[0] = 9;
        assert_eq!(&*store.topology(), &[1, 2, 3]);
        assert_eq!(&*store.weights(), &[4, 5]);
        assert_eq!(store.labels().len(), 2);
    }

    #[test]
    fn test_handles_share_storage() {
        let store = ModelStore::from_bytes(&[1, 2, 3], &[], b"");
        let a = store.topology();
        let b = store.topology();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_from_paths() {
        let mut topology = NamedTempFile::new().unwrap();
        topology.write_all(&[0x08, 0x07]).unwrap();
        let mut labels = NamedTempFile::new().unwrap();
        write!(labels, "n01440764 tench\nn01443537 goldfish").unwrap();

        let store = ModelStore::from_paths(topology.path(), None, labels.path()).unwrap();
        assert_eq!(&*store.topology(), &[0x08, 0x07]);
        assert!(store.weights().is_empty());
        assert_eq!(store.labels().get(0), Some("n01440764 tench"));
    }

    #[test]
    fn test_from_paths_missing_file() {
        let labels = NamedTempFile::new().unwrap();
        let result = ModelStore::from_paths("/nonexistent/model.onnx", None, labels.path());
        assert!(result.is_err());
    }
}
