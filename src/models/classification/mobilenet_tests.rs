use super::*;
use crate::core::errors::{ClassifierError, LoadStage};
use crate::core::inference::runtime::test_support::MockRuntime;
use crate::processors::pixel::test_support::CountingSource;
use crate::processors::{PixelFormat, PixelInfo};
use std::sync::Arc;

const LABELS: &[u8] = b"n0000000001 cat\n n0000000002 dog\n n0000000003 fish";

fn classifier(scores: Vec<f32>) -> MobileNetClassifier<MockRuntime> {
    MobileNetClassifier::initialize(
        MockRuntime::with_scores(scores),
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_initialize_hands_buffers_to_runtime() {
    let c = classifier(vec![0.1, 0.9, 0.05]);
    assert!(c.is_model_loaded());
    assert_eq!(c.runtime().topology.as_deref(), Some(&b"graph"[..]));
    assert_eq!(c.runtime().weights.as_deref(), Some(&b"params"[..]));
    assert_eq!(c.labels().len(), 3);
}

#[test]
fn test_runtime_shares_store_buffers() {
    let c = classifier(vec![0.1, 0.9, 0.05]);
    let topology = c.runtime().topology.as_ref().unwrap();
    let weights = c.runtime().weights.as_ref().unwrap();
    assert!(Arc::ptr_eq(topology, &c.store().topology()));
    assert!(Arc::ptr_eq(weights, &c.store().weights()));
}

#[test]
fn test_classify_end_to_end() {
    let mut c = classifier(vec![0.1, 0.9, 0.05]);
    let source = CountingSource::rgba(224, 224, [10, 20, 30, 255]);

    let result = c.classify(&source).unwrap();
    assert_eq!(result.index, 1);
    assert_eq!(result.label, "02 dog");
    assert_eq!(result.to_string(), "02 dog = 0.900");
    assert_eq!(
        c.runtime().last_input_shape.as_deref(),
        Some(&[1, 3, 224, 224][..])
    );
    assert_eq!(source.unlocks.get(), 1);
}

#[test]
fn test_forward_options_passed_every_call() {
    let mut c = MobileNetClassifier::initialize(
        MockRuntime::with_scores(vec![0.5, 0.1, 0.1]),
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default().with_num_threads(2),
    )
    .unwrap();
    let source = CountingSource::rgba(224, 224, [0; 4]);

    c.classify(&source).unwrap();
    c.classify(&source).unwrap();

    let calls = &c.runtime().forward_calls;
    assert_eq!(calls.len(), 2);
    for options in calls {
        assert_eq!(options.num_threads, 2);
        assert!(options.light_mode);
    }
}

#[test]
fn test_fewer_labels_than_channels_is_index_error() {
    let mut c = MobileNetClassifier::initialize(
        MockRuntime::with_scores(vec![0.9, 0.05, 0.03, 0.02]),
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default(),
    )
    .unwrap();
    let source = CountingSource::rgba(224, 224, [0; 4]);

    let err = c.classify(&source).unwrap_err();
    assert!(matches!(err, ClassifierError::IndexOutOfRange { .. }));
}

#[test]
fn test_all_negative_scores_pick_first_label() {
    let mut c = classifier(vec![-2.0, -0.1, -5.0]);
    let source = CountingSource::rgba(224, 224, [0; 4]);

    let result = c.classify(&source).unwrap();
    assert_eq!(result.index, 0);
    assert_eq!(result.to_string(), "1 cat = 0.000");
}

#[test]
fn test_wrong_input_size_skips_runtime() {
    let mut c = classifier(vec![0.1, 0.9, 0.05]);
    let source = CountingSource::rgba(100, 100, [0; 4]);

    let err = c.classify(&source).unwrap_err();
    assert!(err.is_input_format());
    assert!(c.runtime().forward_calls.is_empty());
    assert_eq!(source.locks.get(), 0);
}

#[test]
fn test_wrong_pixel_format_skips_runtime() {
    let mut c = classifier(vec![0.1, 0.9, 0.05]);
    let info = PixelInfo::packed(224, 224, PixelFormat::Alpha8);
    let source = CountingSource::new(vec![0u8; info.required_len()], info);

    assert!(c.classify(&source).unwrap_err().is_input_format());
    assert!(c.runtime().forward_calls.is_empty());
}

#[test]
fn test_runtime_failure_propagates() {
    let mut runtime = MockRuntime::with_scores(vec![0.1, 0.9, 0.05]);
    runtime.fail_run = true;
    let mut c = MobileNetClassifier::initialize(
        runtime,
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default(),
    )
    .unwrap();
    let source = CountingSource::rgba(224, 224, [0; 4]);

    let err = c.classify(&source).unwrap_err();
    assert!(matches!(err, ClassifierError::RuntimeExecution { .. }));
    assert_eq!(source.unlocks.get(), 1);
}

#[test]
fn test_strict_load_surfaces_model_load_error() {
    let mut runtime = MockRuntime::with_scores(vec![0.1]);
    runtime.fail_weights = true;
    let err = MobileNetClassifier::initialize(
        runtime,
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        ClassifierError::ModelLoad {
            stage: LoadStage::Weights,
            ..
        }
    ));
}

#[test]
fn test_lenient_load_continues() {
    let mut runtime = MockRuntime::with_scores(vec![0.1, 0.9, 0.05]);
    runtime.fail_topology = true;
    let mut c = MobileNetClassifier::initialize(
        runtime,
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default().with_strict_model_load(false),
    )
    .unwrap();
    assert!(!c.is_model_loaded());

    // The mock still answers, standing in for an engine that limps along.
    let source = CountingSource::rgba(224, 224, [0; 4]);
    assert_eq!(c.classify(&source).unwrap().index, 1);
}

#[test]
fn test_invalid_config_rejected() {
    let result = MobileNetClassifier::initialize(
        MockRuntime::default(),
        b"graph",
        b"params",
        LABELS,
        ClassifierConfig::default().with_num_threads(0),
    );
    assert!(matches!(result, Err(ClassifierError::ConfigError { .. })));
}

#[test]
fn test_validate_labels() {
    let c = classifier(vec![0.1]);
    assert!(c.validate_labels().is_ok());

    let short = MobileNetClassifier::initialize(
        MockRuntime::default(),
        b"graph",
        b"params",
        b"n01440764 tench\ncat",
        ClassifierConfig::default(),
    )
    .unwrap();
    assert!(matches!(
        short.validate_labels(),
        Err(ClassifierError::InvalidLabel { index: 1, .. })
    ));
}

#[test]
fn test_independent_instances() {
    let mut a = classifier(vec![0.9, 0.1, 0.0]);
    let mut b = classifier(vec![0.0, 0.1, 0.9]);
    let source = CountingSource::rgba(224, 224, [0; 4]);

    assert_eq!(a.classify(&source).unwrap().index, 0);
    assert_eq!(b.classify(&source).unwrap().index, 2);
}
