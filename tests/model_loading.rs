use std::sync::Arc;

use otter_inline::inline::network;
use otter_inline::testing::{ModelFixture, logistic_artifact};
use otter_inline::{InliningOptions, InliningPolicy, ModelError, ModelLocation, NullReporter};

#[test]
fn test_missing_artifact_fails_construction() {
    let fixture = ModelFixture::new().unwrap();
    let result = InliningPolicy::load(&fixture.options(), Arc::new(NullReporter));

    assert!(matches!(result, Err(ModelError::Io { .. })));
}

#[test]
fn test_malformed_artifact_is_a_parse_error() {
    let fixture = ModelFixture::new().unwrap();
    fixture.write_raw("not json").unwrap();

    let err = InliningPolicy::load(&fixture.options(), Arc::new(NullReporter))
        .err()
        .unwrap();
    assert!(matches!(err, ModelError::Parse { .. }));
    assert!(err.to_string().contains("inlining-network.json"));
}

#[test]
fn test_invalid_artifact_is_rejected() {
    let fixture = ModelFixture::new().unwrap();
    let mut artifact = logistic_artifact([0.0; 5], 0.0);
    artifact.inputs.swap(0, 1);
    fixture.write(&artifact).unwrap();

    let result = InliningPolicy::load(&fixture.options(), Arc::new(NullReporter));
    assert!(matches!(result, Err(ModelError::FeatureOrder { index: 0, .. })));
}

#[test]
fn test_policies_share_one_loaded_network() {
    let fixture = ModelFixture::new().unwrap();
    let path = fixture.write(&logistic_artifact([0.0; 5], 1.0)).unwrap();
    let options = fixture.options();

    let first = InliningPolicy::load(&options, Arc::new(NullReporter)).unwrap();
    assert!(network::is_loaded(&path));

    // The registry serves the cached model even once the file is gone
    std::fs::remove_file(&path).unwrap();
    let second = InliningPolicy::load(&options, Arc::new(NullReporter)).unwrap();

    assert!(Arc::ptr_eq(first.evaluator(), second.evaluator()));
}

#[test]
fn test_custom_suffix_is_honoured() {
    let fixture = ModelFixture::new().unwrap();
    let artifact = logistic_artifact([0.0; 5], 0.0);
    let path = fixture.root().join("nets").join("v1.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, serde_json::to_string(&artifact).unwrap()).unwrap();

    let options = InliningOptions {
        model: ModelLocation::new(fixture.root()).with_suffix("nets/v1.json"),
        ..InliningOptions::default()
    };
    assert_eq!(options.model_path(), path);
    assert!(InliningPolicy::load(&options, Arc::new(NullReporter)).is_ok());
}

#[test]
fn test_options_from_environment_lookup() {
    let fixture = ModelFixture::new().unwrap();
    fixture.write(&logistic_artifact([0.0; 5], 0.0)).unwrap();
    let root = fixture.root().to_string_lossy().into_owned();

    let options = InliningOptions::from_lookup(|key| match key {
        "OTTER_INLINE_ROOT" => Some(root.clone()),
        "OTTER_TRACE_INLINING" => Some("true".to_string()),
        _ => None,
    });

    assert!(options.trace_inlining);
    assert_eq!(options.model_path(), fixture.options().model_path());
    assert!(InliningPolicy::load(&options, Arc::new(NullReporter)).is_ok());
}
