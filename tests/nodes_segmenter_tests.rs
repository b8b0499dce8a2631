use biopipe::core::{ChannelKey, Node, NodeError, ProcessingNode, SampleSeries};
use biopipe::nodes::segmenter::segment_channel;
use biopipe::nodes::{FillingValue, SlidingWindowSegmenter};
use serde_json::json;

fn segmenter(config: serde_json::Value) -> Result<Node<SlidingWindowSegmenter>, NodeError> {
    Node::<SlidingWindowSegmenter>::from_parameters("segmenter", &config)
}

#[test]
fn test_segments_scenario_with_zero_filling() {
    let mut node = segmenter(json!({"window_size": 3, "step_size": 2, "filling_value": "zero"})).unwrap();
    let data = SampleSeries::from_channels(Some(250.0), [("Fz", vec![1.0, 2.0, 3.0, 4.0, 5.0])]);
    node.push("main", data.into()).unwrap();

    let outcome = node.run().unwrap();
    assert!(outcome.processed);

    let emitted = outcome.emitted.unwrap();
    let epochs = emitted.epochs("main").unwrap();
    assert_eq!(
        epochs.channel(&ChannelKey::from("Fz")).unwrap(),
        &[vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 5.0]]
    );
    assert_eq!(epochs.sampling_frequency_hz, Some(250.0));
}

#[test]
fn test_waits_for_a_full_window() {
    let mut node = segmenter(json!({"window_size": 4, "step_size": 2, "filling_value": "zero"})).unwrap();
    node.push("main", SampleSeries::from_channels(None, [("c", vec![1.0, 2.0, 3.0])]).into())
        .unwrap();

    let outcome = node.run().unwrap();
    assert!(!outcome.processed);
    assert!(outcome.emitted.is_none());
    assert_eq!(node.input_buffer().data_count("main"), 3);

    node.push("main", SampleSeries::from_channels(None, [("c", vec![4.0])]).into())
        .unwrap();
    let outcome = node.run().unwrap();
    assert!(outcome.processed);
    assert!(node.input_buffer().is_empty());
}

#[test]
fn test_epoch_count_and_coverage() {
    let window_size = 5;
    let step_size = 2;

    for length in window_size..40 {
        let samples: Vec<f64> = (0..length).map(|n| n as f64).collect();
        let epochs = segment_channel(&samples, window_size, step_size, FillingValue::Zero);

        let mut loop_epochs = 0;
        let mut index = 0;
        while index + window_size < length {
            loop_epochs += 1;
            index += step_size;
        }
        let remaining = length - index;
        assert_eq!(epochs.len(), loop_epochs + 1, "length {}", length);
        assert!(epochs.iter().all(|epoch| epoch.len() == window_size));

        // every sample lands in at least one epoch
        let last = epochs.last().unwrap();
        assert!(last.contains(&samples[length - 1]));

        let filled = &last[remaining..];
        assert!(filled.iter().all(|&value| value == 0.0));
        if remaining == window_size {
            assert!(filled.is_empty());
        }
    }
}

#[test]
fn test_channels_are_segmented_independently() {
    let mut node = segmenter(json!({"window_size": 3, "step_size": 2, "filling_value": "latest"})).unwrap();
    let data = SampleSeries::from_channels(
        None,
        [("a", vec![1.0, 2.0, 3.0, 4.0]), ("b", vec![10.0, 20.0, 30.0, 40.0])],
    );
    node.push("main", data.into()).unwrap();

    let emitted = node.run().unwrap().emitted.unwrap();
    let epochs = emitted.epochs("main").unwrap();
    assert_eq!(
        epochs.channel(&ChannelKey::from("a")).unwrap(),
        &[vec![1.0, 2.0, 3.0], vec![3.0, 4.0, 4.0]]
    );
    assert_eq!(
        epochs.channel(&ChannelKey::from("b")).unwrap(),
        &[vec![10.0, 20.0, 30.0], vec![30.0, 40.0, 40.0]]
    );
}

#[test]
fn test_missing_parameter() {
    let error = segmenter(json!({"window_size": 3, "step_size": 2})).unwrap_err();
    assert_eq!(error.code(), "missing.parameter");
    assert_eq!(error.parameter(), Some("filling_value"));
}

#[test]
fn test_invalid_parameter_values() {
    let cases = [
        (json!({"window_size": 1, "step_size": 2, "filling_value": "zero"}), "window_size", "must_be_greater_than_1"),
        (json!({"window_size": "3", "step_size": 2, "filling_value": "zero"}), "window_size", "must_be_int"),
        (json!({"window_size": 3, "step_size": 2, "filling_value": 0}), "filling_value", "must_be_str"),
        (json!({"window_size": 3, "step_size": 2, "filling_value": "mean"}), "filling_value", "must_be_in.[zero, latest]"),
        (
            json!({"window_size": 3, "step_size": 3, "filling_value": "zero"}),
            "step_size",
            "must_be_greater_than_1_and_smaller_than_window_size",
        ),
        (
            json!({"window_size": 3, "step_size": 1, "filling_value": "zero"}),
            "step_size",
            "must_be_greater_than_1_and_smaller_than_window_size",
        ),
    ];

    for (config, parameter, cause) in cases {
        let error = segmenter(config).unwrap_err();
        assert_eq!(error.code(), "invalid.parameter.value");
        assert_eq!(error.parameter(), Some(parameter));
        assert_eq!(error.cause(), Some(cause));
    }
}

#[test]
fn test_error_names_module_and_node() {
    let error = segmenter(json!({"window_size": 0, "step_size": 2, "filling_value": "zero"})).unwrap_err();
    match error {
        NodeError::InvalidParameterValue { module, node, .. } => {
            assert_eq!(module, "node.processing.segmenter.slidingwindowsegmenter");
            assert_eq!(node, "segmenter");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}
