use biopipe::core::{
    ChannelKey, EpochSeries, FrameKind, Node, NodeDescriptor, NodeError, NodeResult, NodeState,
    Parameters, PortBuffer, PortSpec, ProcessingNode, SampleSeries, Transform,
};
use biopipe::nodes::{DataReplicate, SlidingWindowSegmenter};
use serde_json::json;

fn samples(values: Vec<f64>) -> SampleSeries {
    SampleSeries::from_channels(None, [("c", values)])
}

fn replicate(buffer_options: serde_json::Value) -> Node<DataReplicate> {
    Node::<DataReplicate>::from_parameters(
        "replicate",
        &json!({
            "data_repetition_count": 2,
            "use_extra_data": false,
            "buffer_options": buffer_options
        }),
    )
    .unwrap()
}

#[test]
fn test_default_buffer_options_clear_everything() {
    let mut node = replicate(json!({}));
    let options = node.buffer_options();
    assert!(options.clear_output_buffer_on_data_input);
    assert!(options.clear_input_buffer_after_process);
    assert!(options.clear_output_buffer_after_process);

    node.push("main", samples(vec![1.0]).into()).unwrap();
    let outcome = node.run().unwrap();
    assert!(outcome.processed);
    assert!(outcome.emitted.is_some());
    assert!(node.input_buffer().is_empty());
    assert!(node.output_buffer().is_empty());
}

#[test]
fn test_retained_input_is_processed_again() {
    let mut node = replicate(json!({"clear_input_buffer_after_process": false}));
    node.push("main", samples(vec![1.0]).into()).unwrap();
    node.run().unwrap();
    node.push("main", samples(vec![2.0]).into()).unwrap();

    let emitted = node.run().unwrap().emitted.unwrap();
    assert_eq!(
        emitted.samples("main").unwrap().channel(&ChannelKey::from("c")).unwrap(),
        &[1.0, 1.0, 2.0, 2.0]
    );
    assert_eq!(node.input_buffer().data_count("main"), 2);
}

#[test]
fn test_retained_output_accumulates() {
    let mut node = replicate(json!({
        "clear_output_buffer_on_data_input": false,
        "clear_output_buffer_after_process": false
    }));
    node.push("main", samples(vec![1.0]).into()).unwrap();
    node.run().unwrap();
    node.push("main", samples(vec![2.0]).into()).unwrap();

    let emitted = node.run().unwrap().emitted.unwrap();
    assert_eq!(
        emitted.samples("main").unwrap().channel(&ChannelKey::from("c")).unwrap(),
        &[1.0, 1.0, 2.0, 2.0]
    );
    assert_eq!(node.output_buffer().data_count("main"), 4);
}

#[test]
fn test_output_is_emitted_once() {
    let mut node = replicate(json!({"clear_output_buffer_after_process": false}));
    node.push("main", samples(vec![1.0]).into()).unwrap();
    assert!(node.run().unwrap().emitted.is_some());

    let idle = node.run().unwrap();
    assert!(!idle.processed);
    assert!(idle.emitted.is_none());
}

#[test]
fn test_state_follows_lifecycle() {
    let mut node = replicate(json!({}));
    assert_eq!(node.state(), NodeState::Idle);

    node.push("main", samples(vec![1.0]).into()).unwrap();
    assert_eq!(node.state(), NodeState::Buffering);

    node.run().unwrap();
    assert_eq!(node.state(), NodeState::Emitted);

    node.run().unwrap();
    assert_eq!(node.state(), NodeState::Idle);
}

#[test]
fn test_unknown_port_rejected() {
    let mut node = replicate(json!({}));
    let error = node.push("aux", samples(vec![1.0]).into()).unwrap_err();
    assert!(matches!(error, NodeError::UnknownPort { ref port, .. } if port == "aux"));
    assert_eq!(error.code(), "unknown.port");
}

#[test]
fn test_epochs_rejected_on_sample_port() {
    let mut node = Node::<SlidingWindowSegmenter>::from_parameters(
        "segmenter",
        &json!({"window_size": 3, "step_size": 2, "filling_value": "zero"}),
    )
    .unwrap();

    let epochs = EpochSeries::from_channels(None, [("c", vec![vec![1.0, 2.0, 3.0]])]);
    let error = node.push("main", epochs.into()).unwrap_err();
    assert_eq!(error.code(), "port.kind.mismatch");
    assert!(node.input_buffer().is_empty());
}

#[test]
fn test_buffer_options_must_be_booleans() {
    let error = Node::<DataReplicate>::from_parameters(
        "replicate",
        &json!({
            "data_repetition_count": 2,
            "use_extra_data": false,
            "buffer_options": {"clear_input_buffer_after_process": "no"}
        }),
    )
    .unwrap_err();
    assert_eq!(error.cause(), Some("must_be_bool"));
}

#[test]
fn test_dispose_clears_buffers() {
    let mut node = replicate(json!({"clear_input_buffer_after_process": false}));
    node.push("main", samples(vec![1.0, 2.0]).into()).unwrap();
    node.dispose();

    assert!(node.input_buffer().is_empty());
    assert_eq!(node.state(), NodeState::Idle);
}

/// Passes `main` through, holding output back until two samples are buffered
struct Batched;

impl NodeDescriptor for Batched {
    const TYPE_NAME: &'static str = "Batched";
    const MODULE: &'static str = "tests.batched";
    const CATEGORY: &'static str = "Tests";
    const INPUTS: &'static [PortSpec] = &[PortSpec::new("main", FrameKind::Samples)];
    const OUTPUTS: &'static [PortSpec] = &[PortSpec::new("main", FrameKind::Samples)];
}

impl Transform for Batched {
    type Config = ();

    fn validate_parameters(_params: &Parameters<'_>) -> NodeResult<()> {
        Ok(())
    }

    fn initialize_parameter_fields(_config: ()) -> Self {
        Batched
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        input.has_data("main")
    }

    fn is_next_node_call_enabled(&self, output: &PortBuffer) -> bool {
        output.data_count("main") >= 2
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        Ok(input.clone())
    }
}

#[test]
fn test_gated_output_is_kept_until_released() {
    let mut node = Node::<Batched>::from_parameters(
        "batched",
        &json!({"buffer_options": {"clear_output_buffer_on_data_input": false}}),
    )
    .unwrap();
    assert!(node.buffer_options().clear_output_buffer_after_process);

    node.push("main", samples(vec![1.0]).into()).unwrap();
    let held = node.run().unwrap();
    assert!(held.processed);
    assert!(held.emitted.is_none());
    assert_eq!(node.output_buffer().data_count("main"), 1);
    assert_eq!(node.state(), NodeState::Idle);

    node.push("main", samples(vec![2.0]).into()).unwrap();
    let released = node.run().unwrap().emitted.unwrap();
    assert_eq!(
        released.samples("main").unwrap().channel(&ChannelKey::from("c")).unwrap(),
        &[1.0, 2.0]
    );
    assert!(node.output_buffer().is_empty());
    assert_eq!(node.state(), NodeState::Emitted);
}

#[test]
fn test_new_input_discards_gated_output_by_default() {
    let mut node = Node::<Batched>::from_parameters("batched", &json!({})).unwrap();

    node.push("main", samples(vec![1.0]).into()).unwrap();
    assert!(node.run().unwrap().emitted.is_none());
    assert_eq!(node.output_buffer().data_count("main"), 1);

    node.push("main", samples(vec![2.0]).into()).unwrap();
    assert!(node.output_buffer().is_empty());
    assert!(node.run().unwrap().emitted.is_none());
}
