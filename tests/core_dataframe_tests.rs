use biopipe::core::{ChannelKey, DataFrame, EpochSeries, PortBuffer, SampleSeries};
use serde_json::json;

#[test]
fn test_series_appends_per_channel() {
    let mut series = SampleSeries::from_channels(None, [("Fz", vec![1.0]), ("Cz", vec![2.0])]);
    series.append(SampleSeries::from_channels(Some(128.0), [("Cz", vec![4.0]), ("Fz", vec![3.0])]));

    assert_eq!(series.channel(&ChannelKey::from("Fz")).unwrap(), &[1.0, 3.0]);
    assert_eq!(series.channel(&ChannelKey::from("Cz")).unwrap(), &[2.0, 4.0]);
    assert_eq!(series.sampling_frequency_hz, Some(128.0));
    assert!(series.is_rectangular());
}

#[test]
fn test_index_and_name_keys_are_distinct() {
    let series = SampleSeries::from_channels(None, [(ChannelKey::from(0u32), vec![1.0]), (ChannelKey::from("0"), vec![2.0])]);
    assert_eq!(series.channel_count(), 2);
    assert_eq!(series.channel(&ChannelKey::Index(0)).unwrap(), &[1.0]);
}

#[test]
fn test_frame_json_shape() {
    let frame = DataFrame::from(SampleSeries::from_channels(Some(2.0), [("Fz", vec![1.0, 2.0])]));
    let value = serde_json::to_value(&frame).unwrap();

    assert_eq!(value["kind"], json!("samples"));
    assert_eq!(value["series"]["sampling_frequency_hz"], json!(2.0));

    let parsed: DataFrame = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, frame);
}

#[test]
fn test_port_buffer_keeps_ports_apart() {
    let mut buffer = PortBuffer::new();
    buffer.append("main", SampleSeries::from_channels(None, [("a", vec![1.0, 2.0])]).into()).unwrap();
    buffer
        .append("epochs", EpochSeries::from_channels(None, [("a", vec![vec![1.0, 2.0]])]).into())
        .unwrap();

    assert_eq!(buffer.data_count("main"), 2);
    assert_eq!(buffer.data_count("epochs"), 1);
    assert!(buffer.has_data("epochs"));
    assert!(!buffer.has_data("missing"));
    assert!(buffer.samples("epochs").is_none());
}

#[test]
fn test_select_skips_missing_channels() {
    let frame = DataFrame::from(SampleSeries::from_channels(None, [("a", vec![1.0]), ("b", vec![2.0])]));
    let selected = frame.select(&[ChannelKey::from("b"), ChannelKey::from("z")]);
    assert_eq!(selected.channel_keys(), vec![ChannelKey::from("b")]);
}
