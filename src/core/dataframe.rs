use super::series::{ChannelKey, EpochSeries, SampleSeries};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element shape carried by a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Samples,
    Epochs,
    /// Port accepts either shape; the first frame pushed fixes it
    Any,
}

impl FrameKind {
    pub fn accepts(self, found: FrameKind) -> bool {
        self == FrameKind::Any || self == found
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FrameKind::Samples => "samples",
            FrameKind::Epochs => "epochs",
            FrameKind::Any => "any",
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statically declared port of a node type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortSpec {
    pub name: &'static str,
    pub kind: FrameKind,
}

impl PortSpec {
    pub const fn new(name: &'static str, kind: FrameKind) -> Self {
        Self { name, kind }
    }
}

/// Data unit passed between processing nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "series", rename_all = "lowercase")]
pub enum DataFrame {
    Samples(SampleSeries),
    Epochs(EpochSeries),
}

impl DataFrame {
    pub fn kind(&self) -> FrameKind {
        match self {
            DataFrame::Samples(_) => FrameKind::Samples,
            DataFrame::Epochs(_) => FrameKind::Epochs,
        }
    }

    pub fn data_count(&self) -> usize {
        match self {
            DataFrame::Samples(series) => series.data_count(),
            DataFrame::Epochs(series) => series.data_count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DataFrame::Samples(series) => series.is_empty(),
            DataFrame::Epochs(series) => series.is_empty(),
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            DataFrame::Samples(series) => series.channel_count(),
            DataFrame::Epochs(series) => series.channel_count(),
        }
    }

    pub fn sampling_frequency_hz(&self) -> Option<f64> {
        match self {
            DataFrame::Samples(series) => series.sampling_frequency_hz,
            DataFrame::Epochs(series) => series.sampling_frequency_hz,
        }
    }

    pub fn channel_keys(&self) -> Vec<ChannelKey> {
        match self {
            DataFrame::Samples(series) => series.channel_keys().cloned().collect(),
            DataFrame::Epochs(series) => series.channel_keys().cloned().collect(),
        }
    }

    /// Number of elements held by one channel, `None` if the channel is absent
    pub fn channel_len(&self, key: &ChannelKey) -> Option<usize> {
        match self {
            DataFrame::Samples(series) => series.channel(key).map(<[_]>::len),
            DataFrame::Epochs(series) => series.channel(key).map(<[_]>::len),
        }
    }

    pub fn select(&self, keys: &[ChannelKey]) -> DataFrame {
        match self {
            DataFrame::Samples(series) => DataFrame::Samples(series.select(keys)),
            DataFrame::Epochs(series) => DataFrame::Epochs(series.select(keys)),
        }
    }

    /// Append `other` channel by channel. On a shape mismatch nothing is
    /// appended and the kind of `other` is returned.
    pub fn append(&mut self, other: DataFrame) -> Result<(), FrameKind> {
        match (self, other) {
            (DataFrame::Samples(series), DataFrame::Samples(other)) => series.append(other),
            (DataFrame::Epochs(series), DataFrame::Epochs(other)) => series.append(other),
            (_, other) => return Err(other.kind()),
        }
        Ok(())
    }

    pub fn as_samples(&self) -> Option<&SampleSeries> {
        match self {
            DataFrame::Samples(series) => Some(series),
            DataFrame::Epochs(_) => None,
        }
    }

    pub fn as_epochs(&self) -> Option<&EpochSeries> {
        match self {
            DataFrame::Epochs(series) => Some(series),
            DataFrame::Samples(_) => None,
        }
    }
}

impl From<SampleSeries> for DataFrame {
    fn from(series: SampleSeries) -> Self {
        DataFrame::Samples(series)
    }
}

impl From<EpochSeries> for DataFrame {
    fn from(series: EpochSeries) -> Self {
        DataFrame::Epochs(series)
    }
}

/// Frames keyed by port name; used for both input and output buffers.
///
/// Ports keep the order in which they were first stored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PortBuffer {
    frames: Vec<(String, DataFrame)>,
}

impl PortBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, replacing whatever the port held
    pub fn with(mut self, port: impl Into<String>, frame: impl Into<DataFrame>) -> Self {
        self.insert(port, frame);
        self
    }

    /// Store `frame` on `port`. A replaced port keeps its position.
    pub fn insert(&mut self, port: impl Into<String>, frame: impl Into<DataFrame>) {
        let port = port.into();
        let frame = frame.into();
        match self.get_mut(&port) {
            Some(existing) => *existing = frame,
            None => self.frames.push((port, frame)),
        }
    }

    /// Append to the frame already held by `port`, or store it if the port is empty
    pub fn append(&mut self, port: &str, frame: DataFrame) -> Result<(), FrameKind> {
        match self.get_mut(port) {
            Some(existing) => existing.append(frame),
            None => {
                self.frames.push((port.to_string(), frame));
                Ok(())
            }
        }
    }

    pub fn get(&self, port: &str) -> Option<&DataFrame> {
        self.frames
            .iter()
            .find(|(name, _)| name == port)
            .map(|(_, frame)| frame)
    }

    fn get_mut(&mut self, port: &str) -> Option<&mut DataFrame> {
        self.frames
            .iter_mut()
            .find(|(name, _)| name == port)
            .map(|(_, frame)| frame)
    }

    pub fn samples(&self, port: &str) -> Option<&SampleSeries> {
        self.get(port).and_then(DataFrame::as_samples)
    }

    pub fn epochs(&self, port: &str) -> Option<&EpochSeries> {
        self.get(port).and_then(DataFrame::as_epochs)
    }

    /// Element count on `port`, zero when nothing was buffered
    pub fn data_count(&self, port: &str) -> usize {
        self.get(port).map(DataFrame::data_count).unwrap_or(0)
    }

    pub fn has_data(&self, port: &str) -> bool {
        self.get(port).map(|frame| !frame.is_empty()).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.frames.iter().all(|(_, frame)| frame.is_empty())
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DataFrame)> {
        self.frames.iter().map(|(port, frame)| (port.as_str(), frame))
    }

    pub fn into_frames(self) -> impl Iterator<Item = (String, DataFrame)> {
        self.frames.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_rejects_shape_mismatch() {
        let mut buffer = PortBuffer::new();
        buffer
            .append("main", SampleSeries::from_channels(None, vec![("a", vec![1.0])]).into())
            .unwrap();

        let epochs = EpochSeries::from_channels(None, vec![("a", vec![vec![1.0, 2.0]])]);
        assert_eq!(buffer.append("main", epochs.into()), Err(FrameKind::Epochs));
        assert_eq!(buffer.data_count("main"), 1);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut buffer =
            PortBuffer::new().with("main", SampleSeries::from_channels(None, vec![("a", vec![1.0])]));
        buffer.clear();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.data_count("main"), 0);
    }

    #[test]
    fn test_ports_keep_insertion_order() {
        let frame = || SampleSeries::from_channels(None, vec![("a", vec![1.0])]);
        let mut buffer = PortBuffer::new().with("signal", frame()).with("label", frame());
        buffer.append("aux", frame().into()).unwrap();
        buffer.insert("signal", frame());

        let ports: Vec<&str> = buffer.iter().map(|(port, _)| port).collect();
        assert_eq!(ports, vec!["signal", "label", "aux"]);
        assert_eq!(buffer.data_count("signal"), 1);
    }

    #[test]
    fn test_any_accepts_both_kinds() {
        assert!(FrameKind::Any.accepts(FrameKind::Epochs));
        assert!(FrameKind::Samples.accepts(FrameKind::Samples));
        assert!(!FrameKind::Samples.accepts(FrameKind::Epochs));
    }
}
