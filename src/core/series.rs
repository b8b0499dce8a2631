use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one channel inside a series
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChannelKey {
    Index(u32),
    Name(String),
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelKey::Index(index) => write!(f, "{}", index),
            ChannelKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ChannelKey {
    fn from(name: &str) -> Self {
        ChannelKey::Name(name.to_string())
    }
}

impl From<String> for ChannelKey {
    fn from(name: String) -> Self {
        ChannelKey::Name(name)
    }
}

impl From<u32> for ChannelKey {
    fn from(index: u32) -> Self {
        ChannelKey::Index(index)
    }
}

/// Ordered mapping from channel to a sequence of elements.
///
/// Channels keep insertion order. Within one processing step every channel is
/// expected to hold the same number of elements; `data_count` reports the
/// length of the first channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSeries<T> {
    pub sampling_frequency_hz: Option<f64>,
    channels: Vec<(ChannelKey, Vec<T>)>,
}

/// One scalar per sample and channel
pub type SampleSeries = ChannelSeries<f64>;

/// One epoch (a window of samples) per element and channel
pub type EpochSeries = ChannelSeries<Vec<f64>>;

impl<T> Default for ChannelSeries<T> {
    fn default() -> Self {
        Self {
            sampling_frequency_hz: None,
            channels: Vec::new(),
        }
    }
}

impl<T: Clone> ChannelSeries<T> {
    pub fn new(sampling_frequency_hz: Option<f64>) -> Self {
        Self {
            sampling_frequency_hz,
            channels: Vec::new(),
        }
    }

    /// Build a series with the given channels, all empty
    pub fn with_channels<K, I>(sampling_frequency_hz: Option<f64>, keys: I) -> Self
    where
        K: Into<ChannelKey>,
        I: IntoIterator<Item = K>,
    {
        let mut series = Self::new(sampling_frequency_hz);
        for key in keys {
            series.ensure_channel(key.into());
        }
        series
    }

    pub fn from_channels<K, I>(sampling_frequency_hz: Option<f64>, channels: I) -> Self
    where
        K: Into<ChannelKey>,
        I: IntoIterator<Item = (K, Vec<T>)>,
    {
        let mut series = Self::new(sampling_frequency_hz);
        for (key, data) in channels {
            series.extend_channel(key, data);
        }
        series
    }

    fn ensure_channel(&mut self, key: ChannelKey) -> &mut Vec<T> {
        let position = match self.channels.iter().position(|(k, _)| *k == key) {
            Some(position) => position,
            None => {
                self.channels.push((key, Vec::new()));
                self.channels.len() - 1
            }
        };
        &mut self.channels[position].1
    }

    /// Append one element to a channel, creating the channel if needed
    pub fn push<K: Into<ChannelKey>>(&mut self, key: K, element: T) {
        self.ensure_channel(key.into()).push(element);
    }

    /// Append elements to a channel, creating the channel if needed
    pub fn extend_channel<K, I>(&mut self, key: K, elements: I)
    where
        K: Into<ChannelKey>,
        I: IntoIterator<Item = T>,
    {
        self.ensure_channel(key.into()).extend(elements);
    }

    /// Append every channel of `other` to this series.
    ///
    /// Adopts the sampling frequency of `other` when this series has none.
    pub fn append(&mut self, other: ChannelSeries<T>) {
        if self.sampling_frequency_hz.is_none() {
            self.sampling_frequency_hz = other.sampling_frequency_hz;
        }
        for (key, data) in other.channels {
            self.ensure_channel(key).extend(data);
        }
    }

    pub fn channel(&self, key: &ChannelKey) -> Option<&[T]> {
        self.channels
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, data)| data.as_slice())
    }

    pub fn contains_channel(&self, key: &ChannelKey) -> bool {
        self.channels.iter().any(|(k, _)| k == key)
    }

    pub fn channel_keys(&self) -> impl Iterator<Item = &ChannelKey> {
        self.channels.iter().map(|(key, _)| key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelKey, &[T])> {
        self.channels.iter().map(|(key, data)| (key, data.as_slice()))
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn data_count(&self) -> usize {
        self.channels.first().map(|(_, data)| data.len()).unwrap_or(0)
    }

    /// True when no channel holds any element
    pub fn is_empty(&self) -> bool {
        self.channels.iter().all(|(_, data)| data.is_empty())
    }

    pub fn is_rectangular(&self) -> bool {
        let count = self.data_count();
        self.channels.iter().all(|(_, data)| data.len() == count)
    }

    /// Drop every element, keeping neither channels nor frequency
    pub fn clear(&mut self) {
        self.channels.clear();
        self.sampling_frequency_hz = None;
    }

    /// Copy of the listed channels, in the listed order. Missing channels are skipped.
    pub fn select(&self, keys: &[ChannelKey]) -> Self {
        let mut selected = Self::new(self.sampling_frequency_hz);
        for key in keys {
            if let Some(data) = self.channel(key) {
                selected.extend_channel(key.clone(), data.iter().cloned());
            }
        }
        selected
    }

    /// Apply `f` to every channel, producing a series of another element type
    pub fn map_channels<U, F>(&self, sampling_frequency_hz: Option<f64>, mut f: F) -> ChannelSeries<U>
    where
        U: Clone,
        F: FnMut(&[T]) -> Vec<U>,
    {
        ChannelSeries {
            sampling_frequency_hz,
            channels: self
                .channels
                .iter()
                .map(|(key, data)| (key.clone(), f(data)))
                .collect(),
        }
    }
}
