//! Nodes that cut a continuous sample stream into epochs.

pub mod sliding_window;

pub use sliding_window::{segment_channel, FillingValue, SlidingWindowConfig, SlidingWindowSegmenter};

use crate::core::{EpochSeries, PortBuffer, SampleSeries};

pub const INPUT_MAIN: &str = "main";
pub const OUTPUT_MAIN: &str = "main";

/// Shared behaviour of segmenting nodes: wait for enough samples on `main`,
/// then window every channel of the buffered series.
pub trait Segmenter {
    /// Samples that must be buffered on `main` before segmenting
    fn minimum_sample_count(&self) -> usize;

    fn segment(&self, data: &SampleSeries) -> EpochSeries;

    fn has_enough_samples(&self, input: &PortBuffer) -> bool {
        input.samples(INPUT_MAIN).map_or(false, |data| {
            data.data_count() >= self.minimum_sample_count()
        })
    }

    fn segment_buffer(&self, input: &PortBuffer) -> PortBuffer {
        match input.samples(INPUT_MAIN) {
            Some(data) => PortBuffer::new().with(OUTPUT_MAIN, self.segment(data)),
            None => PortBuffer::new(),
        }
    }
}
