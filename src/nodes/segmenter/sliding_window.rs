use super::Segmenter;
use crate::core::{EpochSeries, NodeResult, Parameters, PortBuffer, SampleSeries, Transform};
use biopipe_macros::PipelineNode;
use serde::{Deserialize, Serialize};

/// How the last, incomplete window of a channel is padded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillingValue {
    Zero,
    /// Repeat the channel's last sample
    Latest,
}

impl FillingValue {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "zero" => Some(FillingValue::Zero),
            "latest" => Some(FillingValue::Latest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindowConfig {
    pub window_size: usize,
    pub filling_value: FillingValue,
    pub step_size: usize,
}

/// Cut one channel into windows of `window_size` samples advancing by `step_size`.
///
/// Windows are taken while `index + window_size < samples.len()`. Whatever
/// remains after the loop becomes one final window; it is emitted as is when
/// exactly `window_size` samples remain and padded according to `filling`
/// otherwise. Nothing is emitted for an empty channel.
///
/// Requires `0 < step_size <= window_size`; the node validates the stricter
/// `1 < step_size < window_size`.
pub fn segment_channel(
    samples: &[f64],
    window_size: usize,
    step_size: usize,
    filling: FillingValue,
) -> Vec<Vec<f64>> {
    debug_assert!(
        step_size > 0 && step_size <= window_size,
        "step_size must be in 1..=window_size"
    );
    let data_count = samples.len();
    let mut epochs = Vec::new();
    let mut index = 0;

    while index + window_size < data_count {
        epochs.push(samples[index..index + window_size].to_vec());
        index += step_size;
    }

    let remaining = data_count - index;
    if remaining != 0 {
        let mut epoch = Vec::with_capacity(window_size);
        epoch.extend_from_slice(&samples[index..]);

        let fill = match filling {
            FillingValue::Zero => 0.0,
            FillingValue::Latest => samples[data_count - 1],
        };
        epoch.resize(window_size, fill);
        epochs.push(epoch);
    }

    epochs
}

/// Segments the input into fixed size, possibly overlapping windows (epochs).
///
/// With `window_size = 100` and `step_size = 50` the first epoch covers
/// samples 0..100, the second 50..150, and so on.
#[derive(PipelineNode, Debug, Clone)]
#[node_meta(
    name = "SlidingWindowSegmenter",
    module = "node.processing.segmenter.slidingwindowsegmenter",
    category = "Segmenters"
)]
pub struct SlidingWindowSegmenter {
    #[input(name = "main", data_type = "samples")]
    _main_in: (),

    #[output(name = "main", data_type = "epochs")]
    _main_out: (),

    config: SlidingWindowConfig,
}

impl SlidingWindowSegmenter {
    pub fn new(config: SlidingWindowConfig) -> Self {
        Self {
            _main_in: (),
            _main_out: (),
            config,
        }
    }

    pub fn config(&self) -> &SlidingWindowConfig {
        &self.config
    }
}

impl Segmenter for SlidingWindowSegmenter {
    fn minimum_sample_count(&self) -> usize {
        self.config.window_size
    }

    fn segment(&self, data: &SampleSeries) -> EpochSeries {
        debug_assert!(data.is_rectangular(), "channels must hold the same sample count");
        let SlidingWindowConfig {
            window_size,
            filling_value,
            step_size,
        } = self.config;

        data.map_channels(data.sampling_frequency_hz, |samples| {
            segment_channel(samples, window_size, step_size, filling_value)
        })
    }
}

impl Transform for SlidingWindowSegmenter {
    type Config = SlidingWindowConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<SlidingWindowConfig> {
        params.require_all(&["window_size", "filling_value", "step_size"])?;

        let window_size = params.require_int("window_size")?;
        if window_size <= 1 {
            return Err(params.invalid("window_size", "must_be_greater_than_1"));
        }

        let filling_value = params.require_str("filling_value", "must_be_str")?;
        let filling_value = FillingValue::parse(filling_value)
            .ok_or_else(|| params.invalid("filling_value", "must_be_in.[zero, latest]"))?;

        let step_size = params.require_int("step_size")?;
        if step_size <= 1 || step_size >= window_size {
            return Err(params.invalid(
                "step_size",
                "must_be_greater_than_1_and_smaller_than_window_size",
            ));
        }

        Ok(SlidingWindowConfig {
            window_size: window_size as usize,
            filling_value,
            step_size: step_size as usize,
        })
    }

    fn initialize_parameter_fields(config: SlidingWindowConfig) -> Self {
        Self::new(config)
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        self.has_enough_samples(input)
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        Ok(self.segment_buffer(input))
    }
}
