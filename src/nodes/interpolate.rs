use crate::core::{NodeResult, Parameters, PortBuffer, Transform};
use biopipe_macros::PipelineNode;
use serde::{Deserialize, Serialize};

pub const INPUT_MAIN: &str = "main";
pub const OUTPUT_MAIN: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InterpolationMode {
    /// Epochs are back to back; every value covers `window_size` samples
    NonSliding,
    /// Epochs overlap by `window_size - step_size` samples
    Sliding { step_size: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolateConfig {
    pub window_size: usize,
    pub mode: InterpolationMode,
}

/// Repeat every epoch value `window_size` times, in epoch order
pub fn upsample_epochs(values: &[f64], window_size: usize) -> Vec<f64> {
    values
        .iter()
        .flat_map(|&value| std::iter::repeat(value).take(window_size))
        .collect()
}

/// Rebuild a sample sequence from values of overlapping epochs.
///
/// The first epoch covers slots `0..window_size`. Each further epoch covers
/// the last `window_size - step_size` slots of its predecessor and
/// `step_size` new ones. A slot covered by several epochs resolves to the
/// largest of their values.
///
/// Requires `step_size <= window_size`.
pub fn reconstruct_overlapping(values: &[f64], window_size: usize, step_size: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };
    debug_assert!(step_size <= window_size, "step_size must not exceed window_size");
    let intersection_length = window_size - step_size;

    let mut samples = Vec::with_capacity(window_size + rest.len() * step_size);
    samples.resize(window_size, first);

    for &value in rest {
        let window_end = samples.len();
        for slot in &mut samples[window_end - intersection_length..] {
            *slot = slot.max(value);
        }
        samples.extend(std::iter::repeat(value).take(step_size));
    }

    samples
}

/// Turns one value per epoch back into one value per sample.
///
/// Typically placed after a classifier so labels line up with the raw
/// signal again.
#[derive(PipelineNode, Debug, Clone)]
#[node_meta(name = "Interpolate", module = "node.processing.interpolate", category = "Processing")]
pub struct Interpolate {
    #[input(name = "main", data_type = "samples")]
    _main_in: (),

    #[output(name = "main", data_type = "samples")]
    _main_out: (),

    config: InterpolateConfig,
}

impl Interpolate {
    pub fn new(config: InterpolateConfig) -> Self {
        Self {
            _main_in: (),
            _main_out: (),
            config,
        }
    }

    pub fn config(&self) -> &InterpolateConfig {
        &self.config
    }

    /// Output samples produced per input epoch (the first epoch aside, when sliding)
    fn samples_per_epoch(&self) -> usize {
        match self.config.mode {
            InterpolationMode::NonSliding => self.config.window_size,
            InterpolationMode::Sliding { step_size } => step_size,
        }
    }
}

impl Transform for Interpolate {
    type Config = InterpolateConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<InterpolateConfig> {
        let window_size = params.require_int("window_size")?;
        if window_size <= 1 {
            return Err(params.invalid("window_size", "must_be_greater_than_1"));
        }

        let mode = if params.require_bool("sliding_window")? {
            let step_size = params.require_int("step_size")?;
            if step_size <= 1 || step_size >= window_size {
                return Err(params.invalid("step_size", "invalid_value"));
            }
            InterpolationMode::Sliding {
                step_size: step_size as usize,
            }
        } else {
            InterpolationMode::NonSliding
        };

        Ok(InterpolateConfig {
            window_size: window_size as usize,
            mode,
        })
    }

    fn initialize_parameter_fields(config: InterpolateConfig) -> Self {
        Self::new(config)
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        input.samples(INPUT_MAIN).map_or(false, |data| data.data_count() > 0)
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        let Some(data) = input.samples(INPUT_MAIN) else {
            return Ok(PortBuffer::new());
        };
        let window_size = self.config.window_size;
        let sampling_frequency = data
            .sampling_frequency_hz
            .map(|frequency| frequency * self.samples_per_epoch() as f64);

        let interpolated = match self.config.mode {
            InterpolationMode::NonSliding => data.map_channels(sampling_frequency, |values| {
                upsample_epochs(values, window_size)
            }),
            InterpolationMode::Sliding { step_size } => {
                data.map_channels(sampling_frequency, |values| {
                    reconstruct_overlapping(values, window_size, step_size)
                })
            }
        };

        Ok(PortBuffer::new().with(OUTPUT_MAIN, interpolated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "step_size must not exceed window_size")]
    fn test_step_past_window_is_rejected() {
        reconstruct_overlapping(&[1.0, 2.0], 2, 3);
    }

    #[test]
    fn test_reconstruct_single_epoch() {
        assert_eq!(reconstruct_overlapping(&[7.0], 4, 2), vec![7.0; 4]);
    }

    #[test]
    fn test_reconstruct_takes_max_in_overlap() {
        // window 4, step 2: epoch 1 overlaps slots 2..4 of epoch 0
        let samples = reconstruct_overlapping(&[1.0, 3.0, 2.0], 4, 2);
        assert_eq!(samples, vec![1.0, 1.0, 3.0, 3.0, 3.0, 3.0, 2.0, 2.0]);
    }

    #[test]
    fn test_reconstruct_empty() {
        assert!(reconstruct_overlapping(&[], 4, 2).is_empty());
    }
}
