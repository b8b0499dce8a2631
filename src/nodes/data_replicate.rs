use crate::core::{NodeResult, Parameters, PortBuffer, Transform};
use biopipe_macros::PipelineNode;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const INPUT_MAIN: &str = "main";
pub const OUTPUT_MAIN: &str = "main";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataReplicateConfig {
    pub data_repetition_count: usize,
    /// Extra copies of the last sample appended after replication
    pub extra_data: Option<usize>,
}

/// Emit every sample `repetition_count` times, then the last sample `extra` more times
pub fn replicate_samples(samples: &[f64], repetition_count: usize, extra: Option<usize>) -> Vec<f64> {
    let tail = extra.unwrap_or(0);
    let mut replicated = Vec::with_capacity(samples.len() * repetition_count + tail);

    for &sample in samples {
        replicated.extend(std::iter::repeat(sample).take(repetition_count));
    }
    if let (Some(extra), Some(&last)) = (extra, samples.last()) {
        replicated.extend(std::iter::repeat(last).take(extra));
    }

    replicated
}

/// Replicates every buffered sample a fixed number of times.
#[derive(PipelineNode, Debug, Clone)]
#[node_meta(name = "DataReplicate", module = "node.processing.dataReplicate", category = "Processing")]
pub struct DataReplicate {
    #[input(name = "main", data_type = "samples")]
    _main_in: (),

    #[output(name = "main", data_type = "samples")]
    _main_out: (),

    config: DataReplicateConfig,
}

impl DataReplicate {
    pub fn new(config: DataReplicateConfig) -> Self {
        Self {
            _main_in: (),
            _main_out: (),
            config,
        }
    }

    pub fn config(&self) -> &DataReplicateConfig {
        &self.config
    }
}

impl Transform for DataReplicate {
    type Config = DataReplicateConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<DataReplicateConfig> {
        let data_repetition_count = params.require_int("data_repetition_count")?;
        if data_repetition_count <= 1 {
            return Err(params.invalid("data_repetition_count", "must_be_bigger_than_1"));
        }

        let extra_data = if params.require_bool("use_extra_data")? {
            let extra_data = params.require_int("extra_data")?;
            if extra_data <= 1 || extra_data >= data_repetition_count {
                return Err(params.invalid("extra_data", "invalid_value"));
            }
            Some(extra_data as usize)
        } else {
            None
        };

        Ok(DataReplicateConfig {
            data_repetition_count: data_repetition_count as usize,
            extra_data,
        })
    }

    fn initialize_parameter_fields(config: DataReplicateConfig) -> Self {
        Self::new(config)
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        input.samples(INPUT_MAIN).map_or(false, |data| data.data_count() > 0)
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        let Some(data) = input.samples(INPUT_MAIN) else {
            return Ok(PortBuffer::new());
        };
        let DataReplicateConfig {
            data_repetition_count,
            extra_data,
        } = self.config;

        let sampling_frequency = data
            .sampling_frequency_hz
            .map(|frequency| frequency * data_repetition_count as f64);

        let replicated = data.map_channels(sampling_frequency, |samples| {
            if extra_data.is_some() && samples.is_empty() {
                warn!("Empty channel, skipping extra data");
            }
            replicate_samples(samples, data_repetition_count, extra_data)
        });

        Ok(PortBuffer::new().with(OUTPUT_MAIN, replicated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicate_with_extra_data() {
        let replicated = replicate_samples(&[10.0, 20.0], 3, Some(2));
        assert_eq!(replicated, vec![10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 20.0, 20.0]);
    }

    #[test]
    fn test_replicate_is_sample_major() {
        let replicated = replicate_samples(&[1.0, 2.0, 3.0], 2, None);
        assert_eq!(replicated, vec![1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    }

    #[test]
    fn test_empty_channel_stays_empty() {
        assert!(replicate_samples(&[], 3, Some(2)).is_empty());
    }
}
