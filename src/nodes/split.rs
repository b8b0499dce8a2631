use crate::core::{ChannelKey, NodeResult, Parameters, PortBuffer, Transform};
use biopipe_macros::PipelineNode;

pub const INPUT_MAIN: &str = "main";

/// Output port name and the channels routed to it, in configuration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    pub outputs: Vec<(String, Vec<ChannelKey>)>,
}

/// Splits the channels of `main` into several outputs.
///
/// ```json
/// "split": { "data": ["Fz", "Cz"], "label": ["marker"] }
/// ```
/// creates the outputs `data` and `label`. Works on samples and epochs alike.
#[derive(PipelineNode, Debug, Clone)]
#[node_meta(name = "Split", module = "node.processing.split", category = "Routing")]
pub struct Split {
    #[input(name = "main", data_type = "any")]
    _main_in: (),

    config: SplitConfig,
}

impl Split {
    pub fn new(config: SplitConfig) -> Self {
        Self { _main_in: (), config }
    }
}

impl Transform for Split {
    type Config = SplitConfig;

    fn validate_parameters(params: &Parameters<'_>) -> NodeResult<SplitConfig> {
        let split = params
            .require("split")?
            .as_object()
            .ok_or_else(|| params.invalid("split", "must_be_dict"))?;
        if split.len() < 2 {
            return Err(params.invalid("split", "must_have_at_least_2_keys"));
        }

        let mut outputs = Vec::with_capacity(split.len());
        for (output, channels) in split {
            let parameter = format!("split.{}", output);
            let channels = channels
                .as_array()
                .ok_or_else(|| params.invalid(&parameter, "must_be_list"))?;
            if channels.is_empty() {
                return Err(params.invalid(&parameter, "must_not_be_empty"));
            }

            let keys = channels
                .iter()
                .enumerate()
                .map(|(index, channel)| {
                    channel
                        .as_str()
                        .map(ChannelKey::from)
                        .ok_or_else(|| params.invalid(&format!("{}.{}", parameter, index), "must_be_str"))
                })
                .collect::<NodeResult<Vec<_>>>()?;
            outputs.push((output.clone(), keys));
        }

        Ok(SplitConfig { outputs })
    }

    fn initialize_parameter_fields(config: SplitConfig) -> Self {
        Self::new(config)
    }

    fn outputs(&self) -> Vec<String> {
        self.config.outputs.iter().map(|(output, _)| output.clone()).collect()
    }

    fn is_processing_condition_satisfied(&self, input: &PortBuffer) -> bool {
        let Some(frame) = input.get(INPUT_MAIN) else {
            return false;
        };
        self.config
            .outputs
            .iter()
            .flat_map(|(_, channels)| channels)
            .all(|channel| frame.channel_len(channel).map_or(false, |len| len > 0))
    }

    fn process(&mut self, input: &PortBuffer) -> NodeResult<PortBuffer> {
        let Some(frame) = input.get(INPUT_MAIN) else {
            return Ok(PortBuffer::new());
        };

        let mut output = PortBuffer::new();
        for (port, channels) in &self.config.outputs {
            output.insert(port.clone(), frame.select(channels));
        }
        Ok(output)
    }
}
